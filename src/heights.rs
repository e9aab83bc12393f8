use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

/// Known real-world heights, in meters, for the detector's object categories.
///
/// The table is a closed, hand-curated set loaded once at startup and shared
/// read-only across requests. A lookup miss is a normal outcome: not every
/// detector category has a modeled height.
#[derive(Debug, Clone)]
pub struct HeightTable {
    entries: HashMap<String, f32>,
}

impl Default for HeightTable {
    /// Curated window/door categories, labeled by height in centimeters.
    fn default() -> Self {
        let entries = [
            ("80", 0.80),
            ("120", 1.20),
            ("140", 1.40),
            ("160", 1.60),
            ("200", 2.00),
            ("210", 2.10),
            ("220", 2.20),
            ("380", 3.80),
            ("650", 8.50),
        ]
        .into_iter()
        .map(|(label, height)| (label.to_string(), height))
        .collect();
        Self { entries }
    }
}

impl HeightTable {
    /// Build a table from explicit entries, rejecting non-positive heights.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, f32)>,
    {
        let mut map = HashMap::new();
        for (label, height) in entries {
            if height <= 0.0 {
                bail!("height for category '{}' must be positive, got {}", label, height);
            }
            map.insert(label, height);
        }
        Ok(Self { entries: map })
    }

    /// Load a table from a text file with one `label height_meters` pair per
    /// line. Blank lines and lines starting with `#` are skipped.
    pub fn from_file(file_path: &str) -> Result<Self> {
        let file = File::open(file_path)
            .with_context(|| format!("failed to open height table {}", file_path))?;
        let reader = BufReader::new(file);

        let mut entries = Vec::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.split_whitespace();
            let (label, height) = match (parts.next(), parts.next()) {
                (Some(label), Some(height)) => (label, height),
                _ => bail!("{}:{}: expected 'label height_meters'", file_path, line_no + 1),
            };
            let height: f32 = height.parse().with_context(|| {
                format!("{}:{}: invalid height '{}'", file_path, line_no + 1, height)
            })?;
            if height <= 0.0 {
                bail!("{}:{}: height must be positive, got {}", file_path, line_no + 1, height);
            }
            entries.push((label.to_string(), height));
        }
        Self::from_entries(entries)
    }

    /// Physical height in meters for a category, or `None` for an unmodeled one.
    pub fn lookup(&self, category_label: &str) -> Option<f32> {
        self.entries.get(category_label).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_table_covers_curated_categories() {
        let table = HeightTable::default();
        assert_eq!(table.lookup("120"), Some(1.20));
        assert_eq!(table.lookup("650"), Some(8.50));
        assert_eq!(table.len(), 9);
    }

    #[test]
    fn unknown_category_is_absent_not_an_error() {
        let table = HeightTable::default();
        assert_eq!(table.lookup("lamppost"), None);
    }

    #[test]
    fn from_entries_rejects_non_positive_height() {
        let result = HeightTable::from_entries([("door".to_string(), 0.0)]);
        assert!(result.is_err());
        let result = HeightTable::from_entries([("door".to_string(), -2.0)]);
        assert!(result.is_err());
    }

    #[test]
    fn from_file_parses_pairs_and_skips_comments() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("heights.txt");
        let mut file = File::create(&path)?;
        writeln!(file, "# windows by sill height")?;
        writeln!(file)?;
        writeln!(file, "120 1.2")?;
        writeln!(file, "door 2.1")?;

        let table = HeightTable::from_file(path.to_str().unwrap())?;
        assert_eq!(table.lookup("120"), Some(1.2));
        assert_eq!(table.lookup("door"), Some(2.1));
        assert_eq!(table.len(), 2);
        Ok(())
    }

    #[test]
    fn from_file_reports_malformed_line() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("heights.txt");
        let mut file = File::create(&path)?;
        writeln!(file, "120")?;

        let result = HeightTable::from_file(path.to_str().unwrap());
        assert!(result.is_err());
        Ok(())
    }
}
