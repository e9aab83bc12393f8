tonic::include_proto!("landmark");
