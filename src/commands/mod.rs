pub mod analyze;
pub mod chunk;
pub mod ingest;
pub mod status;
