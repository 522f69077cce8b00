pub mod domain;
pub mod feed;
pub mod ingest_worker;
