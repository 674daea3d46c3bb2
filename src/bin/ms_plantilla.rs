//! Plantilla resource service.
//!
//!   cargo run --bin ms-plantilla
//!   curl http://localhost:8002/get_arqueros

use std::sync::Arc;

use clap::Parser;
use plantilla::config::ServiceConfig;
use plantilla::store::{ArcherStore, MemoryStore};
use plantilla::{Server, service, telemetry};

#[tokio::main]
async fn main() -> Result<(), plantilla::Error> {
    telemetry::init();
    let cfg = ServiceConfig::parse();

    let store: Arc<dyn ArcherStore> = match &cfg.data {
        Some(path) => Arc::new(MemoryStore::from_json_file(path)?),
        None => Arc::new(MemoryStore::reference()),
    };

    Server::bind(cfg.addr)
        .await?
        .named("ms-plantilla")
        .serve(service::router(store))
        .await
}
