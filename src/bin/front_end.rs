//! HTML front end.
//!
//!   cargo run --bin front-end
//!   open http://localhost:8000/

use std::sync::Arc;

use clap::Parser;
use plantilla::client::HttpClient;
use plantilla::config::FrontendConfig;
use plantilla::frontend::{self, Frontend};
use plantilla::{Server, telemetry};

#[tokio::main]
async fn main() -> Result<(), plantilla::Error> {
    telemetry::init();
    let cfg = FrontendConfig::parse();

    let fe = Frontend::new(HttpClient::new(cfg.timeout()), &cfg.gateway, &cfg.resource);

    Server::bind(cfg.addr)
        .await?
        .named("front-end")
        .serve(frontend::router(Arc::new(fe)))
        .await
}
