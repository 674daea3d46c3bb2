//! API gateway.
//!
//!   cargo run --bin api-gateway
//!   curl http://localhost:8001/plantilla/get_arqueros_completos

use std::sync::Arc;

use clap::Parser;
use plantilla::client::HttpClient;
use plantilla::config::GatewayConfig;
use plantilla::gateway::{self, Gateway};
use plantilla::{Server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), plantilla::Error> {
    telemetry::init();
    let cfg = GatewayConfig::parse();

    let gw = Gateway::new(HttpClient::new(cfg.timeout())).route(&cfg.prefix, &cfg.upstream);
    info!(prefix = %cfg.prefix, upstream = %cfg.upstream, timeout_ms = cfg.timeout_ms, "gateway route");

    Server::bind(cfg.addr)
        .await?
        .named("api-gateway")
        .serve(gateway::router(Arc::new(gw)))
        .await
}
