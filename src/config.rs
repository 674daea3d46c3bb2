//! Command-line / environment configuration for the three binaries.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Plantilla resource service.
#[derive(Parser, Debug, Clone)]
#[command(name = "ms-plantilla", version, about)]
pub struct ServiceConfig {
    /// Address to listen on.
    #[arg(long, env = "PLANTILLA_ADDR", default_value = "0.0.0.0:8002")]
    pub addr: SocketAddr,

    /// JSON file holding an array of archer records. The built-in reference
    /// fixture is served when absent.
    #[arg(long, env = "PLANTILLA_DATA")]
    pub data: Option<PathBuf>,
}

/// API gateway in front of the resource service.
#[derive(Parser, Debug, Clone)]
#[command(name = "api-gateway", version, about)]
pub struct GatewayConfig {
    #[arg(long, env = "GATEWAY_ADDR", default_value = "0.0.0.0:8001")]
    pub addr: SocketAddr,

    /// Path prefix the service is exposed under.
    #[arg(long, env = "GATEWAY_PREFIX", default_value = "plantilla")]
    pub prefix: String,

    /// Base address of the resource service.
    #[arg(long, env = "GATEWAY_UPSTREAM", default_value = "http://127.0.0.1:8002")]
    pub upstream: String,

    /// Upper bound for one upstream exchange, in milliseconds.
    #[arg(long, env = "GATEWAY_TIMEOUT_MS", default_value_t = 3000)]
    pub timeout_ms: u64,
}

impl GatewayConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// HTML front end.
#[derive(Parser, Debug, Clone)]
#[command(name = "front-end", version, about)]
pub struct FrontendConfig {
    #[arg(long, env = "FRONTEND_ADDR", default_value = "0.0.0.0:8000")]
    pub addr: SocketAddr,

    /// Base address of the API gateway.
    #[arg(long, env = "FRONTEND_GATEWAY", default_value = "http://127.0.0.1:8001")]
    pub gateway: String,

    /// Prefix the gateway exposes the service under.
    #[arg(long, env = "FRONTEND_RESOURCE", default_value = "plantilla")]
    pub resource: String,

    #[arg(long, env = "FRONTEND_TIMEOUT_MS", default_value_t = 3000)]
    pub timeout_ms: u64,
}

impl FrontendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn commands_are_well_formed() {
        ServiceConfig::command().debug_assert();
        GatewayConfig::command().debug_assert();
        FrontendConfig::command().debug_assert();
    }

    #[test]
    fn gateway_flags_override_defaults() {
        let cfg = GatewayConfig::try_parse_from([
            "api-gateway",
            "--prefix",
            "arqueros",
            "--upstream",
            "http://ms:8002",
            "--timeout-ms",
            "250",
        ])
        .unwrap();
        assert_eq!(cfg.prefix, "arqueros");
        assert_eq!(cfg.upstream, "http://ms:8002");
        assert_eq!(cfg.timeout(), Duration::from_millis(250));
    }

    #[test]
    fn service_rejects_bad_address() {
        assert!(ServiceConfig::try_parse_from(["ms-plantilla", "--addr", "nowhere"]).is_err());
    }
}
