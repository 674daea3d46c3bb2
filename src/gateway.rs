//! Path-prefix reverse proxy in front of the resource service.
//!
//! `GET /<prefix>/<rest>` is forwarded to `<upstream>/<rest>` and the
//! upstream status, headers and body come back unchanged. Nothing is cached
//! or retried. An unreachable upstream answers `502 Bad Gateway`; one that
//! does not answer within the client timeout answers `504 Gateway Timeout`.

use std::sync::Arc;

use http::HeaderMap;
use http::header::{
    CONNECTION, CONTENT_LENGTH, HOST, HeaderName, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE,
    TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use tracing::{debug, warn};

use crate::client::{ClientError, HttpClient, join_uri};
use crate::health;
use crate::response::{Response, error_json};
use crate::status::Status;
use crate::{Request, Router};

/// A registered prefix and the service base address it maps to.
#[derive(Clone, Debug)]
pub struct Upstream {
    pub prefix: String,
    pub base: String,
}

pub struct Gateway {
    upstreams: Vec<Upstream>,
    client: HttpClient,
}

impl Gateway {
    pub fn new(client: HttpClient) -> Self {
        Self { upstreams: Vec::new(), client }
    }

    /// Maps `/<prefix>/...` to `base`. A leading or trailing `/` on
    /// `prefix` is ignored.
    pub fn route(mut self, prefix: &str, base: &str) -> Self {
        self.upstreams.push(Upstream {
            prefix: prefix.trim_matches('/').to_owned(),
            base: base.to_owned(),
        });
        self
    }

    pub fn upstreams(&self) -> &[Upstream] { &self.upstreams }

    /// Forwards `req` to the upstream registered under `prefix`. The path
    /// after the prefix arrives as the `rest` route parameter; without one
    /// the upstream root is requested.
    pub async fn forward(&self, prefix: &str, req: &Request) -> Response {
        let Some(upstream) = self.upstreams.iter().find(|u| u.prefix == prefix) else {
            return error_json(Status::NotFound, "unknown prefix");
        };

        let path = upstream_path(req.param("rest"), req.query());
        let uri = match join_uri(&upstream.base, &path) {
            Ok(uri) => uri,
            Err(e) => return upstream_error(e),
        };
        debug!(%uri, "forwarding");

        match self.client.get(uri, &relayable(req.headers())).await {
            Ok(fetched) => {
                Response::from_parts(fetched.status, relayable(&fetched.headers), fetched.body)
            }
            Err(e) => upstream_error(e),
        }
    }
}

/// `rest = "get_arqueros"`, `query = "x=1"` → `/get_arqueros?x=1`; no
/// `rest` → `/`.
fn upstream_path(rest: Option<&str>, query: Option<&str>) -> String {
    let rest = rest.unwrap_or_default();
    match query {
        Some(q) => format!("/{rest}?{q}"),
        None => format!("/{rest}"),
    }
}

/// Drops the headers that describe one hop and must not be relayed: the
/// RFC 9110 §7.6.1 connection-specific set, its legacy `keep-alive` and
/// `proxy-connection` spellings, `host`, and `content-length`, which hyper
/// recomputes from the relayed body.
fn relayable(headers: &HeaderMap) -> HeaderMap {
    let mut out = headers.clone();
    // Names listed in `Connection` are hop-by-hop as well.
    let listed: Vec<HeaderName> = headers
        .get_all(CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::try_from(name.trim()).ok())
        .collect();
    for name in listed {
        out.remove(name);
    }
    for name in [
        CONNECTION,
        CONTENT_LENGTH,
        HOST,
        HeaderName::from_static("keep-alive"),
        HeaderName::from_static("proxy-connection"),
        PROXY_AUTHENTICATE,
        PROXY_AUTHORIZATION,
        TE,
        TRAILER,
        TRANSFER_ENCODING,
        UPGRADE,
    ] {
        out.remove(name);
    }
    out
}

fn upstream_error(e: ClientError) -> Response {
    warn!("upstream request failed: {e}");
    match e {
        ClientError::Timeout { .. } => error_json(Status::GatewayTimeout, &e.to_string()),
        _ => error_json(Status::BadGateway, &e.to_string()),
    }
}

/// One set of GET routes per registered prefix, plus health probes.
pub fn router(gateway: Arc<Gateway>) -> Router {
    let mut router = Router::new();
    for upstream in gateway.upstreams() {
        let prefix = upstream.prefix.clone();
        for path in [format!("/{prefix}"), format!("/{prefix}/"), format!("/{prefix}/{{*rest}}")] {
            let gateway = Arc::clone(&gateway);
            let prefix = prefix.clone();
            router = router.get(&path, move |req: Request| {
                let gateway = Arc::clone(&gateway);
                let prefix = prefix.clone();
                async move { gateway.forward(&prefix, &req).await }
            });
        }
    }
    health::with_probes(router)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_path_keeps_rest_and_query() {
        assert_eq!(upstream_path(Some("get_arqueros"), Some("x=1")), "/get_arqueros?x=1");
        assert_eq!(upstream_path(Some("a/b"), None), "/a/b");
        assert_eq!(upstream_path(None, None), "/");
        assert_eq!(upstream_path(None, Some("x=1")), "/?x=1");
    }

    #[test]
    fn route_normalises_prefix() {
        let gw = Gateway::new(HttpClient::new(std::time::Duration::from_secs(1)))
            .route("/plantilla/", "http://127.0.0.1:8002");
        assert_eq!(gw.upstreams()[0].prefix, "plantilla");
    }

    #[test]
    fn hop_headers_are_not_relayed() {
        let mut headers = HeaderMap::new();
        headers.insert(HOST, "gateway:8001".parse().unwrap());
        headers.insert(CONTENT_LENGTH, "12".parse().unwrap());
        headers.insert(CONNECTION, "keep-alive, x-trace-hop".parse().unwrap());
        headers.insert("keep-alive", "timeout=5".parse().unwrap());
        headers.insert("proxy-connection", "keep-alive".parse().unwrap());
        headers.insert(TE, "trailers".parse().unwrap());
        headers.insert(TRAILER, "expires".parse().unwrap());
        headers.insert(UPGRADE, "h2c".parse().unwrap());
        headers.insert("x-trace-hop", "1".parse().unwrap());
        headers.insert("content-type", "application/json".parse().unwrap());
        headers.insert("x-powered-by", "ms-plantilla".parse().unwrap());
        let out = relayable(&headers);
        assert_eq!(out.len(), 2);
        assert_eq!(out["content-type"], "application/json");
        assert_eq!(out["x-powered-by"], "ms-plantilla");
    }

    #[tokio::test]
    async fn unknown_prefix_is_404() {
        let gw = Gateway::new(HttpClient::new(std::time::Duration::from_secs(1)));
        let req = Request::for_test("/otro/", &[]);
        let res = gw.forward("otro", &req).await;
        assert_eq!(res.status_code(), http::StatusCode::NOT_FOUND);
    }
}
