//! Outbound HTTP client with a bounded per-request timeout.

use std::time::Duration;

use bytes::Bytes;
use http::{HeaderMap, StatusCode, Uri};
use http_body_util::{BodyExt, Full};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    #[error("invalid upstream uri {uri}: {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("request to {uri} failed: {source}")]
    Connect {
        uri: Uri,
        source: hyper_util::client::legacy::Error,
    },

    #[error("request to {uri} timed out after {timeout:?}")]
    Timeout { uri: Uri, timeout: Duration },

    #[error("failed to read response body from {uri}: {source}")]
    Body { uri: Uri, source: hyper::Error },
}

/// A fully-read upstream response.
#[derive(Debug)]
pub struct Fetched {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct HttpClient {
    inner: Client<HttpConnector, Full<Bytes>>,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));
        Self {
            inner: Client::builder(TokioExecutor::new()).build(connector),
            timeout,
        }
    }

    /// Issues a GET and reads the whole body, all within the timeout.
    pub async fn get(&self, uri: Uri, headers: &HeaderMap) -> Result<Fetched, ClientError> {
        let mut req = http::Request::new(Full::new(Bytes::new()));
        *req.uri_mut() = uri.clone();
        for (name, value) in headers {
            req.headers_mut().append(name, value.clone());
        }

        let exchange = async {
            let res = self.inner.request(req).await.map_err(|source| ClientError::Connect {
                uri: uri.clone(),
                source,
            })?;
            let (parts, body) = res.into_parts();
            let body = body
                .collect()
                .await
                .map_err(|source| ClientError::Body { uri: uri.clone(), source })?
                .to_bytes();
            Ok(Fetched { status: parts.status, headers: parts.headers, body })
        };

        match tokio::time::timeout(self.timeout, exchange).await {
            Ok(res) => res,
            Err(_) => Err(ClientError::Timeout { uri, timeout: self.timeout }),
        }
    }
}

/// Joins `base` (e.g. `http://127.0.0.1:8002`) and an absolute `path_and_query`.
pub fn join_uri(base: &str, path_and_query: &str) -> Result<Uri, ClientError> {
    let joined = format!("{}{}", base.trim_end_matches('/'), path_and_query);
    joined.parse().map_err(|e: http::uri::InvalidUri| ClientError::InvalidUri {
        uri: joined.clone(),
        reason: e.to_string(),
    })
}
