//! Incoming HTTP request type.

use std::collections::HashMap;

use http::HeaderMap;

/// An incoming HTTP request.
///
/// Every route in this system is a `GET`, so the body is never read; the
/// method has already been used to pick the route tree by the time a
/// handler runs.
pub struct Request {
    pub(crate) path: String,
    pub(crate) query: Option<String>,
    pub(crate) headers: HeaderMap,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(parts: http::request::Parts, params: HashMap<String, String>) -> Self {
        Self {
            path: parts.uri.path().to_owned(),
            query: parts.uri.query().map(str::to_owned),
            headers: parts.headers,
            params,
        }
    }

    pub fn path(&self) -> &str { &self.path }
    pub fn query(&self) -> Option<&str> { self.query.as_deref() }
    pub fn headers(&self) -> &HeaderMap { &self.headers }

    /// Returns a named path parameter.
    ///
    /// For a route `/plantilla/{*rest}`, `req.param("rest")` on
    /// `/plantilla/get_arqueros` returns `Some("get_arqueros")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Path plus query string, as it would appear in a request line.
    pub fn path_and_query(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{q}", self.path),
            None => self.path.clone(),
        }
    }
}

#[cfg(test)]
impl Request {
    pub(crate) fn for_test(uri: &str, params: &[(&str, &str)]) -> Self {
        let (parts, ()) = http::Request::builder()
            .uri(uri)
            .body(())
            .expect("valid test request")
            .into_parts();
        let params = params.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        Self::new(parts, params)
    }
}
