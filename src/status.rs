//! HTTP status codes as a typed enum.
//!
//! Only the codes the service, gateway and front end actually answer with.
//! Upstream statuses relayed by the gateway travel as raw
//! [`http::StatusCode`] values and never pass through this enum.
//!
//! ```rust
//! use plantilla::{Response, Status};
//!
//! Response::status(Status::NotFound);
//!
//! Response::builder()
//!     .status(Status::BadGateway)
//!     .json(br#"{"error":"upstream unreachable"}"#.to_vec());
//! ```

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 4xx Client errors ─────────────────────────────────────────────────────
    NotFound,            // 404
    MethodNotAllowed,    // 405

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError, // 500
    BadGateway,          // 502
    GatewayTimeout,      // 504
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> Self {
        match s {
            Status::NotFound            => http::StatusCode::NOT_FOUND,
            Status::MethodNotAllowed    => http::StatusCode::METHOD_NOT_ALLOWED,
            Status::InternalServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Status::BadGateway          => http::StatusCode::BAD_GATEWAY,
            Status::GatewayTimeout      => http::StatusCode::GATEWAY_TIMEOUT,
        }
    }
}
