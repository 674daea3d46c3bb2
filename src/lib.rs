//! # plantilla
//!
//! A small archer-listing system in three processes:
//!
//! - **ms-plantilla** ([`service`]): serves a fixed collection of archer
//!   records as JSON.
//! - **api-gateway** ([`gateway`]): forwards `/<prefix>/...` to the service
//!   and relays the answer unchanged.
//! - **front-end** ([`frontend`]): fetches through the gateway and renders
//!   the records into HTML tables ([`render`]).
//!
//! All three run on the same minimal HTTP layer: a [`Router`] of async
//! handlers served by [`Server`] on hyper, with graceful shutdown.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use plantilla::{Server, service, store::MemoryStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), plantilla::Error> {
//!     let app = service::router(Arc::new(MemoryStore::reference()));
//!     Server::bind("127.0.0.1:8002".parse().unwrap()).await?.serve(app).await
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod client;
pub mod config;
pub mod frontend;
pub mod gateway;
pub mod health;
pub mod model;
pub mod render;
pub mod service;
pub mod store;
pub mod telemetry;

pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use request::Request;
pub use response::{IntoResponse, Json, Response, ResponseBuilder, error_json};
pub use router::Router;
pub use server::Server;
pub use status::Status;
