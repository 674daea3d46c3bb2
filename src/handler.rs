//! Handler trait and type erasure.
//!
//! # What counts as a handler
//!
//! Any `Fn(Request) -> impl Future<Output = impl IntoResponse>`: plain
//! `async fn` items, and closures that clone shared state into the future
//! they return. The service, gateway and front end all register closures of
//! the second kind:
//!
//! ```rust,no_run
//! # use std::sync::Arc;
//! # use plantilla::{Request, Router, gateway::Gateway};
//! # fn build(gateway: Arc<Gateway>) -> Router {
//! Router::new().get("/plantilla/{*rest}", move |req: Request| {
//!     let gateway = Arc::clone(&gateway);
//!     async move { gateway.forward("plantilla", &req).await }
//! })
//! # }
//! ```
//!
//! The closure runs once per request. It clones the `Arc` before the
//! `async move` block so the returned future owns its own handle and is
//! `'static`, which tokio needs to move it between worker threads.
//!
//! # How handlers are stored
//!
//! The router keeps handlers of many concrete types in one
//! `HashMap<Method, Tree>`, so each is erased to a trait object:
//!
//! ```text
//! router.get("/", home)                     ← any F: Fn(Request) -> Fut
//!        ↓
//! Arc::new(home) as Arc<dyn Handler>        ← stored once, shared by all connections
//!        ↓
//! handler.call(req)  at request time        ← one vtable dispatch
//!        ↓
//! Box::pin(async { home(req).await.into_response() })   ← BoxFuture
//! ```
//!
//! The runtime cost per request is one Arc clone, one virtual call and one
//! boxed future, all negligible next to the network hop to the upstream.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future that resolves to a [`Response`].
///
/// `Pin<Box<…>>` because the runtime polls the future in place and must not
/// move it after the first poll. `Send + 'static` lets tokio move it across
/// worker threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Implemented for every valid route handler.
///
/// You never implement this yourself. The trait is **sealed** through the
/// private `Sealed` supertrait, so the blanket impl below is the only one
/// and every handler goes through the same `IntoResponse` conversion.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn call(&self, req: Request) -> BoxFuture;
}

/// Because `Sealed` is private, other crates cannot name it and therefore
/// cannot implement `Handler` on their own types.
mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn call(&self, req: Request) -> BoxFuture {
        // Calling `self` only builds the future; mapping through
        // `IntoResponse` happens once it resolves.
        let fut = self(req);
        Box::pin(async move { fut.await.into_response() })
    }
}

/// A handler shared across concurrent requests. Cloning it is one atomic
/// increment.
pub(crate) type SharedHandler = Arc<dyn Handler>;
