//! HTTP server and graceful shutdown.
//!
//! # Graceful shutdown
//!
//! The three processes run under a supervisor (a container runtime, a
//! terminal, a test harness) that asks them to stop rather than killing
//! them outright. On SIGTERM or Ctrl-C, or when the future passed to
//! [`Server::serve_with_shutdown`] resolves, the server:
//! 1. Immediately stops calling `listener.accept()`. No new connections are
//!    made.
//! 2. Lets every in-flight connection task run to completion. A gateway
//!    request that is still waiting on the resource service gets its answer
//!    (or its `504`) before the process goes away.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.
//!
//! Integration tests bind `127.0.0.1:0`, hand the listener to
//! [`Server::from_listener`] and stop the server by dropping the sender of a
//! oneshot channel whose receiver is the shutdown future.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use http_body_util::Full;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::Error;
use crate::method::Method;
use crate::request::Request;
use crate::response::error_json;
use crate::router::Router;
use crate::status::Status;

/// The HTTP server.
pub struct Server {
    listener: TcpListener,
    name: &'static str,
}

impl Server {
    /// Binds `addr` and returns a server ready to [`serve`](Server::serve).
    pub async fn bind(addr: SocketAddr) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self::from_listener(listener))
    }

    /// Adopts an already-bound listener. Tests bind `127.0.0.1:0` and read
    /// the port back with [`local_addr`](Server::local_addr).
    pub fn from_listener(listener: TcpListener) -> Self {
        Self { listener, name: "plantilla" }
    }

    /// Name used in the start/stop log lines.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves `router` until SIGTERM or Ctrl-C, then drains in-flight
    /// connections.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Serves `router` until `shutdown` resolves, then drains in-flight
    /// connections.
    pub async fn serve_with_shutdown(
        self,
        router: Router,
        shutdown: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let Self { listener, name } = self;

        // Wrap router in Arc so it can be shared across concurrent connection
        // tasks without copying the routing table.
        let router = Arc::new(router);

        info!(addr = %listener.local_addr()?, "{name} listening");

        // JoinSet tracks every spawned connection task so we can wait for
        // them all to finish during graceful shutdown.
        let mut tasks = tokio::task::JoinSet::new();

        // `select!` polls the shutdown future by reference on every loop
        // iteration, so it must stay at one address between polls. That is
        // what `Pin` enforces; `tokio::pin!` pins it on the stack.
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // `biased` makes select! check arms top-to-bottom instead of
                // randomly. Shutdown is checked first so a pending signal
                // stops accepting even when more connections are queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    // TokioIo adapts tokio's AsyncRead/AsyncWrite to the hyper
                    // IO traits.
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection, not once
                        // per connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            async move { dispatch(router, req).await }
                        });

                        // `auto::Builder` serves HTTP/1.1 or HTTP/2, whichever
                        // the peer speaks. The gateway's client only speaks
                        // HTTP/1.1.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not grow
                // without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        // Drain: wait for every in-flight connection before returning.
        while tasks.join_next().await.is_some() {}

        info!("{name} stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request and produces one response.
///
/// Every failure becomes an HTTP status with a JSON body (`405` for a method
/// outside RFC 9110, `404` for an unregistered path), so the error type is
/// [`Infallible`] and hyper never tears a connection down on our account.
/// The request body is dropped unread: every route is a `GET`.
///
/// One `info!` line per request records method, path, status and latency.
async fn dispatch(
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();
    let path = parts.uri.path().to_owned();
    let raw_method = parts.method.clone();

    let response = match Method::try_from(&parts.method) {
        Err(()) => error_json(Status::MethodNotAllowed, "method not allowed"),
        Ok(method) => match router.lookup(method, &path) {
            None => error_json(Status::NotFound, "not found"),
            Some((handler, params)) => handler.call(Request::new(parts, params)).await,
        },
    };

    info!(
        method = %raw_method,
        %path,
        status = response.status_code().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "request"
    );

    Ok(response.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first SIGTERM or SIGINT (Ctrl-C only on Windows).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
