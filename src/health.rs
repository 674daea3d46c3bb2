//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can it serve traffic? |
//!
//! Both the resource service and the gateway mount them; see
//! [`with_probes`].

use crate::{Request, Response, Router};

/// Always `200 OK` with body `"ok"`.
pub async fn liveness(_req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"`. The record store is loaded before the
/// listener is bound, so a process that answers is ready.
pub async fn readiness(_req: Request) -> Response {
    Response::text("ready")
}

/// Registers `/healthz` and `/readyz` on `router`.
pub fn with_probes(router: Router) -> Router {
    router
        .get("/healthz", liveness)
        .get("/readyz", readiness)
}
