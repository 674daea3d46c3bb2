#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http::HeaderMap;
use plantilla::client::{Fetched, HttpClient, join_uri};
use plantilla::store::MemoryStore;
use plantilla::{Router, Server, service};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A server on an ephemeral port; stops when dropped.
pub struct Running {
    pub addr: SocketAddr,
    _stop: oneshot::Sender<()>,
}

impl Running {
    pub fn base(&self) -> String {
        format!("http://{}", self.addr)
    }
}

pub async fn spawn(router: Router) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let server = Server::from_listener(listener);
    let addr = server.local_addr().unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    tokio::spawn(async move {
        server
            .serve_with_shutdown(router, async {
                let _ = stopped.await;
            })
            .await
            .unwrap();
    });
    Running { addr, _stop: stop }
}

pub async fn spawn_service() -> Running {
    spawn(service::router(Arc::new(MemoryStore::reference()))).await
}

/// An address nothing listens on.
pub async fn dead_addr() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn client() -> HttpClient {
    HttpClient::new(Duration::from_secs(3))
}

pub async fn get(base: &str, path: &str) -> Fetched {
    client()
        .get(join_uri(base, path).unwrap(), &HeaderMap::new())
        .await
        .unwrap()
}

pub fn json(fetched: &Fetched) -> serde_json::Value {
    serde_json::from_slice(&fetched.body).unwrap()
}
