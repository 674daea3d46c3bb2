mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{dead_addr, get, json, spawn, spawn_service};
use http::StatusCode;
use http::header::CONTENT_TYPE;
use plantilla::client::HttpClient;
use plantilla::gateway::{self, Gateway};
use plantilla::{Request, Response, Router, service::HOME_MESSAGE};

async fn spawn_gateway(upstream: &str, timeout: Duration) -> common::Running {
    let gw = Gateway::new(HttpClient::new(timeout)).route("plantilla", upstream);
    spawn(gateway::router(Arc::new(gw))).await
}

#[tokio::test]
async fn forwards_byte_identical_body() {
    let svc = spawn_service().await;
    let gw = spawn_gateway(&svc.base(), Duration::from_secs(3)).await;

    for path in ["/", "/acercade", "/get_arqueros", "/get_arqueros_completos"] {
        let direct = get(&svc.base(), path).await;
        let proxied = get(&gw.base(), &format!("/plantilla{path}")).await;
        assert_eq!(proxied.status, direct.status, "{path}");
        assert_eq!(proxied.headers[CONTENT_TYPE], "application/json", "{path}");
        assert_eq!(proxied.body, direct.body, "{path}");
    }
}

#[tokio::test]
async fn bare_prefix_maps_to_home() {
    let svc = spawn_service().await;
    let gw = spawn_gateway(&svc.base(), Duration::from_secs(3)).await;
    let res = get(&gw.base(), "/plantilla").await;
    assert_eq!(json(&res)["mensaje"], HOME_MESSAGE);
}

#[tokio::test]
async fn nested_path_and_query_reach_upstream() {
    let echo = spawn(
        Router::new().get("/{*path}", |req: Request| async move { req.path_and_query() }),
    )
    .await;
    let gw = spawn_gateway(&echo.base(), Duration::from_secs(3)).await;
    let res = get(&gw.base(), "/plantilla/a/b?x=1&y=2").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body.as_ref(), b"/a/b?x=1&y=2");
}

#[tokio::test]
async fn upstream_404_is_relayed() {
    let svc = spawn_service().await;
    let gw = spawn_gateway(&svc.base(), Duration::from_secs(3)).await;
    let res = get(&gw.base(), "/plantilla/no_existe").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unregistered_prefix_is_not_forwarded() {
    let svc = spawn_service().await;
    let gw = spawn_gateway(&svc.base(), Duration::from_secs(3)).await;
    let res = get(&gw.base(), "/get_arqueros").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unreachable_upstream_is_502() {
    let gw = spawn_gateway(&dead_addr().await, Duration::from_secs(3)).await;
    let res = get(&gw.base(), "/plantilla/get_arqueros").await;
    assert_eq!(res.status, StatusCode::BAD_GATEWAY);
    assert_eq!(res.headers[CONTENT_TYPE], "application/json");
    assert!(json(&res)["error"].is_string());
}

#[tokio::test]
async fn slow_upstream_is_504() {
    let slow = spawn(Router::new().get("/get_arqueros", |_req: Request| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Response::json(r#"{"data":[]}"#)
    }))
    .await;
    let gw = spawn_gateway(&slow.base(), Duration::from_millis(200)).await;
    let res = get(&gw.base(), "/plantilla/get_arqueros").await;
    assert_eq!(res.status, StatusCode::GATEWAY_TIMEOUT);
}
