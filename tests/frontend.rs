mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{dead_addr, get, spawn, spawn_service};
use plantilla::client::HttpClient;
use plantilla::frontend::{self, ALERT_GATEWAY_UNREACHABLE, DEFAULT_BODY, Frontend, Page};
use plantilla::gateway::{self, Gateway};
use plantilla::render::{
    ABOUT_TITLE, FULL_HEADER, FULL_TITLE, HOME_TITLE, INVALID_FIELD, INVALID_MESSAGE,
    SORTED_TITLE, SUMMARY_HEADER, SUMMARY_TITLE, TABLE_FOOTER,
};
use plantilla::service::{ABOUT_AUTHOR, HOME_MESSAGE};
use plantilla::{Handler, Request, Response, Router, Status, error_json};

struct Stack {
    _svc: common::Running,
    gw: common::Running,
}

async fn stack() -> Stack {
    let svc = spawn_service().await;
    let gw = Gateway::new(HttpClient::new(Duration::from_secs(3))).route("plantilla", &svc.base());
    let gw = spawn(gateway::router(Arc::new(gw))).await;
    Stack { _svc: svc, gw }
}

fn frontend_for(gateway: &str) -> Frontend {
    Frontend::new(HttpClient::new(Duration::from_secs(3)), gateway, "plantilla")
}

#[tokio::test]
async fn home_and_about_render_through_gateway() {
    let s = stack().await;
    let fe = frontend_for(&s.gw.base());

    let mut page = Page::default();
    fe.show_home(&mut page).await;
    assert_eq!(page.title, HOME_TITLE);
    assert_eq!(page.body, HOME_MESSAGE);

    fe.show_about(&mut page).await;
    assert_eq!(page.title, ABOUT_TITLE);
    assert!(page.body.contains(ABOUT_AUTHOR));
    assert!(page.alerts.is_empty());
}

#[tokio::test]
async fn summary_lists_ten_rows_in_store_order() {
    let s = stack().await;
    let fe = frontend_for(&s.gw.base());
    let mut page = Page::default();
    fe.list_names(&mut page).await;

    assert_eq!(page.title, SUMMARY_TITLE);
    assert_eq!(page.body.matches("<tr ").count(), 10);
    assert!(page.body.find("Carmen").unwrap() < page.body.find("Brady").unwrap());
    assert!(!page.body.contains("{{"));
}

#[tokio::test]
async fn sorted_summary_orders_by_name() {
    let s = stack().await;
    let fe = frontend_for(&s.gw.base());
    let mut page = Page::default();
    fe.list_names_sorted(&mut page).await;

    assert_eq!(page.title, SORTED_TITLE);
    let an = page.body.find(r#"title="An""#).unwrap();
    let brady = page.body.find(r#"title="Brady""#).unwrap();
    let sara = page.body.find(r#"title="Sara""#).unwrap();
    assert!(an < brady && brady < sara);
}

#[tokio::test]
async fn full_table_has_every_field() {
    let s = stack().await;
    let fe = frontend_for(&s.gw.base());
    let mut page = Page::default();
    fe.list_full(&mut page).await;

    assert_eq!(page.title, FULL_TITLE);
    assert!(page.body.contains("<td>Huesa Guardiola</td>"));
    assert!(page.body.contains("<td>Compuesto, 50, Aluminio</td>"));
    assert!(!page.body.contains(INVALID_FIELD));
}

#[tokio::test]
async fn malformed_records_render_as_placeholder() {
    let bad = spawn(Router::new().get("/get_arqueros_completos", |_req: Request| async {
        Response::json(r#"{"data":[{"data":{"nombre":"Solo nombre"}}]}"#)
    }))
    .await;
    let gw = Gateway::new(HttpClient::new(Duration::from_secs(3))).route("plantilla", &bad.base());
    let gw = spawn(gateway::router(Arc::new(gw))).await;

    let fe = frontend_for(&gw.base());
    let mut page = Page::default();
    fe.list_full(&mut page).await;
    assert_eq!(page.body.matches("<tr ").count(), 1);
    assert!(page.body.contains(INVALID_FIELD));
    assert!(!page.body.contains("Solo nombre"));
}

/// Stands in for the gateway: answers every `/plantilla/...` route with the
/// same response.
async fn spawn_fake_gateway<H: Handler + Clone>(answer: H) -> common::Running {
    spawn(Router::new().get("/plantilla/", answer.clone()).get("/plantilla/{*rest}", answer)).await
}

#[tokio::test]
async fn non_json_body_renders_empty_table_and_invalid_message() {
    let gw = spawn_fake_gateway(|_req: Request| async {
        Response::html("<html><body>Service Unavailable</body></html>")
    })
    .await;
    let fe = frontend_for(&gw.base());
    let mut page = Page::default();

    fe.list_full(&mut page).await;
    assert_eq!(page.title, FULL_TITLE);
    assert_eq!(page.body, format!("{FULL_HEADER}{TABLE_FOOTER}"));

    fe.show_home(&mut page).await;
    assert_eq!(page.title, HOME_TITLE);
    assert_eq!(page.body, INVALID_MESSAGE);

    fe.show_about(&mut page).await;
    assert!(page.body.contains(INVALID_MESSAGE));
    assert!(page.alerts.is_empty());
}

#[tokio::test]
async fn gateway_error_payload_renders_empty_table_without_alert() {
    let gw = spawn_fake_gateway(|_req: Request| async {
        error_json(Status::BadGateway, "request to http://127.0.0.1:8002/ failed")
    })
    .await;
    let fe = frontend_for(&gw.base());
    let mut page = Page::default();

    fe.list_names(&mut page).await;
    assert_eq!(page.title, SUMMARY_TITLE);
    assert_eq!(page.body, format!("{SUMMARY_HEADER}{TABLE_FOOTER}"));

    fe.list_names_sorted(&mut page).await;
    assert_eq!(page.title, SORTED_TITLE);
    assert_eq!(page.body, format!("{SUMMARY_HEADER}{TABLE_FOOTER}"));
    assert!(page.alerts.is_empty());
}

#[tokio::test]
async fn gateway_down_alerts_without_touching_article() {
    let fe = frontend_for(&dead_addr().await);
    let mut page = Page::default();
    fe.list_names_sorted(&mut page).await;
    assert_eq!(page.alerts, [ALERT_GATEWAY_UNREACHABLE]);
    assert_eq!(page, Page { alerts: page.alerts.clone(), ..Page::default() });
}

#[tokio::test]
async fn web_pages_embed_rendered_article() {
    let s = stack().await;
    let site = spawn(frontend::router(Arc::new(frontend_for(&s.gw.base())))).await;

    let shell = get(&site.base(), "/").await;
    let shell = String::from_utf8(shell.body.to_vec()).unwrap();
    assert!(shell.contains(DEFAULT_BODY));
    assert!(shell.contains(r#"href="/arqueros_ordenados""#));

    let res = get(&site.base(), "/arqueros_completos").await;
    assert_eq!(res.headers[http::header::CONTENT_TYPE], "text/html; charset=utf-8");
    let html = String::from_utf8(res.body.to_vec()).unwrap();
    assert!(html.contains("listado_arqueros_completo"));
    assert!(html.contains("Carmen"));
}
