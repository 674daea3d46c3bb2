//! The front end: fetches JSON through the gateway and renders it into the
//! Article region.
//!
//! Every procedure is one fetch followed by one full replacement of the
//! Article. A network failure raises an alert, is logged, and leaves the
//! Article untouched. Nothing is retried or cached between calls.

use std::sync::Arc;

use http::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{error, warn};

use crate::client::{HttpClient, join_uri};
use crate::model::{Archer, ArcherSummary};
use crate::render::{self, Entry, View, escape};
use crate::{Request, Response, Router};

pub const ALERT_GATEWAY_UNREACHABLE: &str = "Error: No se han podido acceder al API Gateway";

/// The named content region. `update` replaces its title and body wholesale.
pub trait Article {
    fn update(&mut self, title: &str, body: &str);
}

/// Where user-visible alerts go.
pub trait Alert {
    fn alert(&mut self, message: &str);
}

/// An Article plus alert list, composed into one HTML page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Page {
    pub title: String,
    pub body: String,
    pub alerts: Vec<String>,
}

pub const DEFAULT_TITLE: &str = "Plantilla";
pub const DEFAULT_BODY: &str = "<p>Elija una opción del menú.</p>";

impl Default for Page {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_owned(),
            body: DEFAULT_BODY.to_owned(),
            alerts: Vec::new(),
        }
    }
}

impl Article for Page {
    fn update(&mut self, title: &str, body: &str) {
        self.title = title.to_owned();
        self.body = body.to_owned();
    }
}

impl Alert for Page {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_owned());
    }
}

pub struct Frontend {
    client: HttpClient,
    gateway: String,
    resource: String,
}

impl Frontend {
    /// `gateway` is the gateway base address; `resource` the prefix the
    /// gateway exposes the service under (e.g. `plantilla`).
    pub fn new(client: HttpClient, gateway: &str, resource: &str) -> Self {
        Self {
            client,
            gateway: gateway.to_owned(),
            resource: resource.trim_matches('/').to_owned(),
        }
    }

    fn route(&self, path: &str) -> String {
        format!("/{}{path}", self.resource)
    }

    /// GETs `route` from the gateway. `None` after alerting on network
    /// failure; `Some(None)` when the body is not JSON.
    async fn download<S: Alert + ?Sized>(&self, route: &str, screen: &mut S) -> Option<Option<Value>> {
        let fetched = match join_uri(&self.gateway, route) {
            Ok(uri) => self.client.get(uri, &HeaderMap::new()).await,
            Err(e) => Err(e),
        };
        match fetched {
            Ok(f) => match serde_json::from_slice(&f.body) {
                Ok(v) => Some(Some(v)),
                Err(e) => {
                    warn!(route, status = f.status.as_u16(), "response is not JSON: {e}");
                    Some(None)
                }
            },
            Err(e) => {
                screen.alert(ALERT_GATEWAY_UNREACHABLE);
                error!(route, "{e}");
                None
            }
        }
    }

    /// Fetches `route` and hands the whole payload to `render`.
    pub async fn fetch_payload_and_render<S>(
        &self,
        route: &str,
        render: impl FnOnce(Option<&Value>) -> View,
        screen: &mut S,
    ) where
        S: Article + Alert + ?Sized,
    {
        if let Some(payload) = self.download(route, screen).await {
            let view = render(payload.as_ref());
            screen.update(view.title, &view.body);
        }
    }

    /// Fetches an Envelope from `route`, unwraps its outer `data` array and
    /// hands the decoded records to `render`.
    pub async fn fetch_and_render<T, S>(
        &self,
        route: &str,
        render: impl FnOnce(&[Entry<T>]) -> View,
        screen: &mut S,
    ) where
        T: DeserializeOwned,
        S: Article + Alert + ?Sized,
    {
        if let Some(payload) = self.download(route, screen).await {
            let entries = payload.as_ref().map(decode_entries::<T>).unwrap_or_default();
            let view = render(&entries);
            screen.update(view.title, &view.body);
        }
    }

    pub async fn show_home<S: Article + Alert + ?Sized>(&self, screen: &mut S) {
        self.fetch_payload_and_render(&self.route("/"), render::render_home, screen).await;
    }

    pub async fn show_about<S: Article + Alert + ?Sized>(&self, screen: &mut S) {
        self.fetch_payload_and_render(&self.route("/acercade"), render::render_about, screen)
            .await;
    }

    pub async fn list_names<S: Article + Alert + ?Sized>(&self, screen: &mut S) {
        self.fetch_and_render::<ArcherSummary, _>(
            &self.route("/get_arqueros"),
            render::render_summary_table::<Entry<ArcherSummary>>,
            screen,
        )
        .await;
    }

    pub async fn list_full<S: Article + Alert + ?Sized>(&self, screen: &mut S) {
        self.fetch_and_render::<Archer, _>(
            &self.route("/get_arqueros_completos"),
            render::render_full_table::<Entry<Archer>>,
            screen,
        )
        .await;
    }

    pub async fn list_names_sorted<S: Article + Alert + ?Sized>(&self, screen: &mut S) {
        self.fetch_and_render::<ArcherSummary, _>(
            &self.route("/get_arqueros"),
            render::render_sorted_summary_table::<Entry<ArcherSummary>>,
            screen,
        )
        .await;
    }
}

/// `{"data":[{"data":record}, ...]}` → one entry per element. Elements that
/// do not decode become [`Entry::Invalid`]; a payload without a `data` array
/// yields no entries.
pub fn decode_entries<T: DeserializeOwned>(payload: &Value) -> Vec<Entry<T>> {
    let Some(docs) = payload.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };
    docs.iter()
        .map(|doc| {
            doc.get("data")
                .and_then(|record| T::deserialize(record).ok())
                .map_or(Entry::Invalid, Entry::Valid)
        })
        .collect()
}

// ── Web front end ─────────────────────────────────────────────────────────────

const MENU: [(&str, &str); 5] = [
    ("/home", "Home"),
    ("/acercade", "Acerca de"),
    ("/arqueros", "Listar nombres"),
    ("/arqueros_completos", "Listar todo"),
    ("/arqueros_ordenados", "Listar nombres ordenados"),
];

/// The full HTML document around a [`Page`].
pub fn page_html(page: &Page) -> String {
    let menu: String = MENU
        .iter()
        .map(|(href, label)| format!("<a href=\"{href}\">{label}</a>\n"))
        .collect();
    let alerts: String = page
        .alerts
        .iter()
        .map(|a| format!("<div class=\"alert\" role=\"alert\">{}</div>\n", escape(a)))
        .collect();
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<nav>\n{menu}</nav>\n{alerts}<article>\n<h1>{title}</h1>\n<section>\n{body}\n</section>\n</article>\n</body>\n</html>\n",
        title = escape(&page.title),
        body = page.body,
    )
}

/// The page shell at `/` and one page per procedure.
pub fn router(frontend: Arc<Frontend>) -> Router {
    let home = Arc::clone(&frontend);
    let about = Arc::clone(&frontend);
    let names = Arc::clone(&frontend);
    let full = Arc::clone(&frontend);
    let sorted = frontend;

    Router::new()
        .get("/", |_req: Request| async { Response::html(page_html(&Page::default())) })
        .get("/home", move |_req: Request| {
            let fe = Arc::clone(&home);
            async move {
                let mut page = Page::default();
                fe.show_home(&mut page).await;
                Response::html(page_html(&page))
            }
        })
        .get("/acercade", move |_req: Request| {
            let fe = Arc::clone(&about);
            async move {
                let mut page = Page::default();
                fe.show_about(&mut page).await;
                Response::html(page_html(&page))
            }
        })
        .get("/arqueros", move |_req: Request| {
            let fe = Arc::clone(&names);
            async move {
                let mut page = Page::default();
                fe.list_names(&mut page).await;
                Response::html(page_html(&page))
            }
        })
        .get("/arqueros_completos", move |_req: Request| {
            let fe = Arc::clone(&full);
            async move {
                let mut page = Page::default();
                fe.list_full(&mut page).await;
                Response::html(page_html(&page))
            }
        })
        .get("/arqueros_ordenados", move |_req: Request| {
            let fe = Arc::clone(&sorted);
            async move {
                let mut page = Page::default();
                fe.list_names_sorted(&mut page).await;
                Response::html(page_html(&page))
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_marks_malformed_records_invalid() {
        let payload = json!({ "data": [
            { "data": { "nombre": "Carmen", "apellido": "Huesa" } },
            { "data": { "nombre": "Sin apellido" } },
            { "otro": 1 },
        ]});
        let entries: Vec<Entry<ArcherSummary>> = decode_entries(&payload);
        assert_eq!(entries.len(), 3);
        assert!(matches!(&entries[0], Entry::Valid(s) if s.name == "Carmen"));
        assert_eq!(entries[1], Entry::Invalid);
        assert_eq!(entries[2], Entry::Invalid);
    }

    #[test]
    fn decode_without_data_array_is_empty() {
        let entries: Vec<Entry<Archer>> = decode_entries(&json!({ "error": "bad gateway" }));
        assert!(entries.is_empty());
    }

    #[test]
    fn page_html_escapes_alerts() {
        let mut page = Page::default();
        page.alert("<oops>");
        let html = page_html(&page);
        assert!(html.contains("&lt;oops&gt;"));
        assert!(html.contains(DEFAULT_BODY));
    }

    #[tokio::test]
    async fn network_failure_alerts_and_leaves_article() {
        let client = HttpClient::new(std::time::Duration::from_millis(500));
        let fe = Frontend::new(client, "http://127.0.0.1:9", "plantilla");
        let mut page = Page::default();
        fe.list_full(&mut page).await;
        assert_eq!(page.alerts, [ALERT_GATEWAY_UNREACHABLE]);
        assert_eq!(page.title, DEFAULT_TITLE);
        assert_eq!(page.body, DEFAULT_BODY);
    }
}
