//! The Plantilla resource service: the record store over HTTP as JSON.
//!
//! | Path | Body |
//! |---|---|
//! | `/` | `{"mensaje": HOME_MESSAGE}` |
//! | `/acercade` | [`about()`] |
//! | `/get_arqueros` | `Envelope<ArcherSummary>` |
//! | `/get_arqueros_completos` | `Envelope<Archer>` |
//! | `/test_db` | `Envelope<Archer>` |

use std::sync::Arc;

use tracing::error;

use crate::health;
use crate::model::{About, Archer, ArcherSummary, Envelope, Message};
use crate::response::{IntoResponse, Json, Response, error_json};
use crate::status::Status;
use crate::store::{ArcherStore, StoreError};
use crate::{Request, Router};

pub const HOME_MESSAGE: &str = "Microservicio MS Plantilla: home";

pub const ABOUT_MESSAGE: &str = "Microservicio MS Plantilla: acerca de";
pub const ABOUT_AUTHOR: &str = "Carmen Huesa Guardiola";
pub const ABOUT_EMAIL: &str = "chg00016@red.ujaen.es";
pub const ABOUT_DATE: &str = "18-04-2023";

pub fn about() -> About {
    About {
        message: ABOUT_MESSAGE.to_owned(),
        author: ABOUT_AUTHOR.to_owned(),
        email: ABOUT_EMAIL.to_owned(),
        date: ABOUT_DATE.to_owned(),
    }
}

impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        error!("record store failure: {self}");
        error_json(Status::InternalServerError, &self.to_string())
    }
}

async fn home(_req: Request) -> Json<Message> {
    Json(Message { message: HOME_MESSAGE.to_owned() })
}

async fn acerca_de(_req: Request) -> Json<About> {
    Json(about())
}

fn list_summaries(store: &dyn ArcherStore) -> Result<Json<Envelope<ArcherSummary>>, StoreError> {
    Ok(Json(store.list_summaries()?.into_iter().collect()))
}

fn list_full(store: &dyn ArcherStore) -> Result<Json<Envelope<Archer>>, StoreError> {
    Ok(Json(store.list_full()?.into_iter().collect()))
}

/// All service routes plus health probes.
pub fn router(store: Arc<dyn ArcherStore>) -> Router {
    let summaries = Arc::clone(&store);
    let full = Arc::clone(&store);
    let test_db = store;

    let router = Router::new()
        .get("/", home)
        .get("/acercade", acerca_de)
        .get("/get_arqueros", move |_req: Request| {
            let store = Arc::clone(&summaries);
            async move { list_summaries(store.as_ref()) }
        })
        .get("/get_arqueros_completos", move |_req: Request| {
            let store = Arc::clone(&full);
            async move { list_full(store.as_ref()) }
        })
        .get("/test_db", move |_req: Request| {
            let store = Arc::clone(&test_db);
            async move { list_full(store.as_ref()) }
        });

    health::with_probes(router)
}
