use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use utoipa::ToSchema;

use crate::bootstrap::app_context::AppContext;

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentState {
    Up,
    Down,
}

impl<E> From<Result<(), E>> for ComponentState {
    fn from(r: Result<(), E>) -> Self {
        if r.is_ok() {
            ComponentState::Up
        } else {
            ComponentState::Down
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResp {
    /// `ok` when every dependency is up, `degraded` otherwise.
    pub status: &'static str,
    pub database: ComponentState,
    pub catalog: ComponentState,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, body = HealthResp))
)]
pub async fn health(State(ctx): State<AppContext>) -> Json<HealthResp> {
    let repo = ctx.order_repo();
    let books = ctx.book_client();
    let timeout = ctx.catalog_policy().timeout;

    let (db, catalog) = tokio::join!(repo.ping(), async {
        match tokio::time::timeout(timeout, books.ping()).await {
            Ok(res) => res.map_err(anyhow::Error::from),
            Err(_) => Err(anyhow::anyhow!("catalog ping timed out")),
        }
    });
    if let Err(e) = &db {
        tracing::warn!(error = ?e, "health_database_down");
    }
    if let Err(e) = &catalog {
        tracing::warn!(error = ?e, "health_catalog_down");
    }

    let database = ComponentState::from(db);
    let catalog = ComponentState::from(catalog);
    let status = if database == ComponentState::Up && catalog == ComponentState::Up {
        "ok"
    } else {
        "degraded"
    };
    Json(HealthResp {
        status,
        database,
        catalog,
    })
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new().route("/health", get(health)).with_state(ctx)
}
