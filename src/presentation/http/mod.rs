use axum::Router;
use axum::extract::MatchedPath;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bootstrap::app_context::AppContext;

pub mod health;
pub mod orders;

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::list_orders,
        orders::submit_order,
        health::health,
    ),
    components(schemas(
        orders::OrderRequest,
        orders::OrderResponse,
        orders::OrderStatusDto,
        health::HealthResp,
        health::ComponentState,
    )),
    tags(
        (name = "Orders", description = "Book orders"),
        (name = "Health", description = "System health checks")
    )
)]
pub struct ApiDoc;

/// Full HTTP surface: order routes, health, OpenAPI docs and per-request tracing spans.
pub fn router(ctx: AppContext) -> Router {
    Router::new()
        .merge(orders::routes(ctx.clone()))
        .merge(health::routes(ctx))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &axum::http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        )
}
