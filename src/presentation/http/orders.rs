use std::borrow::Cow;
use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::application::use_cases::orders::list_orders::ListOrders;
use crate::application::use_cases::orders::submit_order::SubmitOrder;
use crate::bootstrap::app_context::AppContext;
use crate::domain::orders::order::{self as domain, OrderStatus};

pub const MAX_ITEMS_PER_ORDER: i32 = 5;

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatusDto {
    Accepted,
    Rejected,
    Dispatched,
}

impl From<OrderStatus> for OrderStatusDto {
    fn from(s: OrderStatus) -> Self {
        match s {
            OrderStatus::Accepted => OrderStatusDto::Accepted,
            OrderStatus::Rejected => OrderStatusDto::Rejected,
            OrderStatus::Dispatched => OrderStatusDto::Dispatched,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: i64,
    pub book_isbn: String,
    pub book_name: Option<String>,
    pub book_price: Option<f64>,
    pub quantity: i32,
    pub status: OrderStatusDto,
    pub created_date: chrono::DateTime<chrono::Utc>,
    pub last_modified_date: chrono::DateTime<chrono::Utc>,
    pub version: i32,
}

impl From<domain::Order> for OrderResponse {
    fn from(o: domain::Order) -> Self {
        OrderResponse {
            id: o.id,
            book_isbn: o.book_isbn,
            book_name: o.book_name,
            book_price: o.book_price,
            quantity: o.quantity,
            status: o.status.into(),
            created_date: o.created_date,
            last_modified_date: o.last_modified_date,
            version: o.version,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OrderRequest {
    #[validate(
        required(message = "The book ISBN must be defined."),
        custom(function = "not_blank", message = "The book ISBN must be defined.")
    )]
    pub isbn: Option<String>,
    #[validate(
        required(message = "The book quantity must be defined."),
        custom(function = "quantity_in_bounds")
    )]
    pub quantity: Option<i32>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn quantity_in_bounds(value: i32) -> Result<(), ValidationError> {
    if value < 1 {
        return Err(ValidationError::new("min")
            .with_message(Cow::Borrowed("You must order at least 1 item.")));
    }
    if value > MAX_ITEMS_PER_ORDER {
        return Err(ValidationError::new("max")
            .with_message(Cow::Borrowed("You cannot order more than 5 items.")));
    }
    Ok(())
}

fn validation_body(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let first = errs.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            Some((field.to_string(), message))
        })
        .collect()
}

fn error_body(status: StatusCode, body: BTreeMap<String, String>) -> Response {
    (status, Json(body)).into_response()
}

#[utoipa::path(get, path = "/orders", tag = "Orders",
    responses((status = 200, body = [OrderResponse])))]
pub async fn list_orders(
    State(ctx): State<AppContext>,
) -> Result<Json<Vec<OrderResponse>>, StatusCode> {
    let repo = ctx.order_repo();
    let uc = ListOrders {
        repo: repo.as_ref(),
    };
    let orders = uc.execute().await.map_err(|e| {
        tracing::error!(error = ?e, "list_orders_failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(orders.into_iter().map(Into::into).collect()))
}

#[utoipa::path(post, path = "/orders", tag = "Orders", request_body = OrderRequest,
    responses(
        (status = 200, body = OrderResponse),
        (status = 400, description = "Invalid order request"),
        (status = 415, description = "Body is not JSON")
    ))]
pub async fn submit_order(
    State(ctx): State<AppContext>,
    payload: Result<Json<OrderRequest>, JsonRejection>,
) -> Result<Json<OrderResponse>, Response> {
    let Json(req) = payload.map_err(|rejection| {
        let mut body = BTreeMap::new();
        body.insert("body".to_string(), rejection.body_text());
        error_body(rejection.status(), body)
    })?;
    req.validate()
        .map_err(|e| error_body(StatusCode::BAD_REQUEST, validation_body(&e)))?;
    let (Some(isbn), Some(quantity)) = (req.isbn, req.quantity) else {
        return Err(StatusCode::BAD_REQUEST.into_response());
    };

    let books = ctx.book_client();
    let repo = ctx.order_repo();
    let uc = SubmitOrder {
        books: books.as_ref(),
        repo: repo.as_ref(),
        policy: ctx.catalog_policy(),
    };
    let order = uc.execute(isbn.trim(), quantity).await.map_err(|e| {
        tracing::error!(error = ?e, "submit_order_failed");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })?;
    Ok(Json(order.into()))
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(submit_order))
        .with_state(ctx)
}
