//! HTTP surface over [`OrderService`].

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::service::OrderService;
use crate::store::StoreError;
use crate::types::OrderPacks;

type ApiResult<T> = Result<T, (StatusCode, String)>;

#[derive(Debug, Deserialize, Serialize)]
pub struct PackRequest {
    pub size: u32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PackListResponse {
    pub sizes: Vec<u32>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OrderRequest {
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PackCount {
    pub size: u32,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub quantity: u32,
    pub packs: Vec<PackCount>,
    pub total_items: u64,
    pub total_packs: u64,
}

impl From<&OrderPacks> for OrderResponse {
    fn from(packs: &OrderPacks) -> Self {
        Self {
            order_id: packs.order_id,
            quantity: packs.quantity,
            packs: packs
                .arrangement
                .packs()
                .map(|(size, quantity)| PackCount { size, quantity })
                .collect(),
            total_items: packs.arrangement.total_items(),
            total_packs: packs.arrangement.total_packs(),
        }
    }
}

fn status_for(err: &Error) -> StatusCode {
    if err.is_invalid_input() {
        return StatusCode::BAD_REQUEST;
    }
    match err {
        Error::Store(StoreError::DuplicatePack(_) | StoreError::DuplicateOrder(_)) => {
            StatusCode::CONFLICT
        }
        Error::Store(
            StoreError::PackNotFound(_)
            | StoreError::OrderNotFound(_)
            | StoreError::OrderPacksNotFound(_),
        ) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Unwraps a JSON body. Unparsable JSON is 422, a body that parses but does
/// not match the request shape is 400.
fn decode<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    match body {
        Ok(Json(req)) => Ok(req),
        Err(rejection) => {
            let status = match &rejection {
                JsonRejection::JsonSyntaxError(_) => StatusCode::UNPROCESSABLE_ENTITY,
                JsonRejection::JsonDataError(_) => StatusCode::BAD_REQUEST,
                other => other.status(),
            };
            tracing::warn!(error = %rejection, "invalid request body");
            Err((status, rejection.body_text()))
        }
    }
}

fn reject(err: Error) -> (StatusCode, String) {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    } else {
        tracing::warn!(error = %err, "request rejected");
    }
    (status, err.to_string())
}

async fn health() -> &'static str {
    "ok"
}

async fn list_packs(State(service): State<OrderService>) -> ApiResult<Json<PackListResponse>> {
    let sizes = service.pack_sizes().map_err(reject)?;
    Ok(Json(PackListResponse { sizes }))
}

async fn add_pack(
    State(service): State<OrderService>,
    body: Result<Json<PackRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let req = decode(body)?;
    tracing::info!(size = req.size, "POST /pack");
    service.add_pack(req.size).map_err(reject)?;
    Ok(StatusCode::CREATED)
}

async fn remove_pack(
    State(service): State<OrderService>,
    body: Result<Json<PackRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let req = decode(body)?;
    tracing::info!(size = req.size, "DELETE /pack");
    service.remove_pack(req.size).map_err(reject)?;
    Ok(StatusCode::OK)
}

async fn create_order(
    State(service): State<OrderService>,
    body: Result<Json<OrderRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<OrderResponse>)> {
    let req = decode(body)?;
    tracing::info!(quantity = req.quantity, "POST /order");

    // Solving is CPU bound and scales with the quantity.
    let packs = tokio::task::spawn_blocking(move || service.place_order(req.quantity))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(reject)?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(&packs))))
}

async fn get_order(
    State(service): State<OrderService>,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<OrderResponse>> {
    let packs = service.order_packs(order_id).map_err(reject)?;
    Ok(Json(OrderResponse::from(&packs)))
}

/// Routes under `/api/v1`.
pub fn router(service: OrderService) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/pack", get(list_packs).post(add_pack).delete(remove_pack))
        .route("/order", post(create_order))
        .route("/order/{order_id}", get(get_order));

    Router::new().nest("/api/v1", api).with_state(service)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, header};
    use tower::ServiceExt;

    use super::*;
    use crate::store::MemoryStore;

    fn app(packs: &[u32]) -> Router {
        let store = MemoryStore::with_packs(packs.iter().copied());
        router(OrderService::new(Arc::new(store)).with_max_quantity(10_000))
    }

    fn json_request(method: Method, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(&[])
            .oneshot(empty_request(Method::GET, "/api/v1/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_order() {
        let response = app(&[2, 5])
            .oneshot(json_request(Method::POST, "/api/v1/order", r#"{"quantity": 12}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: OrderResponse = body_json(response).await;
        assert_eq!(body.quantity, 12);
        assert_eq!(
            body.packs,
            vec![
                PackCount { size: 2, quantity: 1 },
                PackCount { size: 5, quantity: 2 },
            ]
        );
        assert_eq!(body.total_items, 12);
        assert_eq!(body.total_packs, 3);
    }

    #[tokio::test]
    async fn test_get_order_after_create() {
        let app = app(&[15, 33, 50]);
        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/v1/order", r#"{"quantity": 100}"#))
            .await
            .unwrap();
        let created: OrderResponse = body_json(response).await;

        let uri = format!("/api/v1/order/{}", created.order_id);
        let response = app.oneshot(empty_request(Method::GET, &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: OrderResponse = body_json(response).await;
        assert_eq!(fetched, created);
        assert_eq!(fetched.packs, vec![PackCount { size: 50, quantity: 2 }]);
    }

    #[tokio::test]
    async fn test_order_errors() {
        let cases = [
            (r#"{"quantity": 0}"#, StatusCode::BAD_REQUEST),
            (r#"{"quantity": 10001}"#, StatusCode::BAD_REQUEST),
            (r#"{"quantity": -5}"#, StatusCode::BAD_REQUEST),
            (r#"{"Order": 2}"#, StatusCode::BAD_REQUEST),
            ("{quantity 2", StatusCode::UNPROCESSABLE_ENTITY),
        ];
        for (body, expected) in cases {
            let response = app(&[2, 5])
                .oneshot(json_request(Method::POST, "/api/v1/order", body))
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "body {body}");
        }
    }

    #[tokio::test]
    async fn test_pack_body_errors() {
        let cases = [
            (Method::POST, r#"{"PackSize": 2}"#, StatusCode::BAD_REQUEST),
            (Method::POST, "{size: 2", StatusCode::UNPROCESSABLE_ENTITY),
            (Method::DELETE, r#"{"PackSize": 2}"#, StatusCode::BAD_REQUEST),
            (Method::DELETE, "{size: 2", StatusCode::UNPROCESSABLE_ENTITY),
        ];
        for (method, body, expected) in cases {
            let response = app(&[2])
                .oneshot(json_request(method.clone(), "/api/v1/pack", body))
                .await
                .unwrap();
            assert_eq!(response.status(), expected, "{method} body {body}");
        }
    }

    #[tokio::test]
    async fn test_order_without_packs() {
        let store = Arc::new(MemoryStore::new());
        let service = OrderService::new(store);
        let order = service.create_order(3).unwrap();
        assert!(service.calculate_order_packs(order.id).is_err());
        let app = router(service);

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/v1/order", r#"{"quantity": 3}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let uri = format!("/api/v1/order/{}", order.id);
        let response = app.oneshot(empty_request(Method::GET, &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let message = String::from_utf8(bytes.to_vec()).unwrap();
        assert_eq!(message, format!("no pack breakdown saved for order {}", order.id));
    }

    #[tokio::test]
    async fn test_unknown_order() {
        let uri = format!("/api/v1/order/{}", Uuid::new_v4());
        let response = app(&[2]).oneshot(empty_request(Method::GET, &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_order_methods_not_allowed() {
        for method in [Method::PUT, Method::DELETE, Method::PATCH] {
            let response = app(&[2, 5])
                .oneshot(json_request(method.clone(), "/api/v1/order", r#"{"quantity": 5}"#))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        }
    }

    #[tokio::test]
    async fn test_pack_lifecycle() {
        let app = app(&[250]);

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/v1/pack", r#"{"size": 500}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/v1/pack", r#"{"size": 500}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(json_request(Method::POST, "/api/v1/pack", r#"{"size": 0}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request(Method::DELETE, "/api/v1/pack", r#"{"size": 250}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(Method::DELETE, "/api/v1/pack", r#"{"size": 250}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(empty_request(Method::GET, "/api/v1/pack"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: PackListResponse = body_json(response).await;
        assert_eq!(body.sizes, vec![500]);
    }
}
