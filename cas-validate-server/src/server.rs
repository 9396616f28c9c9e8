use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use cas_validate::{ValidationRequest, ValidationResponse};
use crate::error::ApiError;
use serde_json::{json, Value};
use std::{net::SocketAddr, time::Duration};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

/// State shared by the request handlers.
#[derive(Debug, Clone, Copy)]
pub struct AppState {
    /// How long a single validation may run.
    pub timeout: Duration,
}

/// Builds the router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/validate", post(validate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the router on the given address until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app(state)).await?;
    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Validates an answer on the blocking pool, giving up after the configured timeout. A timed
/// out validation keeps running until it finishes, but its result is discarded.
async fn validate(
    State(state): State<AppState>,
    Json(request): Json<ValidationRequest>,
) -> Result<Json<ValidationResponse>, ApiError> {
    let task = tokio::task::spawn_blocking(move || cas_validate::validate(&request));
    let result = match tokio::time::timeout(state.timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(err)) => {
            error!(%err, "validation task failed");
            return Err(ApiError::Internal(err.to_string()));
        },
        Err(_) => {
            warn!(timeout_ms = state.timeout.as_millis() as u64, "validation timed out");
            return Err(ApiError::Timeout(state.timeout));
        },
    };

    match result {
        Ok(response) => {
            info!(
                equivalent = response.equivalent,
                units_match = response.units_match,
                "validated answer",
            );
            Ok(Json(response))
        },
        Err(err) => {
            info!(%err, "rejected malformed answer");
            Err(err.into())
        },
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::IntoResponse,
    };
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;
    use super::*;

    fn test_app() -> Router {
        app(AppState { timeout: Duration::from_secs(10) })
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_validate(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/validate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_check() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn validate_equivalent() {
        let response = test_app()
            .oneshot(post_validate(json!({
                "student_expression": "x^2 - 4",
                "reference_expression": "(x-2)(x+2)",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({
            "equivalent": true,
            "equivalence_detail": "Expressions are equivalent",
            "units_match": true,
        }));
    }

    #[tokio::test]
    async fn validate_units() {
        let response = test_app()
            .oneshot(post_validate(json!({
                "student_expression": "5 km/h",
                "reference_expression": "5",
                "variables": ["km", "h"],
                "expected_units": ["m/s", "mph"],
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({
            "equivalent": false,
            "equivalence_detail": "Expressions differ",
            "units_match": false,
            "units_detail": "Expected units: m/s, mph",
        }));
    }

    #[tokio::test]
    async fn parse_failure() {
        let response = test_app()
            .oneshot(post_validate(json!({
                "student_expression": "(x + 1",
                "reference_expression": "x",
            })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Failed to parse expressions: `(x + 1`: "), "{}", detail);
    }

    #[tokio::test]
    async fn missing_field() {
        let response = test_app()
            .oneshot(post_validate(json!({ "student_expression": "x" })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn timeout_response() {
        let response = ApiError::Timeout(Duration::from_millis(250)).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body_json(response).await, json!({
            "detail": "Validation timed out after 250 ms",
        }));
    }
}
