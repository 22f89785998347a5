// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Application state and router.

use crate::config::Config;
use crate::routes;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use ifc_view_filter::{ModelQueryExecutor, ModelStepper, SharedVisibility};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub stepper: Arc<ModelStepper>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let stepper = ModelStepper::new(
            ModelQueryExecutor,
            SharedVisibility::new(),
            config.empty_result_policy,
        );
        Self {
            stepper: Arc::new(stepper),
            config: Arc::new(config),
        }
    }
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the API router with all middleware.
pub fn build_router(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    Router::new()
        // Root endpoint - API information
        .route("/", get(routes::health::info))
        .route("/api/v1/health", get(routes::health::check))
        // Model
        .route(
            "/api/v1/model",
            post(routes::model::upload).get(routes::model::summary),
        )
        .route("/api/v1/elements/:id/properties", get(routes::elements::properties))
        // Filter stepper
        .route(
            "/api/v1/filters",
            get(routes::filters::list).post(routes::filters::add),
        )
        .route("/api/v1/filters/next", post(routes::filters::next))
        .route("/api/v1/filters/previous", post(routes::filters::previous))
        .route("/api/v1/visibility", get(routes::visibility::visible))
        // Middleware
        .layer(DefaultBodyLimit::max(config.max_file_size_bytes()))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs)))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const FIXTURE: &str = include_str!("../../../rust/model/tests/ifc/small_house.ifc");
    const BOUNDARY: &str = "ifc-view-test-boundary";

    fn router() -> Router {
        build_router(AppState::new(Config::default()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        send(app, request).await
    }

    async fn post_empty(app: &Router, uri: &str) -> (StatusCode, Value) {
        send(app, Request::post(uri).body(Body::empty()).unwrap()).await
    }

    async fn upload(app: &Router, field: &str, content: &str) -> (StatusCode, Value) {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"small_house.ifc\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/model")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        send(app, request).await
    }

    #[tokio::test]
    async fn test_health_and_info() {
        let app = router();
        let (status, body) = get(&app, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, body) = get(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["endpoints"].as_array().unwrap().len(), 9);
    }

    #[tokio::test]
    async fn test_filters_before_model_warn() {
        let app = router();
        let (status, body) = post_json(
            &app,
            "/api/v1/filters",
            json!({ "category": "Wall", "property": "Material" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "warned");
        assert_eq!(body["warning"], "no_model_loaded");
        assert_eq!(body["snapshot"]["model_loaded"], false);

        let (status, body) = get(&app, "/api/v1/model").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NO_MODEL_LOADED");
    }

    #[tokio::test]
    async fn test_upload_requires_file_field() {
        let app = router();
        let (status, body) = upload(&app, "attachment", FIXTURE).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_FILE");
    }

    #[tokio::test]
    async fn test_filter_flow_over_uploaded_model() {
        let app = router();

        let (status, body) = upload(&app, "file", FIXTURE).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model"]["name"], "small_house.ifc");
        assert_eq!(body["model"]["element_count"], 9);
        assert_eq!(body["snapshot"]["cursor"], -1);

        let (_, body) = post_json(
            &app,
            "/api/v1/filters",
            json!({ "category": "Wall", "property": "Material" }),
        )
        .await;
        assert_eq!(body["outcome"], "applied");
        assert_eq!(body["matched"], 2);
        assert_eq!(body["snapshot"]["cursor"], 0);

        let (_, body) = get(&app, "/api/v1/visibility").await;
        assert_eq!(body["visible"], json!([10, 11]));
        assert_eq!(body["total"], 9);

        let (_, body) = post_json(
            &app,
            "/api/v1/filters",
            json!({ "category": "Door", "property": "Width" }),
        )
        .await;
        assert_eq!(body["outcome"], "added");
        assert_eq!(body["len"], 2);

        let (_, body) = post_json(&app, "/api/v1/filters", json!({ "property": "Width" })).await;
        assert_eq!(body["outcome"], "warned");
        assert_eq!(body["warning"], "missing_category");

        let (status, body) = post_empty(&app, "/api/v1/filters/next").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cursor"], 1);
        assert_eq!(body["entry"]["category"], "Door");

        let (_, body) = get(&app, "/api/v1/visibility").await;
        assert_eq!(body["visible"], json!([12]));

        let (_, body) = post_empty(&app, "/api/v1/filters/previous").await;
        assert_eq!(body["cursor"], 0);

        let (_, body) = get(&app, "/api/v1/filters").await;
        assert_eq!(body["filters"].as_array().unwrap().len(), 2);
        assert_eq!(body["applied"]["category"], "Wall");
    }

    #[tokio::test]
    async fn test_invalid_pattern_is_bad_request() {
        let app = router();
        upload(&app, "file", FIXTURE).await;

        let (status, body) = post_json(
            &app,
            "/api/v1/filters",
            json!({ "category": "[", "property": "Width" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_PATTERN");

        let (_, body) = get(&app, "/api/v1/filters").await;
        assert_eq!(body["filters"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_element_properties() {
        let app = router();
        upload(&app, "file", FIXTURE).await;

        let (status, body) = get(&app, "/api/v1/elements/12/properties").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type_name"], "IfcDoor");
        assert_eq!(body["sets"][0]["set_name"], "Pset_DoorCommon");

        let (status, body) = get(&app, "/api/v1/elements/999/properties").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
