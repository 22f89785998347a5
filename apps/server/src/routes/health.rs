// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Health check endpoint.

use axum::Json;
use serde::Serialize;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub service: &'static str,
}

/// API information response.
#[derive(Debug, Serialize)]
pub struct ApiInfoResponse {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

/// Endpoint information.
#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/api/v1/health", "Health check endpoint"),
    ("POST", "/api/v1/model", "Upload an IFC file (multipart field 'file')"),
    ("GET", "/api/v1/model", "Loaded model summary"),
    ("GET", "/api/v1/elements/:id/properties", "Property table of one element"),
    ("GET", "/api/v1/filters", "Filter list, cursor and applied filter"),
    ("POST", "/api/v1/filters", "Add a category/property filter"),
    ("POST", "/api/v1/filters/next", "Apply the next filter"),
    ("POST", "/api/v1/filters/previous", "Apply the previous filter"),
    ("GET", "/api/v1/visibility", "Currently visible element ids"),
];

/// GET /api/v1/health - Health check endpoint.
pub async fn check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: "ifc-view-server",
    })
}

/// GET / - API information endpoint.
pub async fn info() -> Json<ApiInfoResponse> {
    Json(ApiInfoResponse {
        service: "ifc-view-server",
        version: env!("CARGO_PKG_VERSION"),
        description: "IFC model viewer backend with sequential category/property filters",
        endpoints: ENDPOINTS
            .iter()
            .map(|&(method, path, description)| EndpointInfo {
                method,
                path,
                description,
            })
            .collect(),
    })
}
