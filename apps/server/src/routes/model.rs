// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Model upload and summary endpoints.

use crate::app::AppState;
use crate::error::ApiError;
use crate::types::LoadResponse;
use axum::{
    extract::{Multipart, State},
    Json,
};
use ifc_view_model::{IfcModel, ModelSummary};
use std::sync::Arc;
use std::time::Instant;

/// Pull the `file` field (and its file name) out of a multipart upload.
async fn extract_file(multipart: &mut Multipart) -> Result<(String, Vec<u8>), ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default().to_string();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        if field_name == "file" {
            let file_name = field.file_name().unwrap_or("model.ifc").to_string();
            let bytes = field.bytes().await?;
            tracing::debug!(size = bytes.len(), file_name = %file_name, "Extracted file from multipart");
            return Ok((file_name, bytes.to_vec()));
        }
    }

    tracing::warn!("No 'file' field found in multipart request");
    Err(ApiError::MissingFile)
}

/// POST /api/v1/model - Load a model and reset the filter session.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<LoadResponse>, ApiError> {
    let (file_name, data) = extract_file(&mut multipart).await?;

    if data.len() > state.config.max_file_size_bytes() {
        return Err(ApiError::FileTooLarge {
            max_mb: state.config.max_file_size_mb,
        });
    }

    let start = Instant::now();
    let model = tokio::task::spawn_blocking(move || IfcModel::from_bytes(file_name, data)).await??;
    let load_time_ms = start.elapsed().as_millis() as u64;

    let summary = model.summary();
    tracing::info!(
        name = %summary.name,
        key = %summary.key,
        schema = %summary.schema,
        elements = summary.element_count,
        load_time_ms,
        "Model loaded"
    );

    state.stepper.load_model(Arc::new(model));

    Ok(Json(LoadResponse {
        model: summary,
        load_time_ms,
        snapshot: state.stepper.snapshot(),
    }))
}

/// GET /api/v1/model - Summary of the loaded model.
pub async fn summary(State(state): State<AppState>) -> Result<Json<ModelSummary>, ApiError> {
    let model = state.stepper.model().ok_or(ApiError::NoModel)?;
    Ok(Json(model.summary()))
}
