// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Filter stepper endpoints.
//!
//! Warnings (missing fields, empty list, no model) are reported in a 200
//! response with `"outcome": "warned"`; only query failures are errors.

use crate::app::AppState;
use crate::error::ApiError;
use crate::types::{AddFilterRequest, StepResponse};
use axum::{extract::State, Json};
use ifc_view_filter::{StepOutcome, StepperSnapshot};

fn respond(state: &AppState, outcome: StepOutcome) -> Json<StepResponse> {
    Json(StepResponse {
        outcome,
        snapshot: state.stepper.snapshot(),
    })
}

/// GET /api/v1/filters - Current filter list, cursor and applied filter.
pub async fn list(State(state): State<AppState>) -> Json<StepperSnapshot> {
    Json(state.stepper.snapshot())
}

/// POST /api/v1/filters - Append a filter.
pub async fn add(
    State(state): State<AppState>,
    Json(request): Json<AddFilterRequest>,
) -> Result<Json<StepResponse>, ApiError> {
    let outcome = state
        .stepper
        .add_filter(&request.category, &request.property)
        .await?;
    Ok(respond(&state, outcome))
}

/// POST /api/v1/filters/next - Apply the next filter.
pub async fn next(State(state): State<AppState>) -> Result<Json<StepResponse>, ApiError> {
    let outcome = state.stepper.next().await?;
    Ok(respond(&state, outcome))
}

/// POST /api/v1/filters/previous - Apply the previous filter.
pub async fn previous(State(state): State<AppState>) -> Result<Json<StepResponse>, ApiError> {
    let outcome = state.stepper.previous().await?;
    Ok(respond(&state, outcome))
}
