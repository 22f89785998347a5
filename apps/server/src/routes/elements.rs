// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element inspection endpoint.

use crate::app::AppState;
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    Json,
};
use ifc_view_model::{ElementId, PropertyTable};

/// GET /api/v1/elements/:id/properties - Property table of one element.
pub async fn properties(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<PropertyTable>, ApiError> {
    let model = state.stepper.model().ok_or(ApiError::NoModel)?;
    let id = ElementId(id);
    model
        .property_table(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("element {}", id)))
}
