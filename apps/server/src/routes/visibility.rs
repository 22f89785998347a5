// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Visibility endpoint.

use crate::app::AppState;
use crate::types::VisibilityResponse;
use axum::{extract::State, Json};

/// GET /api/v1/visibility - Currently visible element ids, ascending.
pub async fn visible(State(state): State<AppState>) -> Json<VisibilityResponse> {
    let set = state.stepper.visibility().read();
    Json(VisibilityResponse {
        visible: set.visible_ids().collect(),
        visible_count: set.visible_count(),
        total: set.total(),
    })
}
