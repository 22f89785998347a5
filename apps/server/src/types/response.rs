// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use ifc_view_filter::{StepOutcome, StepperSnapshot};
use ifc_view_model::{ElementId, ModelSummary};
use serde::Serialize;

/// Response to a model upload.
#[derive(Debug, Clone, Serialize)]
pub struct LoadResponse {
    pub model: ModelSummary,
    /// Parse and extraction time in milliseconds.
    pub load_time_ms: u64,
    /// Filter session after the reset.
    pub snapshot: StepperSnapshot,
}

/// Response of every stepper endpoint.
///
/// `outcome` (and its fields) are flattened into the top-level object.
#[derive(Debug, Clone, Serialize)]
pub struct StepResponse {
    #[serde(flatten)]
    pub outcome: StepOutcome,
    pub snapshot: StepperSnapshot,
}

/// Currently visible elements.
#[derive(Debug, Clone, Serialize)]
pub struct VisibilityResponse {
    pub visible: Vec<ElementId>,
    pub visible_count: usize,
    pub total: usize,
}
