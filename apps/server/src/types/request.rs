// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Request types for the API.

use serde::Deserialize;

/// Body of `POST /api/v1/filters`.
///
/// Missing fields deserialize as empty strings so the stepper can report
/// which one is missing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddFilterRequest {
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub property: String,
}
