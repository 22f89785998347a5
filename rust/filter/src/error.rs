// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde::Serialize;
use thiserror::Error;

/// Non-fatal problems reported by the stepper; state is left unchanged
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterWarning {
    #[error("Category is required")]
    MissingCategory,

    #[error("Property is required")]
    MissingProperty,

    #[error("No filters have been added")]
    EmptyFilterList,

    #[error("No model loaded")]
    NoModelLoaded,
}

impl FilterWarning {
    /// Input validation (as opposed to a precondition on session state)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            FilterWarning::MissingCategory | FilterWarning::MissingProperty
        )
    }

    pub fn code(&self) -> &'static str {
        match self {
            FilterWarning::MissingCategory => "MISSING_CATEGORY",
            FilterWarning::MissingProperty => "MISSING_PROPERTY",
            FilterWarning::EmptyFilterList => "EMPTY_FILTER_LIST",
            FilterWarning::NoModelLoaded => "NO_MODEL_LOADED",
        }
    }
}
