// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for model loading
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while loading a model
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid UTF-8 content: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("STEP error: {0}")]
    Step(#[from] ifc_view_core::Error),

    #[error("Model '{0}' contains no entities")]
    Empty(String),
}

/// Which half of a filter pattern failed to compile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternField {
    Category,
    Property,
}

impl std::fmt::Display for PatternField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PatternField::Category => f.write_str("category"),
            PatternField::Property => f.write_str("property"),
        }
    }
}

/// Errors raised by element queries
#[derive(Error, Debug, Clone)]
pub enum QueryError {
    #[error("Invalid {field} pattern '{pattern}': {source}")]
    InvalidPattern {
        field: PatternField,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Query worker failed: {0}")]
    Worker(String),
}
