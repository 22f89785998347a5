// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-View Filter
//!
//! Sequential category/property filters over a loaded model. Users append
//! `(category, property)` pattern pairs to a list and step through it with
//! `next`/`previous`; the entry under the cursor decides which elements are
//! visible.
//!
//! ```rust,ignore
//! use ifc_view_filter::{EmptyResultPolicy, ModelQueryExecutor, ModelStepper, SharedVisibility};
//!
//! let stepper = ModelStepper::new(ModelQueryExecutor, SharedVisibility::new(), EmptyResultPolicy::HideAll);
//! stepper.load_model(Arc::new(model));
//! stepper.add_filter("Wall", "Material").await?;
//! stepper.add_filter("Door", "Width").await?;
//! stepper.next().await?;
//! ```

pub mod adapters;
pub mod error;
pub mod session;
pub mod stepper;

pub use adapters::{ModelQueryExecutor, ModelStepper, SharedVisibility};
pub use error::FilterWarning;
pub use session::{Direction, FilterCursor, FilterEntry, FilterSession};
pub use stepper::{
    EmptyResultPolicy, FilterStepper, QueryExecutor, StepOutcome, StepperSnapshot, VisibilityController,
};
