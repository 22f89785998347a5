// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-View Model
//!
//! An IFC file loaded into memory as a flat list of elements, each carrying
//! the property and quantity rows attached to it (directly or through its
//! type object). On top of that:
//!
//! - [`ElementQuery`]: case-insensitive category/property pattern queries
//! - [`IfcModel::property_table`]: grouped property rows for one element
//! - [`VisibilitySet`]: which elements are currently shown
//!
//! ```rust,ignore
//! use ifc_view_model::IfcModel;
//!
//! let model = IfcModel::open("house.ifc")?;
//! let doors = model.find("door", "fire")?;
//! ```

pub mod element;
pub mod error;
mod extract;
pub mod model;
pub mod query;
pub mod visibility;

pub use element::{Element, ElementId, ElementSet, Property, PropertyKind};
pub use error::{ModelError, PatternField, QueryError, Result};
pub use model::{IfcModel, ModelSummary, PropertyGroup, PropertyTable};
pub use query::ElementQuery;
pub use visibility::VisibilitySet;
