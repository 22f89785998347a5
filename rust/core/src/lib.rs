// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # IFC-View Core Parser
//!
//! STEP/IFC parsing built with [nom](https://docs.rs/nom): zero-copy
//! tokenization, a quote-aware statement scanner and a lazy entity decoder.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ifc_view_core::{EntityDecoder, EntityScanner};
//!
//! for entity in EntityScanner::new(content) {
//!     println!("#{} = {}", entity.id, entity.type_name);
//! }
//!
//! let mut decoder = EntityDecoder::new(content);
//! let wall = decoder.decode_by_id(123)?;
//! println!("{:?}", wall.get_str(2));
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: serialization support for attribute values and schema versions

pub mod decoder;
pub mod error;
pub mod header;
pub mod parser;
pub mod schema;
pub mod value;

pub use decoder::{build_entity_index, EntityDecoder, EntityIndex};
pub use error::{Error, Result};
pub use header::{parse_header, SchemaVersion, StepHeader};
pub use parser::{decode_step_string, parse_entity, EntityScanner, RawEntity, ScannedEntity, Token};
pub use value::{AttributeValue, DecodedEntity};
