// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Elements and their properties.

use ifc_view_core::AttributeValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Express id of an element in the loaded model (`#123`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u32);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for ElementId {
    fn from(id: u32) -> Self {
        ElementId(id)
    }
}

/// Ordered set of element ids returned by queries
pub type ElementSet = BTreeSet<ElementId>;

/// Value type of a property row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    String,
    Number,
    Integer,
    Boolean,
    Enum,
    Reference,
    Length,
    Area,
    Volume,
    Count,
    Weight,
    Time,
    Unknown,
}

impl PropertyKind {
    /// Classify a property's nominal value
    pub fn of_value(value: &AttributeValue) -> Self {
        if let Some((type_name, _)) = value.as_typed() {
            if type_name.eq_ignore_ascii_case("IFCBOOLEAN")
                || type_name.eq_ignore_ascii_case("IFCLOGICAL")
            {
                return PropertyKind::Boolean;
            }
        }
        match value.untyped() {
            AttributeValue::String(_) => PropertyKind::String,
            AttributeValue::Float(_) => PropertyKind::Number,
            AttributeValue::Integer(_) => PropertyKind::Integer,
            AttributeValue::Enum(_) => PropertyKind::Enum,
            AttributeValue::EntityRef(_) => PropertyKind::Reference,
            _ => PropertyKind::Unknown,
        }
    }

    /// Kind for an IfcQuantity* subtype label ("length", "area", ...)
    pub fn of_quantity(kind: &str) -> Self {
        match kind {
            "length" => PropertyKind::Length,
            "area" => PropertyKind::Area,
            "volume" => PropertyKind::Volume,
            "count" => PropertyKind::Count,
            "weight" => PropertyKind::Weight,
            "time" => PropertyKind::Time,
            _ => PropertyKind::Unknown,
        }
    }
}

/// One row of a property table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    /// Owning property or quantity set name (e.g. "Pset_WallCommon")
    pub set_name: String,
    pub name: String,
    /// Display form of the value
    pub value: String,
    pub kind: PropertyKind,
}

/// An element of the loaded model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    /// Type name as written in the file (e.g. "IFCWALLSTANDARDCASE")
    pub type_name: String,
    pub global_id: Option<String>,
    pub name: Option<String>,
    /// Occurrence properties first, then properties inherited from the type object
    pub properties: Vec<Property>,
}

impl Element {
    /// Mixed-case type name for display, when the type is known
    pub fn display_type(&self) -> &str {
        match ifc_view_core::schema::display_name(&self.type_name) {
            Some(name) => name,
            None => &self.type_name,
        }
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
