// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Category/property pattern queries.
//!
//! Both patterns are regular-expression fragments matched case-insensitively
//! anywhere in the text (`wall` matches `IFCWALLSTANDARDCASE`). An empty
//! pattern matches every element.

use crate::element::{Element, ElementSet};
use crate::error::{PatternField, QueryError};
use crate::model::IfcModel;
use rayon::prelude::*;
use regex::Regex;

/// Compiled category/property query
#[derive(Debug, Clone)]
pub struct ElementQuery {
    category: Regex,
    property: Regex,
    any_property: bool,
}

impl ElementQuery {
    pub fn new(category: &str, property: &str) -> Result<Self, QueryError> {
        Ok(Self {
            category: compile(PatternField::Category, category)?,
            property: compile(PatternField::Property, property)?,
            any_property: property.is_empty(),
        })
    }

    /// Category against the type name; property against any property's
    /// name, value or owning set name
    pub fn matches(&self, element: &Element) -> bool {
        if !self.category.is_match(&element.type_name) {
            return false;
        }
        self.any_property
            || element.properties.iter().any(|p| {
                self.property.is_match(&p.name)
                    || self.property.is_match(&p.value)
                    || self.property.is_match(&p.set_name)
            })
    }
}

fn compile(field: PatternField, pattern: &str) -> Result<Regex, QueryError> {
    Regex::new(&format!("(?i){pattern}")).map_err(|source| QueryError::InvalidPattern {
        field,
        pattern: pattern.to_string(),
        source,
    })
}

impl IfcModel {
    /// Ids of every element matching the query
    pub fn query(&self, query: &ElementQuery) -> ElementSet {
        let matched: ElementSet = self
            .elements()
            .par_iter()
            .filter(|element| query.matches(element))
            .map(|element| element.id)
            .collect();

        tracing::debug!(
            category = %query.category.as_str(),
            property = %query.property.as_str(),
            matched = matched.len(),
            "Query executed"
        );
        matched
    }

    /// Compile and run a query in one step
    pub fn find(&self, category: &str, property: &str) -> Result<ElementSet, QueryError> {
        Ok(self.query(&ElementQuery::new(category, property)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementId, Property, PropertyKind};

    fn element(id: u32, type_name: &str, props: &[(&str, &str, &str)]) -> Element {
        Element {
            id: ElementId(id),
            type_name: type_name.to_string(),
            global_id: None,
            name: None,
            properties: props
                .iter()
                .map(|(set, name, value)| Property {
                    set_name: set.to_string(),
                    name: name.to_string(),
                    value: value.to_string(),
                    kind: PropertyKind::String,
                })
                .collect(),
        }
    }

    #[test]
    fn test_category_is_case_insensitive_substring() {
        let wall = element(1, "IFCWALLSTANDARDCASE", &[("Pset_WallCommon", "IsExternal", "true")]);
        assert!(ElementQuery::new("Wall", "").unwrap().matches(&wall));
        assert!(ElementQuery::new("^ifcwall", "external").unwrap().matches(&wall));
        assert!(!ElementQuery::new("Door", "").unwrap().matches(&wall));
    }

    #[test]
    fn test_property_matches_name_value_or_set() {
        let door = element(2, "IFCDOOR", &[("Pset_DoorCommon", "FireRating", "EI30")]);
        assert!(ElementQuery::new("door", "fire").unwrap().matches(&door));
        assert!(ElementQuery::new("door", "ei\\d+").unwrap().matches(&door));
        assert!(ElementQuery::new("door", "doorcommon").unwrap().matches(&door));
        assert!(!ElementQuery::new("door", "Width").unwrap().matches(&door));
    }

    #[test]
    fn test_non_empty_property_requires_a_property() {
        let bare = element(3, "IFCSLAB", &[]);
        assert!(ElementQuery::new("slab", "").unwrap().matches(&bare));
        assert!(!ElementQuery::new("slab", ".*").unwrap().matches(&bare));
    }

    #[test]
    fn test_invalid_pattern_names_field() {
        match ElementQuery::new("Wall", "(unclosed") {
            Err(QueryError::InvalidPattern { field, pattern, .. }) => {
                assert_eq!(field, PatternField::Property);
                assert_eq!(pattern, "(unclosed");
            }
            other => panic!("Expected invalid pattern, got {:?}", other),
        }
    }
}
