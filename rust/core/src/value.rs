// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Owned attribute values and decoded entities.

use crate::parser::{decode_step_string, Token};
use std::fmt;

/// IFC entity attribute value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    EntityRef(u32),
    /// Decoded string (STEP escapes already resolved)
    String(String),
    Integer(i64),
    Float(f64),
    /// Enumeration literal without dots
    Enum(String),
    List(Vec<AttributeValue>),
    /// Typed parameter such as `IFCLENGTHMEASURE(2.5)`
    Typed(String, Vec<AttributeValue>),
    Null,
    Derived,
}

impl AttributeValue {
    pub fn from_token(token: &Token) -> Self {
        match token {
            Token::EntityRef(id) => AttributeValue::EntityRef(*id),
            Token::String(s) => AttributeValue::String(decode_step_string(s)),
            Token::Integer(i) => AttributeValue::Integer(*i),
            Token::Float(f) => AttributeValue::Float(*f),
            Token::Enum(e) => AttributeValue::Enum(e.to_string()),
            Token::List(items) => AttributeValue::List(items.iter().map(Self::from_token).collect()),
            Token::Typed(name, args) => AttributeValue::Typed(
                name.to_string(),
                args.iter().map(Self::from_token).collect(),
            ),
            Token::Null => AttributeValue::Null,
            Token::Derived => AttributeValue::Derived,
        }
    }

    #[inline]
    pub fn as_entity_ref(&self) -> Option<u32> {
        match self {
            AttributeValue::EntityRef(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric value; integers widen to f64
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Type name and first argument of a typed parameter
    pub fn as_typed(&self) -> Option<(&str, &AttributeValue)> {
        match self {
            AttributeValue::Typed(name, args) => args.first().map(|inner| (name.as_str(), inner)),
            _ => None,
        }
    }

    /// Strip any typed-parameter wrapper
    pub fn untyped(&self) -> &AttributeValue {
        match self.as_typed() {
            Some((_, inner)) => inner.untyped(),
            None => self,
        }
    }

    /// Entity ids referenced by a list attribute
    pub fn entity_refs(&self) -> Vec<u32> {
        self.as_list()
            .map(|items| items.iter().filter_map(|v| v.as_entity_ref()).collect())
            .unwrap_or_default()
    }

    /// Check if null/derived
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null | AttributeValue::Derived)
    }
}

impl fmt::Display for AttributeValue {
    /// Human-readable rendering used by property tables
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::EntityRef(id) => write!(f, "#{}", id),
            AttributeValue::String(s) => f.write_str(s),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Enum(e) => match e.as_str() {
                "T" => f.write_str("true"),
                "F" => f.write_str("false"),
                "U" => f.write_str("unknown"),
                other => f.write_str(other),
            },
            AttributeValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
            AttributeValue::Typed(_, args) => match args.first() {
                Some(inner) => write!(f, "{}", inner),
                None => Ok(()),
            },
            AttributeValue::Null | AttributeValue::Derived => Ok(()),
        }
    }
}

/// Decoded IFC entity
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedEntity {
    pub id: u32,
    /// Type name as written in the file, e.g. "IFCWALL"
    pub type_name: String,
    pub attributes: Vec<AttributeValue>,
}

impl DecodedEntity {
    pub fn new(id: u32, type_name: impl Into<String>, attributes: Vec<AttributeValue>) -> Self {
        Self {
            id,
            type_name: type_name.into(),
            attributes,
        }
    }

    #[inline]
    pub fn is_type(&self, type_name: &str) -> bool {
        self.type_name.eq_ignore_ascii_case(type_name)
    }

    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    pub fn get_ref(&self, index: usize) -> Option<u32> {
        self.get(index)?.as_entity_ref()
    }

    pub fn get_str(&self, index: usize) -> Option<&str> {
        self.get(index)?.untyped().as_str()
    }

    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index)?.untyped().as_float()
    }

    pub fn get_list(&self, index: usize) -> Option<&[AttributeValue]> {
        self.get(index)?.as_list()
    }

    pub fn get_refs(&self, index: usize) -> Vec<u32> {
        self.get(index).map(AttributeValue::entity_refs).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_entity;

    fn decode(line: &str) -> DecodedEntity {
        let raw = parse_entity(line).unwrap();
        DecodedEntity::new(
            raw.id,
            raw.type_name,
            raw.attributes.iter().map(AttributeValue::from_token).collect(),
        )
    }

    #[test]
    fn test_typed_values_unwrap() {
        let entity = decode("#7=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);");
        assert_eq!(entity.get_str(0), Some("IsExternal"));
        let nominal = entity.get(2).unwrap();
        assert_eq!(nominal.as_typed().map(|(name, _)| name), Some("IFCBOOLEAN"));
        assert_eq!(nominal.to_string(), "true");
    }

    #[test]
    fn test_display_and_refs() {
        let entity = decode("#3=IFCRELDEFINESBYPROPERTIES('g',$,$,$,(#10,#11),#12);");
        assert_eq!(entity.get_refs(4), vec![10, 11]);
        assert_eq!(entity.get_ref(5), Some(12));
        assert_eq!(entity.get(4).unwrap().to_string(), "#10, #11");
        assert!(entity.get(1).unwrap().is_null());
        assert!(entity.is_type("IfcRelDefinesByProperties"));
    }

    #[test]
    fn test_string_escapes_are_decoded() {
        let entity = decode("#1=IFCWALL('g',$,'Owner''s wall',$);");
        assert_eq!(entity.get_str(2), Some("Owner's wall"));
    }
}
