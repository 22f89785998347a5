// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HEADER section parsing (FILE_NAME, FILE_SCHEMA).

use crate::error::{Error, Result};
use crate::parser::{decode_step_string, parse_arguments, Token};
use std::fmt;

/// IFC schema family declared in FILE_SCHEMA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemaVersion {
    Ifc2x3,
    Ifc4,
    Ifc4x3,
    Unknown,
}

impl SchemaVersion {
    pub fn from_identifier(identifier: &str) -> Self {
        let upper = identifier.to_ascii_uppercase();
        if upper.starts_with("IFC4X3") {
            SchemaVersion::Ifc4x3
        } else if upper.starts_with("IFC4") {
            SchemaVersion::Ifc4
        } else if upper.starts_with("IFC2X3") {
            SchemaVersion::Ifc2x3
        } else {
            SchemaVersion::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::Ifc2x3 => "IFC2X3",
            SchemaVersion::Ifc4 => "IFC4",
            SchemaVersion::Ifc4x3 => "IFC4X3",
            SchemaVersion::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed HEADER section
#[derive(Debug, Clone, PartialEq)]
pub struct StepHeader {
    pub schema: SchemaVersion,
    pub schema_identifiers: Vec<String>,
    /// FILE_NAME name attribute
    pub file_name: Option<String>,
    /// FILE_NAME originating_system attribute
    pub originating_system: Option<String>,
}

/// Parse the HEADER section of a STEP file
pub fn parse_header(content: &str) -> Result<StepHeader> {
    let header_start = memchr::memmem::find(content.as_bytes(), b"HEADER;")
        .ok_or(Error::MissingSection("HEADER"))?;
    let header_end = memchr::memmem::find(&content.as_bytes()[header_start..], b"ENDSEC;")
        .map(|offset| header_start + offset)
        .ok_or(Error::MissingSection("ENDSEC"))?;
    let header = &content[header_start..header_end];

    let schema_identifiers = statement_args(header, "FILE_SCHEMA")?
        .and_then(|args| args.into_iter().next())
        .map(|first| match first {
            Token::List(items) => items
                .iter()
                .filter_map(|item| match item {
                    Token::String(s) => Some(decode_step_string(s)),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        })
        .unwrap_or_default();

    let schema = schema_identifiers
        .first()
        .map(|id| SchemaVersion::from_identifier(id))
        .unwrap_or(SchemaVersion::Unknown);

    let file_name_args = statement_args(header, "FILE_NAME")?.unwrap_or_default();
    let string_at = |index: usize| match file_name_args.get(index) {
        Some(Token::String(s)) if !s.is_empty() => Some(decode_step_string(s)),
        _ => None,
    };

    Ok(StepHeader {
        schema,
        schema_identifiers,
        file_name: string_at(0),
        originating_system: string_at(5),
    })
}

fn statement_args<'a>(header: &'a str, keyword: &str) -> Result<Option<Vec<Token<'a>>>> {
    match header.find(keyword) {
        Some(at) => parse_arguments(&header[at + keyword.len()..]).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        let content = "ISO-10303-21;\nHEADER;\n\
FILE_DESCRIPTION(('ViewDefinition [CoordinationView]'),'2;1');\n\
FILE_NAME('house.ifc','2024-01-01T00:00:00',('me'),('org'),'pre','Modeller 1.0','');\n\
FILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\nENDSEC;\n";

        let header = parse_header(content).unwrap();
        assert_eq!(header.schema, SchemaVersion::Ifc4);
        assert_eq!(header.schema_identifiers, vec!["IFC4".to_string()]);
        assert_eq!(header.file_name.as_deref(), Some("house.ifc"));
        assert_eq!(header.originating_system.as_deref(), Some("Modeller 1.0"));
    }

    #[test]
    fn test_schema_identifiers() {
        assert_eq!(SchemaVersion::from_identifier("IFC2X3"), SchemaVersion::Ifc2x3);
        assert_eq!(SchemaVersion::from_identifier("IFC4X3_ADD2"), SchemaVersion::Ifc4x3);
        assert_eq!(SchemaVersion::from_identifier("CIS2"), SchemaVersion::Unknown);
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(
            parse_header("DATA;\nENDSEC;"),
            Err(Error::MissingSection("HEADER"))
        );
    }
}
