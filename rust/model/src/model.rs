// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Loaded IFC model.

use crate::element::{Element, ElementId, Property};
use crate::error::{ModelError, Result};
use crate::extract::extract_elements;
use ifc_view_core::{parse_header, SchemaVersion};
use rustc_hash::FxHashMap;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;

/// An IFC model loaded into memory
#[derive(Debug)]
pub struct IfcModel {
    key: String,
    name: String,
    schema: SchemaVersion,
    entity_count: usize,
    property_set_count: usize,
    /// File order
    elements: Vec<Element>,
    by_id: FxHashMap<ElementId, usize>,
}

/// Summary returned to clients after loading
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub key: String,
    pub name: String,
    pub schema: String,
    pub entity_count: usize,
    pub element_count: usize,
    pub property_set_count: usize,
}

/// Element header plus its properties grouped by set, in file order
#[derive(Debug, Clone, Serialize)]
pub struct PropertyTable {
    pub id: ElementId,
    pub type_name: String,
    pub global_id: Option<String>,
    pub name: Option<String>,
    pub sets: Vec<PropertyGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyGroup {
    pub set_name: String,
    pub properties: Vec<Property>,
}

impl IfcModel {
    /// Load a model from raw file bytes; `name` is usually the file name
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self> {
        let key = hex::encode(Sha256::digest(&data));
        let content = String::from_utf8(data)?;
        Self::build(name.into(), key, &content)
    }

    /// Load a model from STEP text
    pub fn from_content(name: impl Into<String>, content: &str) -> Result<Self> {
        let key = hex::encode(Sha256::digest(content.as_bytes()));
        Self::build(name.into(), key, content)
    }

    /// Read and load a model from disk, named after the file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(name, data)
    }

    fn build(name: String, key: String, content: &str) -> Result<Self> {
        let load_start = std::time::Instant::now();
        let header = parse_header(content)?;
        let extracted = extract_elements(content);

        if extracted.entity_count == 0 {
            return Err(ModelError::Empty(name));
        }

        let by_id = extracted
            .elements
            .iter()
            .enumerate()
            .map(|(i, element)| (element.id, i))
            .collect();

        tracing::info!(
            model = %name,
            key = %key,
            schema = %header.schema,
            entities = extracted.entity_count,
            elements = extracted.elements.len(),
            load_time_ms = load_start.elapsed().as_millis(),
            "Model loaded"
        );

        Ok(Self {
            key,
            name,
            schema: header.schema,
            entity_count: extracted.entity_count,
            property_set_count: extracted.property_set_count,
            elements: extracted.elements,
            by_id,
        })
    }

    /// SHA256 of the file content, hex-encoded
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.by_id.get(&id).map(|&i| &self.elements[i])
    }

    pub fn element_ids(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().map(|e| e.id)
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            key: self.key.clone(),
            name: self.name.clone(),
            schema: self.schema.to_string(),
            entity_count: self.entity_count,
            element_count: self.elements.len(),
            property_set_count: self.property_set_count,
        }
    }

    /// Property table for one element, `None` for unknown ids
    pub fn property_table(&self, id: ElementId) -> Option<PropertyTable> {
        let element = self.element(id)?;

        let mut sets: Vec<PropertyGroup> = Vec::new();
        for property in &element.properties {
            match sets.iter_mut().find(|g| g.set_name == property.set_name) {
                Some(group) => group.properties.push(property.clone()),
                None => sets.push(PropertyGroup {
                    set_name: property.set_name.clone(),
                    properties: vec![property.clone()],
                }),
            }
        }

        Some(PropertyTable {
            id: element.id,
            type_name: element.display_type().to_string(),
            global_id: element.global_id.clone(),
            name: element.name.clone(),
            sets,
        })
    }
}
