// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entity Decoder - On-demand entity parsing
//!
//! Lazily decode IFC entities from byte offsets; only the statements a caller
//! actually asks for are tokenized.

use crate::error::{Error, Result};
use crate::parser::{parse_entity, EntityScanner};
use crate::value::{AttributeValue, DecodedEntity};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Pre-built entity index type: express id -> (start, end) byte offsets
pub type EntityIndex = FxHashMap<u32, (usize, usize)>;

/// Build entity index from content in one pass over the DATA section
pub fn build_entity_index(content: &str) -> EntityIndex {
    // Roughly 1 entity per 50 bytes
    let mut index =
        FxHashMap::with_capacity_and_hasher(content.len() / 50, Default::default());
    for entity in EntityScanner::new(content) {
        index.insert(entity.id, (entity.start, entity.end));
    }
    index
}

/// Entity decoder for lazy parsing - uses Arc for cheap cache hits
pub struct EntityDecoder<'a> {
    content: &'a str,
    /// Shared across worker decoders so the index is built once per model
    index: Arc<EntityIndex>,
    cache: FxHashMap<u32, Arc<DecodedEntity>>,
}

impl<'a> EntityDecoder<'a> {
    /// Create a decoder, building the index
    pub fn new(content: &'a str) -> Self {
        Self::with_index(content, Arc::new(build_entity_index(content)))
    }

    /// Create decoder with shared Arc index (for parallel processing)
    pub fn with_index(content: &'a str, index: Arc<EntityIndex>) -> Self {
        Self {
            content,
            index,
            cache: FxHashMap::default(),
        }
    }

    /// Decode the statement at a byte range
    pub fn decode_at(&mut self, start: usize, end: usize) -> Result<Arc<DecodedEntity>> {
        let line = self
            .content
            .get(start..end)
            .ok_or_else(|| Error::parse(start, "Entity range outside content"))?;
        let raw = parse_entity(line).map_err(|e| match e {
            Error::Parse { position, message } => Error::parse(
                start + position,
                format!("{} in {:?}", message, excerpt(line, 100)),
            ),
            other => other,
        })?;

        if let Some(cached) = self.cache.get(&raw.id) {
            return Ok(Arc::clone(cached));
        }

        let attributes = raw
            .attributes
            .iter()
            .map(AttributeValue::from_token)
            .collect();
        let entity = Arc::new(DecodedEntity::new(raw.id, raw.type_name, attributes));
        self.cache.insert(raw.id, Arc::clone(&entity));
        Ok(entity)
    }

    /// Decode entity by ID - O(1) lookup using entity index
    pub fn decode_by_id(&mut self, entity_id: u32) -> Result<Arc<DecodedEntity>> {
        if let Some(cached) = self.cache.get(&entity_id) {
            return Ok(Arc::clone(cached));
        }
        let (start, end) = self
            .index
            .get(&entity_id)
            .copied()
            .ok_or(Error::EntityNotFound(entity_id))?;
        self.decode_at(start, end)
    }

    /// Resolve every entity reference in a list attribute, skipping dangling ones
    pub fn resolve_ref_list(&mut self, attr: &AttributeValue) -> Vec<Arc<DecodedEntity>> {
        attr.entity_refs()
            .into_iter()
            .filter_map(|id| self.decode_by_id(id).ok())
            .collect()
    }

    /// Raw statement text for an entity
    pub fn raw_content(&self, entity_id: u32) -> Option<&'a str> {
        let (start, end) = self.index.get(&entity_id).copied()?;
        self.content.get(start..end)
    }

    pub fn contains(&self, entity_id: u32) -> bool {
        self.index.contains_key(&entity_id)
    }

    pub fn entity_count(&self) -> usize {
        self.index.len()
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

/// At most `max_chars` characters of `line`
fn excerpt(line: &str, max_chars: usize) -> &str {
    line.char_indices()
        .nth(max_chars)
        .map_or(line, |(i, _)| &line[..i])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = "ISO-10303-21;\nHEADER;\nENDSEC;\nDATA;\n\
#1=IFCPROPERTYSET('g1',$,'Pset_WallCommon',$,(#2,#3));\n\
#2=IFCPROPERTYSINGLEVALUE('IsExternal',$,IFCBOOLEAN(.T.),$);\n\
#3=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('REI60'),$);\n\
ENDSEC;\nEND-ISO-10303-21;\n";

    #[test]
    fn test_index_and_decode_by_id() {
        let mut decoder = EntityDecoder::new(CONTENT);
        assert_eq!(decoder.entity_count(), 3);

        let pset = decoder.decode_by_id(1).unwrap();
        assert!(pset.is_type("IFCPROPERTYSET"));
        assert_eq!(pset.get_str(2), Some("Pset_WallCommon"));

        let props = decoder.resolve_ref_list(pset.get(4).unwrap());
        assert_eq!(props.len(), 2);
        assert_eq!(props[1].get(2).unwrap().to_string(), "REI60");
        assert_eq!(decoder.cache_size(), 3);
    }

    #[test]
    fn test_missing_entity() {
        let mut decoder = EntityDecoder::new(CONTENT);
        assert_eq!(decoder.decode_by_id(99), Err(Error::EntityNotFound(99)));
        assert!(!decoder.contains(99));
    }

    #[test]
    fn test_raw_content() {
        let decoder = EntityDecoder::new(CONTENT);
        assert!(decoder
            .raw_content(2)
            .unwrap()
            .starts_with("#2=IFCPROPERTYSINGLEVALUE"));
    }

    #[test]
    fn test_parse_error_excerpt_respects_char_boundaries() {
        // 'ü' occupies bytes 99..101 of the statement
        let statement = format!("#10=IFCWALL('{}\u{fc}',@);", "a".repeat(86));
        assert_eq!(statement.find('\u{fc}'), Some(99));
        let content = format!("ISO-10303-21;\nHEADER;\nENDSEC;\nDATA;\n{}\nENDSEC;\n", statement);

        let mut decoder = EntityDecoder::new(&content);
        match decoder.decode_by_id(10) {
            Err(Error::Parse { message, .. }) => assert!(message.contains("IFCWALL")),
            other => panic!("expected parse error, got {:?}", other),
        }
        assert_eq!(excerpt("abc", 2), "ab");
        assert_eq!(excerpt("\u{fc}\u{fc}\u{fc}", 2), "\u{fc}\u{fc}");
        assert_eq!(excerpt("ab", 100), "ab");
    }
}
