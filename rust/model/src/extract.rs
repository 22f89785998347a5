// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element and property extraction from STEP content.
//!
//! One scan collects statement offsets; property sets, quantity sets and
//! relationships are then decoded in parallel and joined onto elements.

use crate::element::{Element, ElementId, Property, PropertyKind};
use ifc_view_core::{schema, DecodedEntity, EntityDecoder, EntityIndex, EntityScanner};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use std::sync::Arc;

/// Statement located by the scan
#[derive(Debug, Clone, Copy)]
struct EntityJob<'a> {
    id: u32,
    type_name: &'a str,
    start: usize,
    end: usize,
}

/// Property definitions attached to one object
type DefinitionRefs = SmallVec<[u32; 4]>;

/// Relationship fan-out needed to attach properties and find elements
#[derive(Debug, Default)]
struct Relations {
    /// object -> property/quantity set ids (IfcRelDefinesByProperties)
    definitions: FxHashMap<u32, DefinitionRefs>,
    /// object -> type object id (IfcRelDefinesByType)
    types: FxHashMap<u32, u32>,
    /// ids related through containment or aggregation
    placed: FxHashSet<u32>,
}

/// Result of extraction
#[derive(Debug)]
pub(crate) struct Extracted {
    pub elements: Vec<Element>,
    pub entity_count: usize,
    pub property_set_count: usize,
}

pub(crate) fn extract_elements(content: &str) -> Extracted {
    let extract_start = std::time::Instant::now();

    let jobs: Vec<EntityJob> = EntityScanner::new(content)
        .map(|e| EntityJob {
            id: e.id,
            type_name: e.type_name,
            start: e.start,
            end: e.end,
        })
        .collect();
    let index: Arc<EntityIndex> = Arc::new(jobs.iter().map(|j| (j.id, (j.start, j.end))).collect());

    tracing::debug!(total_entities = jobs.len(), "Scanned all entities");

    let (property_sets, relations) = rayon::join(
        || extract_property_sets(&jobs, content, &index),
        || extract_relations(&jobs, content, &index),
    );

    let type_sets = extract_type_sets(&relations, content, &index);
    let elements = build_elements(&jobs, content, &index, &property_sets, &type_sets, &relations);

    tracing::info!(
        entities = jobs.len(),
        elements = elements.len(),
        property_sets = property_sets.len(),
        extract_time_ms = extract_start.elapsed().as_millis(),
        "Element extraction complete"
    );

    Extracted {
        entity_count: jobs.len(),
        property_set_count: property_sets.len(),
        elements,
    }
}

/// Decode every IfcPropertySet and IfcElementQuantity into property rows
fn extract_property_sets(
    jobs: &[EntityJob],
    content: &str,
    index: &Arc<EntityIndex>,
) -> FxHashMap<u32, Vec<Property>> {
    let set_jobs: Vec<&EntityJob> = jobs
        .iter()
        .filter(|job| schema::is_property_definition(job.type_name))
        .collect();

    tracing::debug!(count = set_jobs.len(), "Extracting property and quantity sets");

    set_jobs
        .par_iter()
        .map_init(
            || EntityDecoder::with_index(content, Arc::clone(index)),
            |decoder, job| {
                let entity = decoder.decode_at(job.start, job.end).ok()?;
                let rows = if entity.is_type("IFCPROPERTYSET") {
                    property_set_rows(&entity, decoder)
                } else {
                    quantity_set_rows(&entity, decoder)
                };
                Some((job.id, rows))
            },
        )
        .flatten()
        .collect()
}

/// IfcPropertySet: [2]=Name, [4]=HasProperties
fn property_set_rows(entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Vec<Property> {
    let set_name = entity.get_str(2).unwrap_or_default().to_string();
    let Some(has_properties) = entity.get(4) else {
        return Vec::new();
    };

    decoder
        .resolve_ref_list(has_properties)
        .iter()
        .filter_map(|prop| property_row(&set_name, prop))
        .collect()
}

/// IfcPropertySingleValue / EnumeratedValue / ListValue: [0]=Name, [2]=value(s)
fn property_row(set_name: &str, entity: &DecodedEntity) -> Option<Property> {
    let name = entity.get_str(0)?.to_string();
    let value = entity.get(2)?;

    let kind = if entity.is_type("IFCPROPERTYSINGLEVALUE") {
        PropertyKind::of_value(value)
    } else if entity.is_type("IFCPROPERTYENUMERATEDVALUE") || entity.is_type("IFCPROPERTYLISTVALUE") {
        value
            .as_list()
            .and_then(|items| items.first())
            .map(PropertyKind::of_value)
            .unwrap_or(PropertyKind::Unknown)
    } else {
        return None;
    };

    Some(Property {
        set_name: set_name.to_string(),
        name,
        value: value.to_string(),
        kind,
    })
}

/// IfcElementQuantity: [2]=Name, [5]=Quantities
/// IfcQuantity*: [0]=Name, [3]=Value
fn quantity_set_rows(entity: &DecodedEntity, decoder: &mut EntityDecoder) -> Vec<Property> {
    let set_name = entity.get_str(2).unwrap_or_default().to_string();
    let Some(quantities) = entity.get(5) else {
        return Vec::new();
    };

    decoder
        .resolve_ref_list(quantities)
        .iter()
        .filter_map(|quantity| {
            let kind = schema::quantity_kind(&quantity.type_name)?;
            let name = quantity.get_str(0)?.to_string();
            let value = quantity.get_float(3)?;
            Some(Property {
                set_name: set_name.clone(),
                name,
                value: value.to_string(),
                kind: PropertyKind::of_quantity(kind),
            })
        })
        .collect()
}

/// Relationship attribute layout:
/// - IfcRelDefinesByProperties: [4]=RelatedObjects, [5]=RelatingPropertyDefinition
/// - IfcRelDefinesByType: [4]=RelatedObjects, [5]=RelatingType
/// - IfcRelContainedInSpatialStructure: [4]=RelatedElements, [5]=RelatingStructure
/// - IfcRelAggregates: [4]=RelatingObject, [5]=RelatedObjects
fn extract_relations(jobs: &[EntityJob], content: &str, index: &Arc<EntityIndex>) -> Relations {
    let rel_jobs: Vec<&EntityJob> = jobs
        .iter()
        .filter(|job| {
            ["IFCRELDEFINESBYPROPERTIES", "IFCRELDEFINESBYTYPE", "IFCRELCONTAINEDINSPATIALSTRUCTURE", "IFCRELAGGREGATES"]
                .iter()
                .any(|rel| job.type_name.eq_ignore_ascii_case(rel))
        })
        .collect();

    tracing::debug!(count = rel_jobs.len(), "Extracting relationships");

    let decoded: Vec<Arc<DecodedEntity>> = rel_jobs
        .par_iter()
        .map_init(
            || EntityDecoder::with_index(content, Arc::clone(index)),
            |decoder, job| decoder.decode_at(job.start, job.end).ok(),
        )
        .flatten()
        .collect();

    // Folded sequentially so definition order follows file order
    let mut relations = Relations::default();
    for rel in decoded {
        if rel.is_type("IFCRELDEFINESBYPROPERTIES") {
            // IFC4 allows a set of definitions in [5]
            let definitions = match rel.get_ref(5) {
                Some(definition) => vec![definition],
                None => rel.get_refs(5),
            };
            for object in rel.get_refs(4) {
                relations
                    .definitions
                    .entry(object)
                    .or_default()
                    .extend(definitions.iter().copied());
            }
        } else if rel.is_type("IFCRELDEFINESBYTYPE") {
            if let Some(type_object) = rel.get_ref(5) {
                for object in rel.get_refs(4) {
                    relations.types.insert(object, type_object);
                }
            }
        } else if rel.is_type("IFCRELCONTAINEDINSPATIALSTRUCTURE") {
            relations.placed.extend(rel.get_refs(4));
        } else {
            relations.placed.extend(rel.get_refs(5));
        }
    }
    relations
}

/// Property sets declared on type objects: IfcTypeObject [5]=HasPropertySets
fn extract_type_sets(
    relations: &Relations,
    content: &str,
    index: &Arc<EntityIndex>,
) -> FxHashMap<u32, DefinitionRefs> {
    let mut decoder = EntityDecoder::with_index(content, Arc::clone(index));
    let type_ids: FxHashSet<u32> = relations.types.values().copied().collect();

    type_ids
        .into_iter()
        .filter_map(|type_id| {
            let type_object = decoder.decode_by_id(type_id).ok()?;
            let sets: DefinitionRefs = type_object.get_refs(5).into_iter().collect();
            (!sets.is_empty()).then_some((type_id, sets))
        })
        .collect()
}

fn build_elements(
    jobs: &[EntityJob],
    content: &str,
    index: &Arc<EntityIndex>,
    property_sets: &FxHashMap<u32, Vec<Property>>,
    type_sets: &FxHashMap<u32, DefinitionRefs>,
    relations: &Relations,
) -> Vec<Element> {
    let element_jobs: Vec<&EntityJob> = jobs
        .iter()
        .filter(|job| {
            schema::is_spatial(job.type_name)
                || schema::is_element(job.type_name)
                || (relations.placed.contains(&job.id)
                    && !schema::is_relationship(job.type_name)
                    && !schema::is_property_definition(job.type_name))
        })
        .collect();

    // collect keeps file order
    element_jobs
        .par_iter()
        .map_init(
            || EntityDecoder::with_index(content, Arc::clone(index)),
            |decoder, job| {
                let entity = decoder.decode_at(job.start, job.end).ok()?;

                let own = relations.definitions.get(&job.id).into_iter().flatten();
                let inherited = relations
                    .types
                    .get(&job.id)
                    .and_then(|type_id| type_sets.get(type_id))
                    .into_iter()
                    .flatten();
                let properties = own
                    .chain(inherited)
                    .filter_map(|set_id| property_sets.get(set_id))
                    .flatten()
                    .cloned()
                    .collect();

                // IfcRoot: [0]=GlobalId, [2]=Name
                Some(Element {
                    id: ElementId(job.id),
                    type_name: job.type_name.to_string(),
                    global_id: entity.get_str(0).map(str::to_string),
                    name: entity.get_str(2).filter(|s| !s.is_empty()).map(str::to_string),
                    properties,
                })
            },
        )
        .flatten()
        .collect()
}
