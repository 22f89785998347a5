// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC type-name classification.
//!
//! Works on type names as they appear in the file (any case), so entities
//! outside the table below still decode and index normally.

/// Spatial structure types, outermost first
pub const SPATIAL_TYPES: &[&str] = &[
    "IfcProject",
    "IfcSite",
    "IfcBuilding",
    "IfcBuildingStorey",
    "IfcSpace",
];

/// Physical element types shown in the viewer
pub const ELEMENT_TYPES: &[&str] = &[
    "IfcWall",
    "IfcWallStandardCase",
    "IfcWallElementedCase",
    "IfcCurtainWall",
    "IfcSlab",
    "IfcSlabStandardCase",
    "IfcRoof",
    "IfcBeam",
    "IfcBeamStandardCase",
    "IfcColumn",
    "IfcColumnStandardCase",
    "IfcMember",
    "IfcMemberStandardCase",
    "IfcPlate",
    "IfcPlateStandardCase",
    "IfcFooting",
    "IfcPile",
    "IfcDoor",
    "IfcDoorStandardCase",
    "IfcWindow",
    "IfcWindowStandardCase",
    "IfcOpeningElement",
    "IfcStair",
    "IfcStairFlight",
    "IfcRamp",
    "IfcRampFlight",
    "IfcRailing",
    "IfcCovering",
    "IfcChimney",
    "IfcShadingDevice",
    "IfcBuildingElementProxy",
    "IfcBuildingElementPart",
    "IfcFurnishingElement",
    "IfcFurniture",
    "IfcSystemFurnitureElement",
    "IfcElementAssembly",
    "IfcReinforcingBar",
    "IfcReinforcingMesh",
    "IfcTendon",
    "IfcDistributionElement",
    "IfcDistributionControlElement",
    "IfcFlowTerminal",
    "IfcFlowSegment",
    "IfcFlowFitting",
    "IfcFlowController",
    "IfcFlowMovingDevice",
    "IfcFlowStorageDevice",
    "IfcFlowTreatmentDevice",
    "IfcEnergyConversionDevice",
    "IfcPipeSegment",
    "IfcPipeFitting",
    "IfcDuctSegment",
    "IfcDuctFitting",
    "IfcAirTerminal",
    "IfcSanitaryTerminal",
    "IfcLightFixture",
    "IfcLamp",
    "IfcOutlet",
    "IfcCableSegment",
    "IfcCableCarrierSegment",
    "IfcTransportElement",
    "IfcGeographicElement",
    "IfcCivilElement",
    "IfcVirtualElement",
];

/// Canonical mixed-case spelling for a known type name
pub fn display_name(type_name: &str) -> Option<&'static str> {
    SPATIAL_TYPES
        .iter()
        .chain(ELEMENT_TYPES.iter())
        .find(|known| known.eq_ignore_ascii_case(type_name))
        .copied()
}

pub fn is_spatial(type_name: &str) -> bool {
    SPATIAL_TYPES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(type_name))
}

pub fn is_element(type_name: &str) -> bool {
    ELEMENT_TYPES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(type_name))
}

/// IfcRel* objectified relationships
pub fn is_relationship(type_name: &str) -> bool {
    type_name
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("IFCREL"))
}

/// Property and quantity set definitions
pub fn is_property_definition(type_name: &str) -> bool {
    type_name.eq_ignore_ascii_case("IFCPROPERTYSET")
        || type_name.eq_ignore_ascii_case("IFCELEMENTQUANTITY")
}

/// Quantity kind for IfcQuantity* entities
pub fn quantity_kind(type_name: &str) -> Option<&'static str> {
    const KINDS: &[(&str, &str)] = &[
        ("IFCQUANTITYLENGTH", "length"),
        ("IFCQUANTITYAREA", "area"),
        ("IFCQUANTITYVOLUME", "volume"),
        ("IFCQUANTITYCOUNT", "count"),
        ("IFCQUANTITYWEIGHT", "weight"),
        ("IFCQUANTITYTIME", "time"),
    ];
    KINDS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(type_name))
        .map(|(_, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_case_insensitive() {
        assert!(is_spatial("IFCBUILDINGSTOREY"));
        assert!(is_element("IFCWALLSTANDARDCASE"));
        assert!(is_element("IfcDoor"));
        assert!(!is_element("IFCPROPERTYSET"));
        assert!(is_relationship("IFCRELDEFINESBYPROPERTIES"));
        assert!(!is_relationship("IFCR"));
        assert!(is_property_definition("IfcElementQuantity"));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("IFCWALLSTANDARDCASE"), Some("IfcWallStandardCase"));
        assert_eq!(display_name("IFCCUSTOMTHING"), None);
    }

    #[test]
    fn test_quantity_kind() {
        assert_eq!(quantity_kind("IFCQUANTITYAREA"), Some("area"));
        assert_eq!(quantity_kind("IFCPROPERTYSINGLEVALUE"), None);
    }
}
