// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attribute classification table

/// Mesh payload attribute
pub const ATTRIBUTE_MESH: &str = "usd::usdgeom::mesh";
/// Transform payload attribute
pub const ATTRIBUTE_XFORMOP: &str = "usd::xformop";
/// Visibility attribute
pub const ATTRIBUTE_VISIBILITY: &str = "usd::usdgeom::visibility";
/// Diffuse color attribute
pub const ATTRIBUTE_DIFFUSECOLOR: &str = "bsi::ifc::presentation::diffuseColor";
/// Opacity attribute, read as a sibling of the diffuse color
pub const ATTRIBUTE_OPACITY: &str = "bsi::ifc::presentation::opacity";
/// Class attribute, read to pick the coplanar offset
pub const ATTRIBUTE_CLASS: &str = "bsi::ifc::class";

/// Emission strategy for one attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// Never emitted
    Excluded,
    /// Component tag without a value
    NameOnly,
    /// Numeric array as `{{a, b, c}}`
    Vector,
    /// String value used as the enum case
    Enum,
    /// References to other objects, emitted as pairs
    Relationship,
    /// Mesh payload registered with the mesh store
    Mesh,
    /// Matrix decomposed into position, rotation and scale
    Transform,
    /// Diffuse color registered with the material store
    Material,
    /// Visibility flag, also registered as a material
    Visibility,
    /// Everything else
    Generic,
}

/// Bare attribute names with a non-generic strategy
pub static RULES: &[(&str, AttributeKind)] = &[
    ("customdata", AttributeKind::Excluded),
    (ATTRIBUTE_OPACITY, AttributeKind::Excluded),
    ("usd::usdgeom::basiscurves", AttributeKind::NameOnly),
    ("usd::usdgeom::extent", AttributeKind::Vector),
    ("bsi::ifc::prop::FireRating", AttributeKind::Enum),
    ("bsi::ifc::spaceBoundary", AttributeKind::Relationship),
    ("bsi::ifc::systemMembership", AttributeKind::Relationship),
    ("bsi::ifc::connectsTo", AttributeKind::Relationship),
    (ATTRIBUTE_MESH, AttributeKind::Mesh),
    (ATTRIBUTE_XFORMOP, AttributeKind::Transform),
    (ATTRIBUTE_DIFFUSECOLOR, AttributeKind::Material),
    (ATTRIBUTE_VISIBILITY, AttributeKind::Visibility),
];

/// Look up the strategy for a bare attribute name
pub fn classify_attribute(bare_name: &str) -> AttributeKind {
    RULES
        .iter()
        .find(|(name, _)| *name == bare_name)
        .map(|(_, kind)| *kind)
        .unwrap_or(AttributeKind::Generic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        assert_eq!(classify_attribute("customdata"), AttributeKind::Excluded);
        assert_eq!(classify_attribute(ATTRIBUTE_OPACITY), AttributeKind::Excluded);
        assert_eq!(classify_attribute("bsi::ifc::prop::FireRating"), AttributeKind::Enum);
        assert_eq!(classify_attribute("bsi::ifc::spaceBoundary"), AttributeKind::Relationship);
        assert_eq!(classify_attribute(ATTRIBUTE_MESH), AttributeKind::Mesh);
        assert_eq!(classify_attribute(ATTRIBUTE_XFORMOP), AttributeKind::Transform);
        assert_eq!(classify_attribute(ATTRIBUTE_DIFFUSECOLOR), AttributeKind::Material);
        assert_eq!(classify_attribute(ATTRIBUTE_VISIBILITY), AttributeKind::Visibility);
        assert_eq!(classify_attribute("bsi::ifc::prop::Height"), AttributeKind::Generic);
    }

    #[test]
    fn test_exact_match_only() {
        assert_eq!(classify_attribute("usd::usdgeom::mesh2"), AttributeKind::Generic);
        assert_eq!(classify_attribute("customdata::x"), AttributeKind::Generic);
    }

    #[test]
    fn test_table_has_no_duplicates() {
        for (i, (name, _)) in RULES.iter().enumerate() {
            assert!(RULES[i + 1..].iter().all(|(other, _)| other != name), "{name}");
        }
    }
}
