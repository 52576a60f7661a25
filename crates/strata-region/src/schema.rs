//! Registry of the legacy chunk schema's fields.
//!
//! Each [`SchemaField`] names a field, its tag type, the element type of list
//! fields, and the inclusive range of data versions in which it is legal.
//! Codecs never touch a chunk document directly; they go through
//! [`get_from`] and [`set_for`], which enforce those rules in one place.

use strata_nbt::{Compound, Tag, TagType};

use crate::error::CodecError;
use crate::version::DataVersion;

/// A named, typed, version-ranged field of the chunk schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SchemaField {
    pub name: &'static str,
    pub value_type: TagType,
    /// Element type, for list fields only.
    pub list_element_type: Option<TagType>,
    pub min_version: i32,
    pub max_version: i32,
}

impl SchemaField {
    /// A field legal in every version from 99 on.
    const fn new(name: &'static str, value_type: TagType) -> Self {
        Self {
            name,
            value_type,
            list_element_type: None,
            min_version: DataVersion::UNVERSIONED.0,
            max_version: i32::MAX,
        }
    }

    const fn list(name: &'static str, element: TagType) -> Self {
        let mut field = Self::new(name, TagType::List);
        field.list_element_type = Some(element);
        field
    }

    const fn since(mut self, min_version: i32) -> Self {
        self.min_version = min_version;
        self
    }

    const fn until(mut self, max_version: i32) -> Self {
        self.max_version = max_version;
        self
    }

    pub(crate) fn missing(&self) -> CodecError {
        CodecError::MissingRequiredField {
            field: self.name,
            expected: self.value_type,
        }
    }

    fn unsupported(&self, version: DataVersion) -> CodecError {
        CodecError::UnsupportedVersion {
            field: self.name,
            version: version.0,
            min: self.min_version,
            max: self.max_version,
        }
    }

    /// Checks `value` against the field's type (and element type for lists).
    fn check_type(&self, value: &Tag) -> Result<(), CodecError> {
        let found = value.tag_type();
        if found != self.value_type {
            return Err(CodecError::TypeMismatch {
                field: self.name,
                expected: self.value_type,
                found,
            });
        }
        if let (Some(expected), Tag::List(items)) = (self.list_element_type, value)
            && let Some(bad) = items.iter().find(|item| item.tag_type() != expected)
        {
            return Err(CodecError::TypeMismatch {
                field: self.name,
                expected,
                found: bad.tag_type(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fields
// ---------------------------------------------------------------------------

// Chunk root.

pub const DATA_VERSION: SchemaField = SchemaField::new("DataVersion", TagType::Int).since(100);
pub const LEVEL: SchemaField = SchemaField::new("Level", TagType::Compound);

// Chunk (inside `Level`).

pub const X_POS: SchemaField = SchemaField::new("xPos", TagType::Int);
pub const Z_POS: SchemaField = SchemaField::new("zPos", TagType::Int);
pub const SECTIONS: SchemaField = SchemaField::list("Sections", TagType::Compound);
pub const ENTITIES: SchemaField = SchemaField::list("Entities", TagType::Compound);
pub const TILE_ENTITIES: SchemaField = SchemaField::list("TileEntities", TagType::Compound);
pub const STATUS: SchemaField = SchemaField::new("Status", TagType::String).since(1466);
pub const LIGHT_POPULATED: SchemaField =
    SchemaField::new("LightPopulated", TagType::Byte).until(1465);
pub const TERRAIN_POPULATED: SchemaField =
    SchemaField::new("TerrainPopulated", TagType::Byte).until(1465);

// Section.

pub const SECTION_Y: SchemaField = SchemaField::new("Y", TagType::Byte);
pub const PALETTE: SchemaField = SchemaField::list("Palette", TagType::Compound).since(1451);
pub const BLOCK_STATES: SchemaField = SchemaField::new("BlockStates", TagType::LongArray).since(1451);
pub const LEGACY_BLOCKS: SchemaField = SchemaField::new("Blocks", TagType::ByteArray).until(1450);
pub const LEGACY_DATA: SchemaField = SchemaField::new("Data", TagType::ByteArray).until(1450);
pub const LEGACY_ADD: SchemaField = SchemaField::new("Add", TagType::ByteArray).until(1450);

// Palette entry.

pub const BLOCK_NAME: SchemaField = SchemaField::new("Name", TagType::String).since(1451);
pub const BLOCK_PROPERTIES: SchemaField =
    SchemaField::new("Properties", TagType::Compound).since(1451);

// Entity and block entity positions.

pub const ENTITY_POS: SchemaField = SchemaField::list("Pos", TagType::Double);
pub const BLOCK_ENTITY_X: SchemaField = SchemaField::new("x", TagType::Int);
pub const BLOCK_ENTITY_Y: SchemaField = SchemaField::new("y", TagType::Int);
pub const BLOCK_ENTITY_Z: SchemaField = SchemaField::new("z", TagType::Int);

// Entity directory files.

pub const ENTITY_DIRECTORY_ENTITIES: SchemaField =
    SchemaField::list("Entities", TagType::Compound).since(2679);
pub const ENTITY_DIRECTORY_POSITION: SchemaField =
    SchemaField::new("Position", TagType::IntArray).since(2679);

/// Every field of the schema.
pub const FIELDS: &[SchemaField] = &[
    DATA_VERSION,
    LEVEL,
    X_POS,
    Z_POS,
    SECTIONS,
    ENTITIES,
    TILE_ENTITIES,
    STATUS,
    LIGHT_POPULATED,
    TERRAIN_POPULATED,
    SECTION_Y,
    PALETTE,
    BLOCK_STATES,
    LEGACY_BLOCKS,
    LEGACY_DATA,
    LEGACY_ADD,
    BLOCK_NAME,
    BLOCK_PROPERTIES,
    ENTITY_POS,
    BLOCK_ENTITY_X,
    BLOCK_ENTITY_Y,
    BLOCK_ENTITY_Z,
    ENTITY_DIRECTORY_ENTITIES,
    ENTITY_DIRECTORY_POSITION,
];

// ---------------------------------------------------------------------------
// Access
// ---------------------------------------------------------------------------

/// Returns `true` if `field` is legal in `version` (bounds inclusive).
pub fn is_supported(field: &SchemaField, version: DataVersion) -> bool {
    (field.min_version..=field.max_version).contains(&version.0)
}

/// Fails with [`CodecError::UnsupportedVersion`] for the first of `fields`
/// that is not legal in `version`.
pub fn require_fields(version: DataVersion, fields: &[&SchemaField]) -> Result<(), CodecError> {
    match fields.iter().find(|f| !is_supported(f, version)) {
        Some(field) => Err(field.unsupported(version)),
        None => Ok(()),
    }
}

/// Reads `field` from `document`.
///
/// A missing or mistyped value yields `Ok(None)`, or
/// [`CodecError::MissingRequiredField`] when `required` is set.
///
/// # Errors
///
/// Fails with [`CodecError::UnsupportedVersion`] before looking at the
/// document if the field is not legal in `version`.
pub fn get_from<'a>(
    document: &'a Compound,
    field: &SchemaField,
    required: bool,
    version: DataVersion,
) -> Result<Option<&'a Tag>, CodecError> {
    if !is_supported(field, version) {
        return Err(field.unsupported(version));
    }
    match document.get(field.name) {
        Some(value) if field.check_type(value).is_ok() => Ok(Some(value)),
        _ if required => Err(field.missing()),
        _ => Ok(None),
    }
}

/// Like [`get_from`] with `required` set, unwrapping the value.
pub fn require<'a>(
    document: &'a Compound,
    field: &SchemaField,
    version: DataVersion,
) -> Result<&'a Tag, CodecError> {
    get_from(document, field, true, version)?.ok_or_else(|| field.missing())
}

/// Writes `value` into `document` under `field`, replacing any existing value.
///
/// # Errors
///
/// [`CodecError::UnsupportedVersion`] if the field is not legal in `version`;
/// [`CodecError::TypeMismatch`] if `value` (or one of its list elements) has
/// the wrong type. The document is unchanged on error.
pub fn set_for(
    document: &mut Compound,
    field: &SchemaField,
    value: Tag,
    version: DataVersion,
) -> Result<(), CodecError> {
    if !is_supported(field, version) {
        return Err(field.unsupported(version));
    }
    field.check_type(&value)?;
    tracing::trace!(field = field.name, version = version.0, "set schema field");
    document.insert(field.name.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const V1450: DataVersion = DataVersion(1450);
    const V2586: DataVersion = DataVersion(2586);

    #[test]
    fn test_table_ranges_are_ordered() {
        for field in FIELDS {
            assert!(field.min_version <= field.max_version, "{}", field.name);
            assert_eq!(
                field.list_element_type.is_some(),
                field.value_type == TagType::List,
                "{}",
                field.name
            );
        }
    }

    #[test]
    fn test_is_supported_bounds_inclusive() {
        assert!(!is_supported(&PALETTE, DataVersion(1450)));
        assert!(is_supported(&PALETTE, DataVersion(1451)));
        assert!(is_supported(&PALETTE, DataVersion(i32::MAX)));
        assert!(is_supported(&LEGACY_BLOCKS, DataVersion(99)));
        assert!(is_supported(&LEGACY_BLOCKS, DataVersion(1450)));
        assert!(!is_supported(&LEGACY_BLOCKS, DataVersion(1451)));
        assert!(!is_supported(&LEGACY_BLOCKS, DataVersion(98)));
        assert!(!is_supported(&DATA_VERSION, DataVersion(99)));
    }

    #[test]
    fn test_version_gating_ignores_document() {
        let mut doc = Compound::new();
        doc.insert("Name".into(), Tag::from("minecraft:stone"));

        for required in [true, false] {
            assert!(matches!(
                get_from(&doc, &BLOCK_NAME, required, V1450),
                Err(CodecError::UnsupportedVersion { field: "Name", version: 1450, min: 1451, .. })
            ));
        }
        assert!(matches!(
            set_for(&mut doc, &BLOCK_NAME, Tag::from("minecraft:dirt"), V1450),
            Err(CodecError::UnsupportedVersion { .. })
        ));
        assert!(matches!(
            set_for(&mut doc, &BLOCK_NAME, Tag::Int(3), V1450),
            Err(CodecError::UnsupportedVersion { .. })
        ));
        assert_eq!(doc.get("Name"), Some(&Tag::from("minecraft:stone")));
    }

    #[test]
    fn test_get_missing_or_mistyped() {
        let mut doc = Compound::new();
        doc.insert("Name".into(), Tag::Int(7));

        assert_eq!(get_from(&doc, &BLOCK_NAME, false, V2586).unwrap(), None);
        assert_eq!(get_from(&doc, &BLOCK_PROPERTIES, false, V2586).unwrap(), None);
        assert!(matches!(
            get_from(&doc, &BLOCK_NAME, true, V2586),
            Err(CodecError::MissingRequiredField { field: "Name", expected: TagType::String })
        ));
    }

    #[test]
    fn test_get_present() {
        let mut doc = Compound::new();
        doc.insert("Name".into(), Tag::from("minecraft:stone"));
        let value = get_from(&doc, &BLOCK_NAME, true, V2586).unwrap();
        assert_eq!(value.and_then(Tag::as_str), Some("minecraft:stone"));
    }

    #[test]
    fn test_set_checks_type() {
        let mut doc = Compound::new();
        assert!(matches!(
            set_for(&mut doc, &X_POS, Tag::Long(1), V2586),
            Err(CodecError::TypeMismatch { field: "xPos", expected: TagType::Int, found: TagType::Long })
        ));
        assert!(doc.is_empty());

        set_for(&mut doc, &X_POS, Tag::Int(1), V2586).unwrap();
        set_for(&mut doc, &X_POS, Tag::Int(-4), V2586).unwrap();
        assert_eq!(doc.get("xPos"), Some(&Tag::Int(-4)));
    }

    #[test]
    fn test_list_element_type_checked() {
        let mut doc = Compound::new();
        let bad = Tag::List(vec![Tag::Compound(Compound::new()), Tag::Int(1)]);
        assert!(matches!(
            set_for(&mut doc, &PALETTE, bad.clone(), V2586),
            Err(CodecError::TypeMismatch { expected: TagType::Compound, found: TagType::Int, .. })
        ));

        // A list of the wrong element type is treated as absent when read.
        doc.insert("Palette".into(), bad);
        assert_eq!(get_from(&doc, &PALETTE, false, V2586).unwrap(), None);

        set_for(&mut doc, &PALETTE, Tag::List(vec![]), V2586).unwrap();
        assert!(get_from(&doc, &PALETTE, true, V2586).unwrap().is_some());
    }

    #[test]
    fn test_require_fields() {
        assert!(require_fields(V2586, &[&BLOCK_NAME, &BLOCK_PROPERTIES]).is_ok());
        assert!(matches!(
            require_fields(V2586, &[&BLOCK_NAME, &LEGACY_BLOCKS]),
            Err(CodecError::UnsupportedVersion { field: "Blocks", .. })
        ));
        assert!(require_fields(V1450, &[]).is_ok());
    }
}
