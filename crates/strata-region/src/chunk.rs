//! Whole chunk documents: a column of sections plus its entities.
//!
//! ```text
//! root
//! ├── DataVersion: Int
//! └── Level: Compound
//!     ├── xPos, zPos: Int
//!     ├── Sections: List<Compound { Y: Byte, Palette, BlockStates }>
//!     ├── Entities, TileEntities: List<Compound>
//!     └── Status: String  (or LightPopulated / TerrainPopulated before 1466)
//! ```
//!
//! From 2679 on, entities live in separate entity directory documents
//! (`{DataVersion, Position: [x, z], Entities}`) rather than in the chunk.

use std::collections::BTreeMap;

use strata_level::{Cell, CellCoord, Level};
use strata_nbt::{Compound, Tag};

use crate::error::CodecError;
use crate::schema::{
    self, BLOCK_ENTITY_X, BLOCK_ENTITY_Z, DATA_VERSION, ENTITIES, ENTITY_DIRECTORY_ENTITIES,
    ENTITY_DIRECTORY_POSITION, ENTITY_POS, LEVEL, LIGHT_POPULATED, SECTION_Y, SECTIONS, STATUS,
    TERRAIN_POPULATED, TILE_ENTITIES, X_POS, Z_POS,
};
use crate::section::SectionCodec;
use crate::version::DataVersion;

/// Status written for chunks whose generation is complete.
const STATUS_FULL: &str = "full";

/// One 16-block-wide column of the world, as stored in a chunk document.
#[derive(Clone, Debug, Default)]
pub struct ChunkColumn {
    /// Chunk X coordinate (in 16-block units).
    pub x: i32,
    /// Chunk Z coordinate (in 16-block units).
    pub z: i32,
    /// Cells keyed by section height, in 16-block units.
    pub sections: BTreeMap<i8, Cell>,
    pub entities: Vec<Compound>,
    pub block_entities: Vec<Compound>,
}

impl ChunkColumn {
    pub fn new(x: i32, z: i32) -> Self {
        Self {
            x,
            z,
            ..Self::default()
        }
    }

    /// Places this column's cells, entities and block entities into `level`.
    pub fn merge_into(self, level: &mut Level) {
        for (y, cell) in self.sections {
            level.put(CellCoord::new(self.x, i32::from(y), self.z), cell);
        }
        level.entities.extend(self.entities);
        level.block_entities.extend(self.block_entities);
    }

    /// Splits a level into columns, ordered by X then Z.
    ///
    /// Entities are assigned by their `Pos`, block entities by their `x`/`z`.
    /// Ones without a readable position are dropped with a warning.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArgument`] if a cell's Y coordinate does not fit
    /// in a section's `Y` byte.
    pub fn from_level(level: &Level, version: DataVersion) -> Result<Vec<ChunkColumn>, CodecError> {
        let mut columns: BTreeMap<(i32, i32), ChunkColumn> = BTreeMap::new();
        for (coord, cell) in level {
            let y = i8::try_from(coord.y).map_err(|_| {
                CodecError::InvalidArgument(format!("cell Y {} does not fit in a section", coord.y))
            })?;
            column_at(&mut columns, coord.x, coord.z).sections.insert(y, cell.clone());
        }

        for entity in &level.entities {
            match entity_chunk(entity, version) {
                Some((x, z)) => column_at(&mut columns, x, z).entities.push(entity.clone()),
                None => tracing::warn!("dropping entity without a position"),
            }
        }
        for block_entity in &level.block_entities {
            match block_entity_chunk(block_entity, version) {
                Some((x, z)) => column_at(&mut columns, x, z)
                    .block_entities
                    .push(block_entity.clone()),
                None => tracing::warn!("dropping block entity without a position"),
            }
        }

        Ok(columns.into_values().collect())
    }
}

fn column_at(columns: &mut BTreeMap<(i32, i32), ChunkColumn>, x: i32, z: i32) -> &mut ChunkColumn {
    columns.entry((x, z)).or_insert_with(|| ChunkColumn::new(x, z))
}

fn entity_chunk(entity: &Compound, version: DataVersion) -> Option<(i32, i32)> {
    let pos = schema::get_from(entity, &ENTITY_POS, false, version).ok()??.as_list()?;
    let (Some(Tag::Double(x)), Some(Tag::Double(z))) = (pos.first(), pos.get(2)) else {
        return None;
    };
    if !x.is_finite() || !z.is_finite() {
        return None;
    }
    Some(((x / 16.0).floor() as i32, (z / 16.0).floor() as i32))
}

fn block_entity_chunk(block_entity: &Compound, version: DataVersion) -> Option<(i32, i32)> {
    let x = schema::get_from(block_entity, &BLOCK_ENTITY_X, false, version).ok()??.as_i32()?;
    let z = schema::get_from(block_entity, &BLOCK_ENTITY_Z, false, version).ok()??.as_i32()?;
    Some((x >> 4, z >> 4))
}

fn compounds(list: Option<&Tag>) -> Vec<Compound> {
    list.and_then(Tag::as_list)
        .unwrap_or_default()
        .iter()
        .filter_map(|t| t.as_compound().cloned())
        .collect()
}

fn compound_list(items: &[Compound]) -> Tag {
    Tag::List(items.iter().cloned().map(Tag::Compound).collect())
}

/// Converts [`ChunkColumn`]s to and from chunk documents.
#[derive(Clone, Copy, Debug)]
pub struct ChunkCodec {
    version: DataVersion,
    sections: SectionCodec,
}

impl ChunkCodec {
    pub fn new(version: DataVersion, min_bits: u32) -> Result<Self, CodecError> {
        schema::require_fields(version, &[&LEVEL, &X_POS, &Z_POS, &SECTIONS, &SECTION_Y])?;
        Ok(Self {
            version,
            sections: SectionCodec::new(version, min_bits)?,
        })
    }

    /// Returns the data version a chunk document was written in.
    ///
    /// Documents without a `DataVersion` predate it and report
    /// [`DataVersion::UNVERSIONED`].
    pub fn detect_version(root: &Compound) -> DataVersion {
        // Read directly: the version is not known until this field is.
        root.get(DATA_VERSION.name)
            .and_then(Tag::as_i32)
            .map_or(DataVersion::UNVERSIONED, DataVersion)
    }

    /// Creates a codec matching the version `root` was written in.
    pub fn for_document(root: &Compound, min_bits: u32) -> Result<Self, CodecError> {
        Self::new(Self::detect_version(root), min_bits)
    }

    pub fn version(&self) -> DataVersion {
        self.version
    }

    /// Decodes a chunk document.
    ///
    /// Sections without a `Palette` (e.g. light-only sections) are skipped.
    pub fn decode(&self, root: &Compound) -> Result<ChunkColumn, CodecError> {
        let v = self.version;
        let level = schema::require(root, &LEVEL, v)?
            .as_compound()
            .ok_or_else(|| LEVEL.missing())?;
        let x = schema::require(level, &X_POS, v)?.as_i32().ok_or_else(|| X_POS.missing())?;
        let z = schema::require(level, &Z_POS, v)?.as_i32().ok_or_else(|| Z_POS.missing())?;

        let mut column = ChunkColumn::new(x, z);
        for section in compounds(schema::get_from(level, &SECTIONS, false, v)?) {
            let y = schema::require(&section, &SECTION_Y, v)?
                .as_i8()
                .ok_or_else(|| SECTION_Y.missing())?;
            if schema::get_from(&section, &schema::PALETTE, false, v)?.is_none() {
                tracing::trace!(x, z, y, "skipping section without palette");
                continue;
            }
            column.sections.insert(y, self.sections.decode(&section)?);
        }
        column.entities = compounds(schema::get_from(level, &ENTITIES, false, v)?);
        column.block_entities = compounds(schema::get_from(level, &TILE_ENTITIES, false, v)?);

        tracing::debug!(
            x,
            z,
            sections = column.sections.len(),
            entities = column.entities.len(),
            version = v.0,
            "decoded chunk"
        );
        Ok(column)
    }

    /// Encodes a column into a chunk document.
    ///
    /// From 2679 on, entities are left out; see [`ChunkCodec::encode_entities`].
    pub fn encode(&self, column: &ChunkColumn) -> Result<Compound, CodecError> {
        let v = self.version;
        let mut level = Compound::new();
        schema::set_for(&mut level, &X_POS, Tag::Int(column.x), v)?;
        schema::set_for(&mut level, &Z_POS, Tag::Int(column.z), v)?;

        let mut sections = Vec::with_capacity(column.sections.len());
        for (&y, cell) in &column.sections {
            let mut section = self.sections.encode(cell)?;
            schema::set_for(&mut section, &SECTION_Y, Tag::Byte(y), v)?;
            sections.push(Tag::Compound(section));
        }
        schema::set_for(&mut level, &SECTIONS, Tag::List(sections), v)?;

        if !v.is_entity_directory_supported() {
            schema::set_for(&mut level, &ENTITIES, compound_list(&column.entities), v)?;
        }
        schema::set_for(&mut level, &TILE_ENTITIES, compound_list(&column.block_entities), v)?;

        if v.is_status_tag_supported() {
            schema::set_for(&mut level, &STATUS, Tag::from(STATUS_FULL), v)?;
        } else {
            schema::set_for(&mut level, &TERRAIN_POPULATED, Tag::Byte(1), v)?;
            schema::set_for(&mut level, &LIGHT_POPULATED, Tag::Byte(0), v)?;
        }

        let mut root = Compound::new();
        schema::set_for(&mut root, &DATA_VERSION, Tag::Int(v.0), v)?;
        schema::set_for(&mut root, &LEVEL, Tag::Compound(level), v)?;
        Ok(root)
    }

    /// Encodes a column's entities as an entity directory document.
    ///
    /// Returns `None` before 2679, where entities stay in the chunk, or when
    /// the column has no entities.
    pub fn encode_entities(&self, column: &ChunkColumn) -> Result<Option<Compound>, CodecError> {
        let v = self.version;
        if !v.is_entity_directory_supported() || column.entities.is_empty() {
            return Ok(None);
        }
        let mut root = Compound::new();
        schema::set_for(&mut root, &DATA_VERSION, Tag::Int(v.0), v)?;
        schema::set_for(
            &mut root,
            &ENTITY_DIRECTORY_POSITION,
            Tag::IntArray(vec![column.x, column.z]),
            v,
        )?;
        schema::set_for(
            &mut root,
            &ENTITY_DIRECTORY_ENTITIES,
            compound_list(&column.entities),
            v,
        )?;
        Ok(Some(root))
    }

    /// Reads an entity directory document into `column`'s entities.
    ///
    /// # Errors
    ///
    /// [`CodecError::InvalidArgument`] if the document's position is not the
    /// column's.
    pub fn decode_entities(&self, root: &Compound, column: &mut ChunkColumn) -> Result<(), CodecError> {
        let v = self.version;
        let position = schema::require(root, &ENTITY_DIRECTORY_POSITION, v)?;
        if position != &Tag::IntArray(vec![column.x, column.z]) {
            return Err(CodecError::InvalidArgument(format!(
                "entity document at {position:?} does not belong to chunk ({}, {})",
                column.x, column.z
            )));
        }
        let entities = compounds(schema::get_from(root, &ENTITY_DIRECTORY_ENTITIES, false, v)?);
        column.entities.extend(entities);
        Ok(())
    }
}
