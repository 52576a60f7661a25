//! Conversions between the interchange messages and the voxel model.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use strata_bits::BitPacker;
use strata_level::{AIR, BlockState, Cell, CellCoord, Level, LevelError, Palette};
use strata_nbt::{decode_compound, encode_compound};

use crate::error::WireError;
use crate::messages::{BlockStateData, CellData, LevelData, PackedArrayData, PaletteData, PlacedCell};

/// Palettes of a level being decoded, by name.
pub type PaletteTable = FxHashMap<String, Arc<Palette>>;

impl TryFrom<&BitPacker> for PackedArrayData {
    type Error = WireError;

    fn try_from(packer: &BitPacker) -> Result<Self, Self::Error> {
        let size = u32::try_from(packer.len()).map_err(|_| WireError::TooLarge("packed array"))?;
        Ok(Self {
            size,
            magnitude: packer.magnitude(),
            contents: packer.as_bytes().to_vec(),
        })
    }
}

impl PackedArrayData {
    /// Rebuilds the packer, validating the buffer length.
    pub fn to_packer(&self) -> Result<BitPacker, WireError> {
        Ok(BitPacker::from_raw(
            self.size as usize,
            self.magnitude,
            self.contents.clone(),
        )?)
    }
}

impl BlockStateData {
    pub fn from_state(state: &BlockState) -> Result<Self, WireError> {
        Ok(Self {
            name: state.name().to_string(),
            properties: encode_compound(state.properties())?,
        })
    }

    /// Bare `air` decodes to the empty marker so empty cells survive the trip.
    pub fn to_state(&self) -> Result<BlockState, WireError> {
        let properties = decode_compound(&self.properties)?;
        if self.name == AIR && properties.is_empty() {
            return Ok(BlockState::air());
        }
        Ok(BlockState::with_properties(self.name.clone(), properties))
    }
}

impl PaletteData {
    pub fn from_palette(palette: &Palette) -> Result<Self, WireError> {
        let states = palette
            .iter()
            .map(BlockStateData::from_state)
            .collect::<Result<_, _>>()?;
        Ok(Self {
            name: palette.name().to_string(),
            data_version: palette.data_version(),
            states,
        })
    }

    pub fn to_palette(&self) -> Result<Palette, WireError> {
        let states = self
            .states
            .iter()
            .map(BlockStateData::to_state)
            .collect::<Result<_, _>>()?;
        Ok(Palette::new(self.name.clone(), self.data_version, states))
    }
}

impl CellData {
    pub fn from_cell(cell: &Cell) -> Result<Self, WireError> {
        Ok(Self {
            palette_name: cell.palette().name().to_string(),
            blocks: PackedArrayData::try_from(cell.blocks())?,
        })
    }

    /// Rebuilds the cell around the shared palette named by `palette_name`.
    ///
    /// # Errors
    ///
    /// [`WireError::UnknownPalette`] if `palettes` has no such name.
    pub fn to_cell(&self, palettes: &PaletteTable) -> Result<Cell, WireError> {
        let palette = palettes
            .get(&self.palette_name)
            .ok_or_else(|| WireError::UnknownPalette(self.palette_name.clone()))?;
        Ok(Cell::new(Arc::clone(palette), self.blocks.to_packer()?)?)
    }
}

impl LevelData {
    /// Collects every distinct palette once, then each cell by reference.
    ///
    /// # Errors
    ///
    /// [`WireError::Level`] if two different palettes share a name.
    pub fn from_level(level: &Level) -> Result<Self, WireError> {
        let palettes: Vec<PaletteData> = level
            .palettes()?
            .iter()
            .map(|p| PaletteData::from_palette(p))
            .collect::<Result<_, _>>()?;

        let mut cells = Vec::with_capacity(level.len());
        for (coord, cell) in level {
            cells.push(PlacedCell {
                x: coord.x,
                y: coord.y,
                z: coord.z,
                cell: CellData::from_cell(cell)?,
            });
        }

        let entities = level
            .entities
            .iter()
            .map(encode_compound)
            .collect::<Result<_, _>>()?;
        let block_entities = level
            .block_entities
            .iter()
            .map(encode_compound)
            .collect::<Result<_, _>>()?;

        tracing::debug!(
            cells = cells.len(),
            palettes = palettes.len(),
            "converted level to interchange form"
        );
        Ok(Self {
            cells,
            palettes,
            metadata: encode_compound(&level.metadata)?,
            entities,
            block_entities,
        })
    }

    /// Rebuilds the level; cells naming the same palette share one instance.
    pub fn to_level(&self) -> Result<Level, WireError> {
        let mut palettes = PaletteTable::default();
        for data in &self.palettes {
            if palettes.contains_key(&data.name) {
                return Err(LevelError::DuplicatePaletteName(data.name.clone()).into());
            }
            palettes.insert(data.name.clone(), Arc::new(data.to_palette()?));
        }

        let mut level = Level::new();
        for placed in &self.cells {
            let coord = CellCoord::new(placed.x, placed.y, placed.z);
            if level.put(coord, placed.cell.to_cell(&palettes)?).is_some() {
                tracing::warn!(x = coord.x, y = coord.y, z = coord.z, "duplicate cell, keeping last");
            }
        }

        level.metadata = decode_compound(&self.metadata)?;
        level.entities = self
            .entities
            .iter()
            .map(|bytes| decode_compound(bytes))
            .collect::<Result<_, _>>()?;
        level.block_entities = self
            .block_entities
            .iter()
            .map(|bytes| decode_compound(bytes))
            .collect::<Result<_, _>>()?;
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_level::voxel_index;
    use strata_nbt::{Compound, NbtError, Tag};

    fn log_state() -> BlockState {
        let mut props = Compound::new();
        props.insert("axis".into(), Tag::from("x"));
        BlockState::with_properties("minecraft:oak_log", props)
    }

    fn shared_palette() -> Arc<Palette> {
        Arc::new(Palette::new(
            "forest",
            2586,
            vec![BlockState::new("minecraft:air"), BlockState::new("minecraft:grass"), log_state()],
        ))
    }

    fn cell_with(palette: &Arc<Palette>, value: u32) -> Cell {
        let mut cell = Cell::new(Arc::clone(palette), BitPacker::new(4096, 2).unwrap()).unwrap();
        cell.set(3, 4, 5, value).unwrap();
        cell
    }

    #[test]
    fn test_packed_array_roundtrip() {
        let packer = BitPacker::from_values(&[1, 7, 0, 5, 3]);
        let data = PackedArrayData::try_from(&packer).unwrap();
        assert_eq!(data.size, 5);
        assert_eq!(data.magnitude, 3);
        assert_eq!(data.to_packer().unwrap(), packer);
    }

    #[test]
    fn test_packed_array_rejects_wrong_length() {
        let data = PackedArrayData {
            size: 5,
            magnitude: 3,
            contents: vec![0; 3],
        };
        assert!(matches!(data.to_packer(), Err(WireError::Pack(_))));
    }

    #[test]
    fn test_hostile_properties_fail_the_state_only() {
        let data = BlockStateData {
            name: "minecraft:stone".into(),
            properties: vec![12, 0, 1, b'n', 0x7F, 0xFF, 0xFF, 0xFF],
        };
        assert!(matches!(data.to_state(), Err(WireError::Nbt(NbtError::Io(_)))));
    }

    #[test]
    fn test_mixed_list_property_rejected() {
        let mut props = Compound::new();
        props.insert("l".into(), Tag::List(vec![Tag::Int(1), Tag::from("x")]));
        let state = BlockState::with_properties("test:odd", props);
        assert!(matches!(
            BlockStateData::from_state(&state),
            Err(WireError::Nbt(NbtError::MixedList { .. }))
        ));
    }

    #[test]
    fn test_block_state_properties_survive() {
        let state = log_state();
        let data = BlockStateData::from_state(&state).unwrap();
        assert!(!data.properties.is_empty());
        assert_eq!(data.to_state().unwrap(), state);

        let plain = BlockStateData::from_state(&BlockState::new("minecraft:dirt")).unwrap();
        assert!(plain.properties.is_empty());
    }

    #[test]
    fn test_air_marker_restored() {
        let data = BlockStateData::from_state(&BlockState::air()).unwrap();
        assert!(data.to_state().unwrap().is_empty());
        let data = BlockStateData::from_state(&BlockState::new("minecraft:air")).unwrap();
        assert!(!data.to_state().unwrap().is_empty());
    }

    #[test]
    fn test_level_shares_palettes() {
        let palette = shared_palette();
        let mut level = Level::new();
        level.put(CellCoord::new(0, 0, 0), cell_with(&palette, 1));
        level.put(CellCoord::new(0, 1, 0), cell_with(&palette, 2));
        level.put(CellCoord::new(5, 0, -3), Cell::empty());
        level.metadata.insert("name".into(), Tag::from("test"));
        let mut entity = Compound::new();
        entity.insert("id".into(), Tag::from("minecraft:pig"));
        level.entities.push(entity);

        let data = LevelData::from_level(&level).unwrap();
        assert_eq!(data.palettes.len(), 2);
        assert_eq!(data.cells.len(), 3);

        let decoded = LevelData::to_level(&data).unwrap();
        let a = decoded.get(CellCoord::new(0, 0, 0)).unwrap();
        let b = decoded.get(CellCoord::new(0, 1, 0)).unwrap();
        assert!(Arc::ptr_eq(a.palette(), b.palette()));
        assert_eq!(**a.palette(), *palette);
        assert_eq!(a.get(3, 4, 5).unwrap(), 1);
        assert_eq!(b.state_at(3, 4, 5).unwrap(), Some(&log_state()));
        assert!(decoded.get(CellCoord::new(5, 0, -3)).unwrap().is_air());
        assert_eq!(decoded.metadata, level.metadata);
        assert_eq!(decoded.entities, level.entities);
        assert!(decoded.block_entities.is_empty());
    }

    #[test]
    fn test_unknown_palette_rejected() {
        let mut data = LevelData::from_level(&{
            let mut level = Level::new();
            level.put(CellCoord::new(0, 0, 0), cell_with(&shared_palette(), 1));
            level
        })
        .unwrap();
        data.palettes.clear();
        assert!(matches!(
            data.to_level(),
            Err(WireError::UnknownPalette(name)) if name == "forest"
        ));
    }

    #[test]
    fn test_duplicate_palette_rejected() {
        let palette = PaletteData::from_palette(&shared_palette()).unwrap();
        let data = LevelData {
            palettes: vec![palette.clone(), palette],
            ..LevelData::default()
        };
        assert!(matches!(
            data.to_level(),
            Err(WireError::Level(LevelError::DuplicatePaletteName(_)))
        ));
    }

    #[test]
    fn test_cell_block_values_preserved() {
        let palette = shared_palette();
        let cell = cell_with(&palette, 2);
        let mut table = PaletteTable::default();
        table.insert(palette.name().to_string(), Arc::clone(&palette));
        let decoded = CellData::from_cell(&cell).unwrap().to_cell(&table).unwrap();
        assert_eq!(decoded, cell);
        assert_eq!(decoded.blocks().get(voxel_index(3, 4, 5).unwrap()).unwrap(), 2);
    }
}
