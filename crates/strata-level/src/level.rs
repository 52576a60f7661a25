//! Coordinate-keyed container of cells.
//!
//! A [`Level`] places cells on a grid measured in 16-block units and carries
//! the level's free-form metadata, entities and block entities as raw tag
//! documents. Cells iterate in X, then Z, then Y order.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use strata_nbt::Compound;

use crate::cell::Cell;
use crate::error::LevelError;
use crate::palette::Palette;

/// Position of a cell in the level, in 16-block units.
///
/// Field order defines the sort order: X, then Z, then Y.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, z, y }
    }
}

/// A sparse collection of cells plus level-wide documents.
#[derive(Clone, Debug, Default)]
pub struct Level {
    cells: BTreeMap<CellCoord, Cell>,
    /// Persistent, application-defined data about the level.
    pub metadata: Compound,
    /// Raw entity documents (mobs, objects).
    pub entities: Vec<Compound>,
    /// Raw block entity documents (containers, signs).
    pub block_entities: Vec<Compound>,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `cell` at `coord`, returning the cell it replaced.
    pub fn put(&mut self, coord: CellCoord, cell: Cell) -> Option<Cell> {
        self.cells.insert(coord, cell)
    }

    pub fn get(&self, coord: CellCoord) -> Option<&Cell> {
        self.cells.get(&coord)
    }

    pub fn get_mut(&mut self, coord: CellCoord) -> Option<&mut Cell> {
        self.cells.get_mut(&coord)
    }

    pub fn remove(&mut self, coord: CellCoord) -> Option<Cell> {
        self.cells.remove(&coord)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cells in X, Z, Y order.
    pub fn iter(&self) -> btree_map::Iter<'_, CellCoord, Cell> {
        self.cells.iter()
    }

    /// Smallest and largest occupied coordinates, or `None` for an empty level.
    pub fn bounds(&self) -> Option<(CellCoord, CellCoord)> {
        let mut keys = self.cells.keys();
        let first = *keys.next()?;
        let (mut min, mut max) = (first, first);
        for c in keys {
            min = CellCoord::new(min.x.min(c.x), min.y.min(c.y), min.z.min(c.z));
            max = CellCoord::new(max.x.max(c.x), max.y.max(c.y), max.z.max(c.z));
        }
        Some((min, max))
    }

    /// Collects the distinct palettes used by the level's cells, in order of
    /// first use.
    ///
    /// # Errors
    ///
    /// Returns [`LevelError::DuplicatePaletteName`] if two palettes that are
    /// not equal share a name.
    pub fn palettes(&self) -> Result<Vec<Arc<Palette>>, LevelError> {
        let mut by_name: FxHashMap<&str, usize> = FxHashMap::default();
        let mut palettes: Vec<Arc<Palette>> = Vec::new();
        for cell in self.cells.values() {
            let palette = cell.palette();
            match by_name.get(palette.name()) {
                Some(&i) => {
                    let existing = &palettes[i];
                    if !Arc::ptr_eq(existing, palette) && **existing != **palette {
                        return Err(LevelError::DuplicatePaletteName(palette.name().to_string()));
                    }
                }
                None => {
                    by_name.insert(palette.name(), palettes.len());
                    palettes.push(Arc::clone(palette));
                }
            }
        }
        Ok(palettes)
    }
}

impl<'a> IntoIterator for &'a Level {
    type Item = (&'a CellCoord, &'a Cell);
    type IntoIter = btree_map::Iter<'a, CellCoord, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
