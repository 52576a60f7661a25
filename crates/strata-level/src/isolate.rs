//! Palette isolation: shrinking a cell's palette to the states it uses.
//!
//! Many cells may share one large palette while each uses only a few of its
//! entries. Isolating a cell gives it a private palette holding only those
//! entries, in their original relative order, and rewrites the block array
//! against it. The rewritten array is repacked at the smallest magnitude that
//! fits, so isolation usually narrows it as well.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use strata_bits::BitPacker;

use crate::cell::Cell;
use crate::palette::Palette;

/// Old → new palette index pairs. Only indices that moved are recorded.
pub type IndexRemap = FxHashMap<u32, u32>;

/// Result of [`Cell::isolate`].
#[derive(Clone, Debug)]
pub struct Isolation {
    /// The isolated cell.
    pub cell: Cell,
    /// Indices of the original palette that changed position.
    pub remap: IndexRemap,
}

/// Returns a fresh palette name that will not collide with any other
/// generated in this or another run.
pub fn synthetic_palette_name() -> String {
    format!("strata:{:032x}", rand::random::<u128>())
}

/// For each of the `palette_len` indices, whether any entry of `blocks` refers
/// to it. Entries outside `0..palette_len` are ignored.
pub fn used_indices(blocks: &BitPacker, palette_len: usize) -> Vec<bool> {
    let mut used = vec![false; palette_len];
    for index in blocks.iter() {
        if let Some(slot) = used.get_mut(index as usize) {
            *slot = true;
        }
    }
    used
}

/// Rewrites every entry of `blocks` through `remap`. Entries with no remap
/// keep their value. The result is packed at the smallest fitting magnitude.
pub fn apply_remap(blocks: &BitPacker, remap: &IndexRemap) -> BitPacker {
    if remap.is_empty() {
        return blocks.clone();
    }
    let values: Vec<u32> = blocks
        .iter()
        .map(|value| remap.get(&value).copied().unwrap_or(value))
        .collect();
    BitPacker::from_values(&values)
}

pub(crate) fn isolate(cell: &Cell) -> Isolation {
    let palette = cell.palette();
    let blocks = cell.blocks();
    let used = used_indices(blocks, palette.len());

    // Fast path: everything is referenced, nothing to shrink.
    if used.iter().all(|&u| u) {
        return Isolation {
            cell: cell.clone(),
            remap: IndexRemap::default(),
        };
    }

    let mut states = Vec::with_capacity(used.iter().filter(|&&u| u).count());
    let mut new_index = vec![None; palette.len()];
    let mut remap = IndexRemap::default();
    for (old, state) in palette.iter().enumerate() {
        if !used[old] {
            continue;
        }
        let new = states.len() as u32;
        new_index[old] = Some(new);
        if old as u32 != new {
            remap.insert(old as u32, new);
        }
        states.push(state.clone());
    }

    let mut unmapped = 0usize;
    let values: Vec<u32> = blocks
        .iter()
        .map(|old| match new_index.get(old as usize).copied().flatten() {
            Some(new) => new,
            None => {
                unmapped += 1;
                0
            }
        })
        .collect();
    if unmapped > 0 {
        tracing::warn!(
            palette = palette.name(),
            count = unmapped,
            "voxels referenced missing palette entries; rewritten to index 0"
        );
    }

    let isolated = Palette::new(synthetic_palette_name(), palette.data_version(), states);
    tracing::trace!(
        from = palette.name(),
        to = isolated.name(),
        before = palette.len(),
        after = isolated.len(),
        "isolated cell palette"
    );

    Isolation {
        cell: Cell::from_isolated(Arc::new(isolated), BitPacker::from_values(&values)),
        remap,
    }
}
