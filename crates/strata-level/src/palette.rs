//! Ordered, deduplicated lists of block states.
//!
//! Voxels refer to states by their index in a [`Palette`]. Indices are stable
//! once assigned: a palette never reorders or removes entries. Palettes are
//! immutable; [`PaletteBuilder`] assembles them incrementally.

use rustc_hash::FxHashMap;
use strata_bits::bits::width_in_bits;

use crate::block_state::BlockState;

/// Name given to [`Palette::empty`].
pub const EMPTY_PALETTE_NAME: &str = "strata:empty";

/// A named list of block states tied to a data version.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Palette {
    /// Name that cells use to refer to this palette.
    name: String,
    /// Schema epoch the states are valid for.
    data_version: i32,
    states: Vec<BlockState>,
}

impl Palette {
    /// Creates a palette holding `states` in the given order.
    ///
    /// Entries are kept as-is; use [`PaletteBuilder`] to deduplicate.
    pub fn new(name: impl Into<String>, data_version: i32, states: Vec<BlockState>) -> Self {
        Self {
            name: name.into(),
            data_version,
            states,
        }
    }

    /// Starts building a palette that deduplicates on insert.
    pub fn builder(name: impl Into<String>, data_version: i32) -> PaletteBuilder {
        PaletteBuilder::new(name, data_version)
    }

    /// A palette whose only entry is [`BlockState::air`].
    pub fn empty() -> Self {
        Self::new(EMPTY_PALETTE_NAME, 0, vec![BlockState::air()])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_version(&self) -> i32 {
        self.data_version
    }

    /// Returns the state at `index`, or `None` if the index is out of range.
    pub fn get(&self, index: u32) -> Option<&BlockState> {
        self.states.get(index as usize)
    }

    /// Returns the index of the first entry equal to `state`.
    pub fn index_of(&self, state: &BlockState) -> Option<u32> {
        self.states.iter().position(|s| s == state).map(|i| i as u32)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[BlockState] {
        &self.states
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BlockState> {
        self.states.iter()
    }

    /// Minimal bit width able to address every entry: the width of
    /// `len() - 1`, or 0 when the palette has at most one entry.
    pub fn magnitude(&self) -> u32 {
        match self.states.len() {
            0 | 1 => 0,
            n => width_in_bits((n - 1) as u32),
        }
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a BlockState;
    type IntoIter = std::slice::Iter<'a, BlockState>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builds a [`Palette`] one state at a time, never storing a state twice.
#[derive(Debug)]
pub struct PaletteBuilder {
    name: String,
    data_version: i32,
    states: Vec<BlockState>,
    /// Reverse lookup: state → index.
    indices: FxHashMap<BlockState, u32>,
}

impl PaletteBuilder {
    pub fn new(name: impl Into<String>, data_version: i32) -> Self {
        Self {
            name: name.into(),
            data_version,
            states: Vec::new(),
            indices: FxHashMap::default(),
        }
    }

    /// Adds `state` and returns its index. If an equal state is already
    /// present, its existing index is returned and nothing is added.
    pub fn append(&mut self, state: BlockState) -> u32 {
        if let Some(&index) = self.indices.get(&state) {
            return index;
        }
        let index = self.states.len() as u32;
        self.indices.insert(state.clone(), index);
        self.states.push(state);
        index
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn build(self) -> Palette {
        Palette::new(self.name, self.data_version, self.states)
    }
}
