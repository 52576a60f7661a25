//! Palette-indexed voxel model: block states, palettes, 16³ cells, palette
//! isolation, and the level container that places cells in a world.

pub mod block_state;
pub mod cell;
mod error;
pub mod isolate;
pub mod level;
pub mod palette;

pub use block_state::{AIR, BlockState};
pub use cell::{CELL_SIZE, CELL_VOLUME, Cell, voxel_index};
pub use error::LevelError;
pub use isolate::{IndexRemap, Isolation, apply_remap, synthetic_palette_name, used_indices};
pub use level::{CellCoord, Level};
pub use palette::{Palette, PaletteBuilder};
