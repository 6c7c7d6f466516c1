//! Navigation grid module
//!
//! Cell coordinates, world/cell mapping, and the terrain tile data that
//! decides walkability.

mod cell;
mod index;
mod tiles;

pub use cell::Cell;
pub use index::GridIndex;
pub use tiles::{
    PaletteError, Terrain, TileMap, TileMapError, TilePalette, TileStyle, TileType,
};
