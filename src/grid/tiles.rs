//! Tile data backing grid walkability
//!
//! The terrain collaborator owns what each cell is made of. Navigation only
//! asks it the questions in [`Terrain`]; [`TileMap`] is the stock dense
//! implementation used by the demo and the tests.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::Cell;

/// Closed set of tile kinds the world can be painted with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TileType {
    #[default]
    Grass,
    Sand,
    Dirt,
    Stone,
    Water,
    Wall,
}

impl TileType {
    /// Every tile type, in declaration order
    pub const ALL: [TileType; 6] = [
        TileType::Grass,
        TileType::Sand,
        TileType::Dirt,
        TileType::Stone,
        TileType::Water,
        TileType::Wall,
    ];

    /// Whether agents may stand on this tile
    #[must_use]
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileType::Water | TileType::Wall)
    }

    /// Stable index into [`TileType::ALL`]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TileType::Grass => "grass",
            TileType::Sand => "sand",
            TileType::Dirt => "dirt",
            TileType::Stone => "stone",
            TileType::Water => "water",
            TileType::Wall => "wall",
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Queries navigation makes against the terrain.
///
/// Implementations must treat out-of-range cells as not walkable and
/// must never panic on them.
pub trait Terrain {
    /// Number of cells along each side of the square grid
    fn divisions(&self) -> u32;

    /// Whether an agent may enter the cell
    fn is_walkable(&self, cell: Cell) -> bool;

    /// Tile painted at the cell, `None` outside the grid
    fn tile_type_at(&self, cell: Cell) -> Option<TileType>;

    /// Ground height at the cell centre
    fn height_at(&self, _cell: Cell) -> f32 {
        0.0
    }

    /// Paint a tile. Returns `false` if the cell is outside the grid.
    fn paint(&mut self, cell: Cell, tile: TileType) -> bool;
}

/// Dense square tile storage.
///
/// Deserialized maps are checked so that every stored layer covers exactly
/// `divisions * divisions` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TileMapData")]
pub struct TileMap {
    divisions: u32,
    tiles: Vec<TileType>,
    /// Per-cell ground height; empty means flat ground
    heights: Vec<f32>,
    /// Cells blocked by static obstacles regardless of tile type
    blocked: Vec<bool>,
}

/// Unchecked on-disk form of a [`TileMap`]
#[derive(Deserialize)]
struct TileMapData {
    divisions: u32,
    tiles: Vec<TileType>,
    #[serde(default)]
    heights: Vec<f32>,
    #[serde(default)]
    blocked: Vec<bool>,
}

/// Errors raised when loading a [`TileMap`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileMapError {
    /// A layer does not hold one entry per cell
    WrongLength {
        layer: &'static str,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for TileMapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength {
                layer,
                expected,
                actual,
            } => write!(
                f,
                "tile map layer '{layer}' has {actual} entries, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for TileMapError {}

impl TryFrom<TileMapData> for TileMap {
    type Error = TileMapError;

    fn try_from(data: TileMapData) -> Result<Self, Self::Error> {
        let expected = (data.divisions as usize) * (data.divisions as usize);
        // Heights and blocked flags may be omitted entirely
        let layers = [
            ("tiles", data.tiles.len(), false),
            ("heights", data.heights.len(), true),
            ("blocked", data.blocked.len(), true),
        ];
        for (layer, actual, optional) in layers {
            if actual != expected && !(optional && actual == 0) {
                return Err(TileMapError::WrongLength {
                    layer,
                    expected,
                    actual,
                });
            }
        }

        Ok(Self {
            divisions: data.divisions,
            tiles: data.tiles,
            heights: data.heights,
            blocked: data.blocked,
        })
    }
}

impl TileMap {
    /// Create a map filled with one tile type
    #[must_use]
    pub fn new(divisions: u32, fill: TileType) -> Self {
        let len = (divisions as usize) * (divisions as usize);
        Self {
            divisions,
            tiles: vec![fill; len],
            heights: Vec::new(),
            blocked: vec![false; len],
        }
    }

    /// Create an all-grass map
    #[must_use]
    pub fn open(divisions: u32) -> Self {
        Self::new(divisions, TileType::Grass)
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        let d = self.divisions as i32;
        if cell.x < 0 || cell.z < 0 || cell.x >= d || cell.z >= d {
            return None;
        }
        Some(cell.z as usize * self.divisions as usize + cell.x as usize)
    }

    /// Mark a cell as occupied by a static obstacle
    pub fn set_blocked(&mut self, cell: Cell, blocked: bool) {
        if let Some(i) = self.index(cell) {
            if self.blocked.len() != self.tiles.len() {
                self.blocked.resize(self.tiles.len(), false);
            }
            self.blocked[i] = blocked;
        }
    }

    /// Set the ground height of a cell
    pub fn set_height(&mut self, cell: Cell, height: f32) {
        if let Some(i) = self.index(cell) {
            if self.heights.len() != self.tiles.len() {
                self.heights.resize(self.tiles.len(), 0.0);
            }
            self.heights[i] = height;
        }
    }

    /// Paint every cell of an inclusive rectangle
    pub fn fill_rect(&mut self, min: Cell, max: Cell, tile: TileType) {
        for z in min.z..=max.z {
            for x in min.x..=max.x {
                self.paint(Cell::new(x, z), tile);
            }
        }
    }

    /// Count cells holding a given tile type
    #[must_use]
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }
}

impl Terrain for TileMap {
    fn divisions(&self) -> u32 {
        self.divisions
    }

    fn is_walkable(&self, cell: Cell) -> bool {
        let Some(i) = self.index(cell) else {
            return false;
        };
        let blocked = self.blocked.get(i).copied().unwrap_or(false);
        !blocked && self.tiles[i].is_walkable()
    }

    fn tile_type_at(&self, cell: Cell) -> Option<TileType> {
        self.index(cell).map(|i| self.tiles[i])
    }

    fn height_at(&self, cell: Cell) -> f32 {
        self.index(cell)
            .and_then(|i| self.heights.get(i).copied())
            .unwrap_or(0.0)
    }

    fn paint(&mut self, cell: Cell, tile: TileType) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.tiles[i] = tile;
                true
            }
            None => false,
        }
    }
}

// ============================================================================
// Palette
// ============================================================================

/// Rendering data for one tile type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileStyle {
    /// Linear RGBA base color
    pub color: [f32; 4],
    pub roughness: f32,
}

/// Errors raised when building a palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// No style was supplied for this tile type
    MissingTile(TileType),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTile(tile) => write!(f, "no style for tile type '{tile}'"),
        }
    }
}

impl std::error::Error for PaletteError {}

/// Total mapping from [`TileType`] to [`TileStyle`].
///
/// Completeness is checked once in [`TilePalette::new`], so lookups can
/// never miss.
#[derive(Debug, Clone, PartialEq)]
pub struct TilePalette {
    styles: [TileStyle; TileType::ALL.len()],
}

impl TilePalette {
    /// Build a palette, failing if any tile type has no style.
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::MissingTile`] for the first tile type (in
    /// [`TileType::ALL`] order) that has no entry.
    pub fn new(styles: &FxHashMap<TileType, TileStyle>) -> Result<Self, PaletteError> {
        let mut out = [TileStyle {
            color: [0.0; 4],
            roughness: 0.0,
        }; TileType::ALL.len()];
        for tile in TileType::ALL {
            let style = styles.get(&tile).ok_or(PaletteError::MissingTile(tile))?;
            out[tile.index()] = *style;
        }
        Ok(Self { styles: out })
    }

    /// Style for a tile type
    #[must_use]
    pub fn style(&self, tile: TileType) -> &TileStyle {
        &self.styles[tile.index()]
    }
}

impl Default for TilePalette {
    fn default() -> Self {
        let style = |r: f32, g: f32, b: f32, roughness: f32| TileStyle {
            color: [r, g, b, 1.0],
            roughness,
        };
        Self {
            styles: [
                style(0.30, 0.60, 0.25, 0.9),
                style(0.85, 0.78, 0.55, 0.95),
                style(0.45, 0.32, 0.20, 0.95),
                style(0.50, 0.50, 0.52, 0.7),
                style(0.15, 0.35, 0.70, 0.1),
                style(0.35, 0.30, 0.28, 0.8),
            ],
        }
    }
}
