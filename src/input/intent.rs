//! Pointer input classification
//!
//! Turns a tap that the rendering layer has already projected onto the
//! ground into either a move or a paint intent.

use glam::Vec3;

use crate::grid::{Cell, GridIndex, Terrain, TileType};

/// What a tap asks the world to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Walk the agent to this cell
    MoveTo(Cell),
    /// Paint this cell with a tile type
    PaintAt(Cell, TileType),
}

/// Build-mode toggle owned by the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildMode {
    pub active: bool,
    /// Tile painted while active
    pub tile: TileType,
}

impl BuildMode {
    /// Build mode switched on with a tile selected
    #[must_use]
    pub fn painting(tile: TileType) -> Self {
        Self { active: true, tile }
    }

    /// Build mode switched off
    #[must_use]
    pub fn off() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.active = !self.active;
    }
}

/// Source of the current build mode, read on every tap.
pub trait BuildModeSource {
    fn build_mode(&self) -> BuildMode;
}

impl BuildModeSource for BuildMode {
    fn build_mode(&self) -> BuildMode {
        *self
    }
}

/// Classifies ground taps into intents.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentResolver;

impl IntentResolver {
    /// Resolve a tap.
    ///
    /// `point` is `None` when the ground raycast missed. Misses and points
    /// off the grid produce no intent. In build mode the result is always a
    /// paint intent; movement is never issued.
    #[must_use]
    pub fn resolve<T: Terrain>(
        &self,
        grid: &GridIndex<T>,
        point: Option<Vec3>,
        mode: &impl BuildModeSource,
    ) -> Option<Intent> {
        let point = point?;
        if !grid.contains_point(point) {
            log::trace!("Tap at {point} is off the grid");
            return None;
        }

        let cell = grid.world_to_cell(point);
        let mode = mode.build_mode();
        if mode.active {
            Some(Intent::PaintAt(cell, mode.tile))
        } else {
            Some(Intent::MoveTo(cell))
        }
    }
}
