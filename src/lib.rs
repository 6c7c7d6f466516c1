//! Tap-to-move grid navigation for a single agent
//!
//! This crate provides:
//! - World/cell mapping over a square terrain grid
//! - A* pathfinding with 4- or 8-connected moves
//! - Constant-speed waypoint motion and an agent behavior state machine
//! - Tap classification into move and paint intents

pub mod ai;
pub mod core;
pub mod ecs;
pub mod grid;
pub mod input;

// Re-exports for convenience
pub use glam;
pub use hecs;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::ai::{Agent, AgentState, Connectivity, Path, PathFinder, TargetId};
    pub use crate::core::{
        AgentSnapshot, MoveOutcome, NavConfig, NavError, NavEvent, NavigationCore, PathVisual,
    };
    pub use crate::ecs::{ActionSite, TargetLookup, World};
    pub use crate::grid::{Cell, GridIndex, Terrain, TileMap, TileType};
    pub use crate::input::{BuildMode, Intent, NavCommand};
    pub use glam::Vec3;
}
