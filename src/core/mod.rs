//! Core navigation module
//!
//! Contains the `NavigationCore` that ties grid, search, motion, and agent
//! state together, plus its configuration, events, and snapshots.

mod config;
mod events;
mod navigation;
mod snapshot;

pub use config::{ConfigError, NavConfig};
pub use events::{EventQueue, NavEvent};
pub use navigation::{MoveOutcome, NavError, NavigationCore};
pub use snapshot::{AgentSnapshot, PathVisual};
