//! Entity Component System module
//!
//! Built on top of the hecs ECS library. Holds the gameplay objects that
//! agents can be sent to act on.

mod components;
mod world;

pub use components::{ActionSite, Name};
pub use world::{TargetLookup, World};
