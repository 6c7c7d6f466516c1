//! Components for objects the agent can interact with

use glam::Vec3;

/// Marks an entity as something an agent can walk up to and act on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionSite {
    /// World-space position of the object
    pub position: Vec3,
}

impl ActionSite {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Name component for debugging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}
