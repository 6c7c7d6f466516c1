//! The navigating agent and its behavioral state

use std::fmt;

use glam::Vec3;

use crate::grid::Cell;

/// Identifier of an external object an agent can act on (a mineable rock,
/// a tree, a workbench).
pub type TargetId = hecs::Entity;

/// What the agent is currently doing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AgentState {
    #[default]
    Idle,
    Walking,
    PerformingAction,
}

impl AgentState {
    /// State name for debugging and logging.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            AgentState::Idle => "Idle",
            AgentState::Walking => "Walking",
            AgentState::PerformingAction => "PerformingAction",
        }
    }
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The single entity driven by the navigation core.
///
/// Only the core mutates an agent; everything else reads a snapshot.
#[derive(Debug, Clone)]
pub struct Agent {
    /// World-space position
    pub position: Vec3,
    /// Cells of the active route, start inclusive
    pub current_path: Vec<Cell>,
    /// World-space centres of `current_path`
    pub waypoints: Vec<Vec3>,
    /// Index of the next waypoint to reach
    pub path_cursor: usize,
    pub state: AgentState,
    /// Object the agent will act on once it arrives
    pub action_target: Option<TargetId>,
    /// Seconds spent in `PerformingAction`
    pub action_timer: f32,
}

impl Agent {
    /// Create an idle agent at a position
    #[must_use]
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            current_path: Vec::new(),
            waypoints: Vec::new(),
            path_cursor: 0,
            state: AgentState::Idle,
            action_target: None,
            action_timer: 0.0,
        }
    }

    /// Replace the route wholesale and rewind the cursor
    pub fn set_route(&mut self, cells: Vec<Cell>, waypoints: Vec<Vec3>) {
        debug_assert_eq!(cells.len(), waypoints.len());
        self.current_path = cells;
        self.waypoints = waypoints;
        self.path_cursor = 0;
    }

    /// Drop the route
    pub fn clear_route(&mut self) {
        self.current_path.clear();
        self.waypoints.clear();
        self.path_cursor = 0;
    }

    /// Whether waypoints remain ahead of the cursor
    #[must_use]
    pub fn has_route(&self) -> bool {
        self.path_cursor < self.waypoints.len()
    }

    /// Waypoints not yet reached
    #[must_use]
    pub fn remaining_waypoints(&self) -> &[Vec3] {
        self.waypoints.get(self.path_cursor..).unwrap_or(&[])
    }

    /// Final cell of the route, if any
    #[must_use]
    pub fn destination(&self) -> Option<Cell> {
        self.current_path.last().copied()
    }
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_agent_is_idle() {
        let agent = Agent::new(Vec3::new(1.0, 0.0, 2.0));

        assert_eq!(agent.state, AgentState::Idle);
        assert!(!agent.has_route());
        assert!(agent.action_target.is_none());
        assert!(agent.remaining_waypoints().is_empty());
    }

    #[test]
    fn test_set_route_rewinds_cursor() {
        let mut agent = Agent::default();
        agent.set_route(vec![Cell::new(0, 0), Cell::new(1, 0)], vec![Vec3::ZERO, Vec3::X]);
        agent.path_cursor = 2;
        assert!(!agent.has_route());

        agent.set_route(vec![Cell::new(5, 5)], vec![Vec3::Z]);
        assert_eq!(agent.path_cursor, 0);
        assert_eq!(agent.remaining_waypoints(), &[Vec3::Z]);
        assert_eq!(agent.destination(), Some(Cell::new(5, 5)));
    }
}
