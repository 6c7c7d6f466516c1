//! Read-only views of the agent for renderers and UI

use glam::Vec3;

use crate::ai::{AgentState, TargetId};
use crate::grid::Cell;

/// Height of the destination marker above the ground
const MARKER_LIFT: f32 = 0.05;

/// Copy of the agent's observable state, taken once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSnapshot {
    pub position: Vec3,
    pub state: AgentState,
    /// Cells of the active route, start inclusive; empty when not walking
    pub path: Vec<Cell>,
    /// Waypoints still ahead of the agent
    pub remaining_waypoints: Vec<Vec3>,
    pub action_target: Option<TargetId>,
    /// Fraction of the current action completed, in `[0, 1]`
    pub action_progress: f32,
}

impl AgentSnapshot {
    /// Final cell of the active route
    #[must_use]
    pub fn destination(&self) -> Option<Cell> {
        self.path.last().copied()
    }

    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.state == AgentState::Walking
    }
}

/// Destination marker and route polyline derived from a snapshot.
///
/// Recomputed whenever the route changes; never fed back into navigation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathVisual {
    /// Where to draw the destination marker
    pub marker: Option<Vec3>,
    /// Polyline from the agent through every remaining waypoint
    pub line: Vec<Vec3>,
}

impl PathVisual {
    #[must_use]
    pub fn from_snapshot(snapshot: &AgentSnapshot) -> Self {
        let Some(&last) = snapshot.remaining_waypoints.last() else {
            return Self::default();
        };

        let mut line = Vec::with_capacity(snapshot.remaining_waypoints.len() + 1);
        line.push(snapshot.position);
        line.extend_from_slice(&snapshot.remaining_waypoints);

        Self {
            marker: Some(last + Vec3::Y * MARKER_LIFT),
            line,
        }
    }

    /// Total length of the polyline
    #[must_use]
    pub fn length(&self) -> f32 {
        self.line.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}
