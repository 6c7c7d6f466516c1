//! Constant-speed waypoint following

use crate::ai::Agent;

/// Outcome of one motion tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionStatus {
    /// No route to follow
    Stopped,
    /// Still travelling
    Moving,
    /// The last waypoint was reached during this tick
    Arrived,
}

/// Moves an agent along its waypoints at a fixed speed.
///
/// There is no acceleration curve: every leg is travelled at `speed`.
/// Distance left over after reaching a waypoint carries into the next leg
/// within the same tick, so arrival time depends only on route length.
#[derive(Debug, Clone, Copy)]
pub struct MotionController {
    /// World units per second
    pub speed: f32,
    /// Distance under which a waypoint counts as reached
    pub arrival_epsilon: f32,
}

impl MotionController {
    #[must_use]
    pub fn new(speed: f32, arrival_epsilon: f32) -> Self {
        Self {
            speed,
            arrival_epsilon,
        }
    }

    /// Advance the agent by `delta_time` seconds.
    ///
    /// Never overshoots a waypoint: when the step would pass it, the agent
    /// lands exactly on it.
    pub fn update(&self, agent: &mut Agent, delta_time: f32) -> MotionStatus {
        if !agent.has_route() {
            return MotionStatus::Stopped;
        }

        let mut budget = (self.speed * delta_time).max(0.0);

        while let Some(&target) = agent.waypoints.get(agent.path_cursor) {
            let to_target = target - agent.position;
            let distance = to_target.length();

            if distance <= self.arrival_epsilon || budget >= distance {
                agent.position = target;
                budget = (budget - distance).max(0.0);
                agent.path_cursor += 1;
                continue;
            }

            agent.position += to_target * (budget / distance);
            return MotionStatus::Moving;
        }

        MotionStatus::Arrived
    }
}
