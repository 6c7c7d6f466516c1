//! AI and navigation module
//!
//! Provides pathfinding, waypoint motion, and the agent behavior state machine.

mod agent;
mod fsm;
mod motion;
mod pathfinding;

pub use agent::{Agent, AgentState, TargetId};
pub use fsm::{ActionEffect, AgentStateMachine, StateInput, StepOutcome};
pub use motion::{MotionController, MotionStatus};
pub use pathfinding::{Connectivity, Path, PathFinder};
