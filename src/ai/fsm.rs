//! Agent behavior state machine
//!
//! Owns the transition rules between [`AgentState`]s. The machine itself is
//! stateless apart from configuration: the current state lives on the
//! [`Agent`], and every change goes through [`AgentStateMachine::handle`]
//! so transitions are logged and reported in one place.
//!
//! ```text
//! Idle ──Walk──> Walking ──Arrived(no target)──> Idle
//!                   │
//!                   └──Arrived(target)──> PerformingAction ──Tick(timer ≥ duration)──> Idle
//!
//! any ──Cancel / TargetLost──> Idle
//! ```

use crate::ai::{Agent, AgentState, TargetId};

/// Timer slack so that accumulated frame deltas landing a hair under the
/// duration still complete on that tick.
const ACTION_TIME_EPSILON: f32 = 1e-4;

/// Inputs that drive the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateInput {
    /// A non-empty route was installed on the agent
    Walk,
    /// Motion reached the end of the route
    Arrived {
        /// Whether the pending action target still exists
        target_valid: bool,
    },
    /// Frame tick while performing an action
    Tick(f32),
    /// The pending or active action target disappeared
    TargetLost,
    /// Explicit cancel, or a command that supersedes everything
    Cancel,
}

/// Side effect of a transition on the agent's action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    Started(TargetId),
    Completed(TargetId),
    Cancelled(TargetId),
}

/// Result of feeding one input to the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub from: AgentState,
    pub to: AgentState,
    pub effect: Option<ActionEffect>,
}

impl StepOutcome {
    /// Whether the state changed
    #[must_use]
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// Transition rules for the agent.
#[derive(Debug, Clone, Copy)]
pub struct AgentStateMachine {
    /// Seconds an action takes once started
    pub action_duration: f32,
}

impl AgentStateMachine {
    #[must_use]
    pub fn new(action_duration: f32) -> Self {
        Self { action_duration }
    }

    /// Apply an input to the agent and report what happened.
    pub fn handle(&self, agent: &mut Agent, input: StateInput) -> StepOutcome {
        let from = agent.state;
        let effect = match input {
            StateInput::Walk => {
                agent.action_timer = 0.0;
                agent.state = if agent.has_route() {
                    AgentState::Walking
                } else {
                    AgentState::Idle
                };
                None
            }

            StateInput::Arrived { target_valid } => {
                agent.clear_route();
                agent.action_timer = 0.0;
                match agent.action_target {
                    Some(target) if target_valid => {
                        agent.state = AgentState::PerformingAction;
                        Some(ActionEffect::Started(target))
                    }
                    Some(_) => {
                        agent.state = AgentState::Idle;
                        agent.action_target.take().map(ActionEffect::Cancelled)
                    }
                    None => {
                        agent.state = AgentState::Idle;
                        None
                    }
                }
            }

            StateInput::Tick(delta_time) => {
                if agent.state != AgentState::PerformingAction {
                    None
                } else {
                    agent.action_timer += delta_time.max(0.0);
                    if agent.action_timer + ACTION_TIME_EPSILON >= self.action_duration {
                        agent.state = AgentState::Idle;
                        agent.action_timer = 0.0;
                        agent.action_target.take().map(ActionEffect::Completed)
                    } else {
                        None
                    }
                }
            }

            StateInput::TargetLost | StateInput::Cancel => {
                agent.clear_route();
                agent.action_timer = 0.0;
                agent.state = AgentState::Idle;
                agent.action_target.take().map(ActionEffect::Cancelled)
            }
        };

        let outcome = StepOutcome {
            from,
            to: agent.state,
            effect,
        };
        if outcome.changed() {
            log::debug!("Agent {} -> {} on {:?}", from, agent.state, input);
        }
        outcome
    }

    /// Fraction of the current action completed, in `[0, 1]`
    #[must_use]
    pub fn progress(&self, agent: &Agent) -> f32 {
        if agent.state != AgentState::PerformingAction {
            return 0.0;
        }
        if self.action_duration <= 0.0 {
            return 1.0;
        }
        (agent.action_timer / self.action_duration).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use glam::Vec3;

    fn target() -> TargetId {
        let mut world = hecs::World::new();
        world.spawn(())
    }

    fn walking_agent() -> Agent {
        let mut agent = Agent::default();
        agent.set_route(vec![Cell::new(0, 0), Cell::new(1, 0)], vec![Vec3::ZERO, Vec3::X]);
        agent
    }

    #[test]
    fn test_walk_requires_route() {
        let fsm = AgentStateMachine::new(4.0);
        let mut agent = Agent::default();

        let outcome = fsm.handle(&mut agent, StateInput::Walk);
        assert!(!outcome.changed());
        assert_eq!(agent.state, AgentState::Idle);

        let mut agent = walking_agent();
        let outcome = fsm.handle(&mut agent, StateInput::Walk);
        assert_eq!(outcome.to, AgentState::Walking);
    }

    #[test]
    fn test_arrival_without_target_goes_idle() {
        let fsm = AgentStateMachine::new(4.0);
        let mut agent = walking_agent();
        fsm.handle(&mut agent, StateInput::Walk);

        let outcome = fsm.handle(&mut agent, StateInput::Arrived { target_valid: false });

        assert_eq!(outcome.to, AgentState::Idle);
        assert_eq!(outcome.effect, None);
        assert!(agent.current_path.is_empty());
    }

    #[test]
    fn test_arrival_with_target_starts_action() {
        let fsm = AgentStateMachine::new(4.0);
        let rock = target();
        let mut agent = walking_agent();
        agent.action_target = Some(rock);
        fsm.handle(&mut agent, StateInput::Walk);

        let outcome = fsm.handle(&mut agent, StateInput::Arrived { target_valid: true });

        assert_eq!(outcome.to, AgentState::PerformingAction);
        assert_eq!(outcome.effect, Some(ActionEffect::Started(rock)));
        assert_eq!(agent.action_timer, 0.0);
    }

    #[test]
    fn test_arrival_with_vanished_target_cancels() {
        let fsm = AgentStateMachine::new(4.0);
        let rock = target();
        let mut agent = walking_agent();
        agent.action_target = Some(rock);
        fsm.handle(&mut agent, StateInput::Walk);

        let outcome = fsm.handle(&mut agent, StateInput::Arrived { target_valid: false });

        assert_eq!(outcome.to, AgentState::Idle);
        assert_eq!(outcome.effect, Some(ActionEffect::Cancelled(rock)));
        assert!(agent.action_target.is_none());
    }

    #[test]
    fn test_action_completes_once_after_duration() {
        let fsm = AgentStateMachine::new(4.0);
        let rock = target();
        let mut agent = Agent::default();
        agent.action_target = Some(rock);
        fsm.handle(&mut agent, StateInput::Arrived { target_valid: true });

        let mut completions = 0;
        for _ in 0..3 {
            let outcome = fsm.handle(&mut agent, StateInput::Tick(1.3));
            if let Some(ActionEffect::Completed(_)) = outcome.effect {
                completions += 1;
            }
        }
        // 3.9s elapsed
        assert_eq!(agent.state, AgentState::PerformingAction);
        assert_eq!(completions, 0);
        assert!((fsm.progress(&agent) - 0.975).abs() < 1e-3);

        let outcome = fsm.handle(&mut agent, StateInput::Tick(0.1));
        assert_eq!(outcome.effect, Some(ActionEffect::Completed(rock)));
        assert_eq!(agent.state, AgentState::Idle);
        assert!(agent.action_target.is_none());

        // Further ticks never fire again
        let outcome = fsm.handle(&mut agent, StateInput::Tick(5.0));
        assert_eq!(outcome.effect, None);
    }

    #[test]
    fn test_cancel_from_any_state() {
        let fsm = AgentStateMachine::new(4.0);
        let rock = target();

        let mut agent = walking_agent();
        agent.action_target = Some(rock);
        fsm.handle(&mut agent, StateInput::Walk);
        let outcome = fsm.handle(&mut agent, StateInput::Cancel);
        assert_eq!(outcome.to, AgentState::Idle);
        assert_eq!(outcome.effect, Some(ActionEffect::Cancelled(rock)));
        assert!(!agent.has_route());

        let mut agent = Agent::default();
        agent.action_target = Some(rock);
        fsm.handle(&mut agent, StateInput::Arrived { target_valid: true });
        fsm.handle(&mut agent, StateInput::Tick(1.0));
        fsm.handle(&mut agent, StateInput::Cancel);
        assert_eq!(agent.state, AgentState::Idle);
        assert_eq!(agent.action_timer, 0.0);

        let mut agent = Agent::default();
        let outcome = fsm.handle(&mut agent, StateInput::Cancel);
        assert_eq!(outcome.effect, None);
    }

    #[test]
    fn test_tick_ignored_outside_action() {
        let fsm = AgentStateMachine::new(1.0);
        let mut agent = walking_agent();
        fsm.handle(&mut agent, StateInput::Walk);

        fsm.handle(&mut agent, StateInput::Tick(5.0));
        assert_eq!(agent.state, AgentState::Walking);
        assert_eq!(agent.action_timer, 0.0);
    }
}
