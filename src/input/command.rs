//! Queued navigation commands
//!
//! Platform input arrives whenever the platform delivers it. Commands are
//! queued here and applied in order at the start of the next frame update,
//! so a frame never observes a half-replaced route.

use std::collections::VecDeque;

use glam::Vec3;

use crate::ai::TargetId;

/// A request from the input or gameplay layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavCommand {
    /// Pointer tap projected to the ground; `None` when the raycast missed
    Tap(Option<Vec3>),
    /// Walk to a world position, ignoring build mode
    MoveTo(Vec3),
    /// Walk up to a target and act on it
    Action(TargetId),
    /// Stop whatever the agent is doing
    Cancel,
}

impl NavCommand {
    /// Command name for debugging/logging.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            NavCommand::Tap(_) => "Tap",
            NavCommand::MoveTo(_) => "MoveTo",
            NavCommand::Action(_) => "Action",
            NavCommand::Cancel => "Cancel",
        }
    }
}

/// FIFO of commands awaiting the next frame.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<NavCommand>,
}

impl CommandQueue {
    /// Default initial capacity for the queue.
    const DEFAULT_CAPACITY: usize = 16;

    #[must_use]
    pub fn new() -> Self {
        Self {
            pending: VecDeque::with_capacity(Self::DEFAULT_CAPACITY),
        }
    }

    /// Queue a command for the next update
    #[inline]
    pub fn push(&mut self, command: NavCommand) {
        self.pending.push_back(command);
    }

    /// Take every queued command in arrival order
    pub fn drain(&mut self) -> impl Iterator<Item = NavCommand> + '_ {
        self.pending.drain(..)
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
