//! Navigation event queue
//!
//! The core never calls back into gameplay, UI, or rendering code. Anything
//! they need to react to (a finished action, an unreachable tap, a painted
//! tile) is pushed here and read after the frame update.
//!
//! The queue is double buffered: events pushed while frame N is being built
//! become visible when the frame ends with [`EventQueue::swap`], and stay
//! readable until the next swap.
//!
//! ```ignore
//! core.update(dt, &world);
//! for event in core.events().iter() {
//!     if let NavEvent::ActionCompleted { target } = event {
//!         inventory.add_ore(*target);
//!     }
//! }
//! ```

use std::collections::VecDeque;

use crate::ai::{AgentState, TargetId};
use crate::grid::{Cell, TileType};

// ============================================================================
// Event Types
// ============================================================================

/// Things that happened to the agent or the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum NavEvent {
    // -------------------------------------------------------------------------
    // Movement
    // -------------------------------------------------------------------------
    /// A move command produced a route.
    PathFound {
        /// Destination cell
        goal: Cell,
        /// Moves between start and goal
        steps: usize,
    },

    /// A move command's goal could not be reached.
    PathNotFound {
        /// Requested destination
        goal: Cell,
    },

    /// The agent reached the end of its route.
    Arrived {
        /// Cell the agent stopped on
        cell: Cell,
    },

    // -------------------------------------------------------------------------
    // Actions
    // -------------------------------------------------------------------------
    /// The agent arrived next to its target and began acting on it.
    ActionStarted {
        target: TargetId,
    },

    /// The action timer ran out. Pushed exactly once per action.
    ActionCompleted {
        target: TargetId,
    },

    /// The action was abandoned before completing.
    ActionCancelled {
        target: TargetId,
    },

    // -------------------------------------------------------------------------
    // World
    // -------------------------------------------------------------------------
    /// A build-mode tap repainted a cell.
    TilePainted {
        cell: Cell,
        tile: TileType,
    },

    /// The agent's behavioral state changed.
    StateChanged {
        from: AgentState,
        to: AgentState,
    },
}

// ============================================================================
// Event Queue
// ============================================================================

/// Double-buffered event queue for frame-consistent event processing.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this frame
    pending: VecDeque<NavEvent>,
    /// Events from the last finished frame, ready for reading
    processing: VecDeque<NavEvent>,
}

impl EventQueue {
    /// Default initial capacity for event queues.
    const DEFAULT_CAPACITY: usize = 32;

    /// Create a new event queue with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a new event queue with specified initial capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event; it becomes readable after the next `swap()`.
    #[inline]
    pub fn push(&mut self, event: NavEvent) {
        self.pending.push_back(event);
    }

    /// Publish pending events and discard the previously readable ones.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over events from the last finished frame.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &NavEvent> {
        self.processing.iter()
    }

    /// Take ownership of the readable events.
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = NavEvent> + '_ {
        self.processing.drain(..)
    }

    /// Check if there are any events to read.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Get the number of events ready for reading.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Get the number of events waiting for the next swap.
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear all events (both pending and readable).
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
