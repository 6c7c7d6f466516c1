//! The navigation core
//!
//! [`NavigationCore`] owns the grid, the agent, and every rule that moves
//! it. It is constructed once per world and driven by one
//! [`NavigationCore::update`] call per frame. Collaborators talk to it only
//! through commands (in) and snapshots and events (out); it holds no
//! reference to cameras, meshes, or UI.
//!
//! # Frame order
//!
//! 1. Queued commands are applied in arrival order
//! 2. The action target is re-validated
//! 3. Motion advances the agent and the state machine reacts
//! 4. Events produced since the last frame become readable

use std::fmt;

use glam::Vec3;

use crate::ai::{
    ActionEffect, Agent, AgentState, AgentStateMachine, MotionController, MotionStatus, Path,
    PathFinder, StateInput, StepOutcome, TargetId,
};
use crate::core::{AgentSnapshot, ConfigError, EventQueue, NavConfig, NavEvent, PathVisual};
use crate::ecs::TargetLookup;
use crate::grid::{Cell, GridIndex, Terrain, TileType};
use crate::input::{BuildMode, CommandQueue, Intent, IntentResolver, NavCommand};

/// Result of a movement or action command.
///
/// None of these are failures of the core; an unreachable goal is an
/// ordinary outcome the caller may surface to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A route was installed and the agent is walking
    Started {
        /// Moves between the agent's cell and the goal
        steps: usize,
    },
    /// The agent already stands at the goal
    AlreadyThere,
    /// No route exists; the agent is now idle
    Unreachable,
    /// The command did not apply (off-grid point, unknown target)
    Ignored,
}

impl MoveOutcome {
    /// Whether the command failed to find a route
    #[must_use]
    pub fn is_unreachable(self) -> bool {
        self == MoveOutcome::Unreachable
    }
}

/// Errors raised while constructing a [`NavigationCore`]
#[derive(Debug, Clone, PartialEq)]
pub enum NavError {
    /// The configuration is invalid
    Config(ConfigError),
    /// The terrain's size disagrees with the configured divisions
    GridMismatch { expected: u32, actual: u32 },
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "{e}"),
            Self::GridMismatch { expected, actual } => write!(
                f,
                "terrain has {actual} divisions but config expects {expected}"
            ),
        }
    }
}

impl std::error::Error for NavError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::GridMismatch { .. } => None,
        }
    }
}

impl From<ConfigError> for NavError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Single-agent grid navigation.
pub struct NavigationCore<T: Terrain> {
    config: NavConfig,
    grid: GridIndex<T>,
    finder: PathFinder,
    motion: MotionController,
    fsm: AgentStateMachine,
    resolver: IntentResolver,
    agent: Agent,
    build_mode: BuildMode,
    commands: CommandQueue,
    events: EventQueue,
}

impl<T: Terrain> NavigationCore<T> {
    /// Create a core over `terrain` with an idle agent at `spawn`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid or the terrain size does
    /// not match `config.divisions`.
    pub fn new(config: NavConfig, terrain: T, spawn: Vec3) -> Result<Self, NavError> {
        config.validate()?;
        if terrain.divisions() != config.divisions {
            return Err(NavError::GridMismatch {
                expected: config.divisions,
                actual: terrain.divisions(),
            });
        }

        log::info!(
            "Navigation grid {}x{} over {} units, agent speed {}",
            config.divisions,
            config.divisions,
            config.grid_size,
            config.agent_speed
        );

        Ok(Self {
            grid: GridIndex::new(config.grid_size, terrain),
            finder: PathFinder::new(config.connectivity),
            motion: MotionController::new(config.agent_speed, config.arrival_epsilon),
            fsm: AgentStateMachine::new(config.action_duration),
            resolver: IntentResolver,
            agent: Agent::new(spawn),
            build_mode: BuildMode::off(),
            commands: CommandQueue::new(),
            events: EventQueue::new(),
            config,
        })
    }

    /// Create a core with the agent standing on the centre of `cell`
    ///
    /// # Errors
    ///
    /// See [`NavigationCore::new`].
    pub fn spawn_at_cell(config: NavConfig, terrain: T, cell: Cell) -> Result<Self, NavError> {
        let mut core = Self::new(config, terrain, Vec3::ZERO)?;
        core.agent.position = core.grid.cell_center_world(cell);
        Ok(core)
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &GridIndex<T> {
        &self.grid
    }

    #[must_use]
    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Cell the agent currently stands in
    #[must_use]
    pub fn agent_cell(&self) -> Cell {
        self.grid.world_to_cell(self.agent.position)
    }

    #[must_use]
    pub fn build_mode(&self) -> BuildMode {
        self.build_mode
    }

    /// Set the build mode; called by the UI when the toggle changes
    pub fn set_build_mode(&mut self, mode: BuildMode) {
        if mode != self.build_mode {
            log::debug!("Build mode {:?}", mode);
        }
        self.build_mode = mode;
    }

    /// Events from the last finished frame
    #[must_use]
    pub fn events(&self) -> &EventQueue {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventQueue {
        &mut self.events
    }

    /// Copy of the agent state for rendering
    #[must_use]
    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            position: self.agent.position,
            state: self.agent.state,
            path: self.agent.current_path.clone(),
            remaining_waypoints: self.agent.remaining_waypoints().to_vec(),
            action_target: self.agent.action_target,
            action_progress: self.fsm.progress(&self.agent),
        }
    }

    /// Destination marker and route line for the current snapshot
    #[must_use]
    pub fn path_visual(&self) -> PathVisual {
        PathVisual::from_snapshot(&self.snapshot())
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Queue a command for the start of the next update
    pub fn queue(&mut self, command: NavCommand) {
        self.commands.push(command);
    }

    /// Number of commands waiting for the next update
    #[must_use]
    pub fn queued_commands(&self) -> usize {
        self.commands.len()
    }

    /// Interpret a ground tap under the current build mode and act on it.
    ///
    /// Returns the intent that was carried out, or `None` for a miss.
    pub fn issue_tap(&mut self, point: Option<Vec3>) -> Option<Intent> {
        let intent = self.resolver.resolve(&self.grid, point, &self.build_mode)?;
        match intent {
            Intent::MoveTo(cell) => {
                self.move_to_cell(cell);
            }
            Intent::PaintAt(cell, tile) => {
                self.paint(cell, tile);
            }
        }
        Some(intent)
    }

    /// Walk to the cell containing a world point.
    ///
    /// Replaces any current route and drops any pending action.
    pub fn issue_move_command(&mut self, point: Vec3) -> MoveOutcome {
        if !self.grid.contains_point(point) {
            log::debug!("Ignoring move to off-grid point {point}");
            return MoveOutcome::Ignored;
        }
        let cell = self.grid.world_to_cell(point);
        self.move_to_cell(cell)
    }

    /// Walk to a cell, replacing any current route and action
    pub fn move_to_cell(&mut self, goal: Cell) -> MoveOutcome {
        self.drop_action();
        self.start_route(goal)
    }

    /// Walk next to a target and act on it once there.
    ///
    /// The agent heads for the walkable orthogonal neighbour of the
    /// target's cell with the cheapest route.
    pub fn issue_action_command(
        &mut self,
        target: TargetId,
        targets: &impl TargetLookup,
    ) -> MoveOutcome {
        let Some(position) = targets.target_position(target) else {
            log::warn!("Action target {target:?} does not exist");
            return MoveOutcome::Ignored;
        };
        if !self.grid.contains_point(position) {
            log::warn!("Action target {target:?} at {position} is off the grid");
            return MoveOutcome::Ignored;
        }

        self.drop_action();

        let target_cell = self.grid.world_to_cell(position);
        let Some(path) = self.stand_off_path(target_cell) else {
            log::warn!("No reachable stand-off cell around {target_cell}");
            self.events.push(NavEvent::PathNotFound { goal: target_cell });
            self.apply(StateInput::Cancel);
            return MoveOutcome::Unreachable;
        };

        log::info!("Action on {target:?} at {target_cell}");
        self.agent.action_target = Some(target);
        self.install_route(path)
    }

    /// Stop, dropping the route and any action
    pub fn cancel_command(&mut self) {
        log::info!("Cancel");
        self.apply(StateInput::Cancel);
    }

    /// Paint a tile and re-plan if the agent's route just got blocked.
    ///
    /// Returns `false` if the cell is outside the grid.
    pub fn paint(&mut self, cell: Cell, tile: TileType) -> bool {
        if !self.grid.terrain_mut().paint(cell, tile) {
            return false;
        }
        self.events.push(NavEvent::TilePainted { cell, tile });

        let blocks_route = !self.grid.is_walkable(cell)
            && self
                .agent
                .current_path
                .get(self.agent.path_cursor..)
                .is_some_and(|ahead| ahead.contains(&cell));

        if blocks_route && let Some(goal) = self.agent.destination() {
            log::info!("Route blocked at {cell}, re-planning to {goal}");
            self.start_route(goal);
        }
        true
    }

    // ------------------------------------------------------------------------
    // Frame update
    // ------------------------------------------------------------------------

    /// Advance one frame.
    pub fn update(&mut self, delta_time: f32, targets: &impl TargetLookup) {
        let commands: Vec<NavCommand> = self.commands.drain().collect();
        for command in commands {
            self.apply_command(command, targets);
        }

        if let Some(target) = self.agent.action_target
            && self.agent.state != AgentState::Idle
            && targets.target_position(target).is_none()
        {
            log::warn!("Action target {target:?} vanished");
            self.apply(StateInput::TargetLost);
        }

        match self.agent.state {
            AgentState::Walking => {
                let status = self.motion.update(&mut self.agent, delta_time);
                if status != MotionStatus::Moving {
                    let cell = self.agent_cell();
                    self.events.push(NavEvent::Arrived { cell });
                    let target_valid = self
                        .agent
                        .action_target
                        .is_some_and(|t| targets.target_position(t).is_some());
                    self.apply(StateInput::Arrived { target_valid });
                }
            }
            AgentState::PerformingAction => {
                self.apply(StateInput::Tick(delta_time));
            }
            AgentState::Idle => {}
        }

        self.events.swap();
    }

    fn apply_command(&mut self, command: NavCommand, targets: &impl TargetLookup) {
        log::trace!("Applying {}", command.name());
        match command {
            NavCommand::Tap(point) => {
                self.issue_tap(point);
            }
            NavCommand::MoveTo(point) => {
                self.issue_move_command(point);
            }
            NavCommand::Action(target) => {
                self.issue_action_command(target, targets);
            }
            NavCommand::Cancel => self.cancel_command(),
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// Feed the state machine and publish what changed
    fn apply(&mut self, input: StateInput) -> StepOutcome {
        let outcome = self.fsm.handle(&mut self.agent, input);

        if outcome.changed() {
            self.events.push(NavEvent::StateChanged {
                from: outcome.from,
                to: outcome.to,
            });
        }

        match outcome.effect {
            Some(ActionEffect::Started(target)) => {
                self.events.push(NavEvent::ActionStarted { target });
            }
            Some(ActionEffect::Completed(target)) => {
                log::info!("Action on {target:?} complete");
                self.events.push(NavEvent::ActionCompleted { target });
            }
            Some(ActionEffect::Cancelled(target)) => {
                log::info!("Action on {target:?} cancelled");
                self.events.push(NavEvent::ActionCancelled { target });
            }
            None => {}
        }

        outcome
    }

    /// Abandon a pending or running action without touching the route
    fn drop_action(&mut self) {
        if let Some(target) = self.agent.action_target.take() {
            log::info!("Action on {target:?} cancelled");
            self.events.push(NavEvent::ActionCancelled { target });
        }
        self.agent.action_timer = 0.0;
    }

    /// Plan from the agent's cell to `goal` and install the result
    fn start_route(&mut self, goal: Cell) -> MoveOutcome {
        let path = self.finder.find_path(&self.grid, self.agent_cell(), goal);
        if path.is_empty() {
            log::warn!("No path to {goal}");
            self.events.push(NavEvent::PathNotFound { goal });
            self.apply(StateInput::Cancel);
            return MoveOutcome::Unreachable;
        }
        self.install_route(path)
    }

    /// Replace the agent's route with `path`
    fn install_route(&mut self, path: Path) -> MoveOutcome {
        let steps = path.steps();
        let goal = path.goal();
        let cells = path.into_cells();
        let waypoints: Vec<Vec3> = cells
            .iter()
            .map(|&cell| self.grid.cell_center_world(cell))
            .collect();

        let at_goal = steps == 0
            && waypoints
                .first()
                .is_some_and(|w| w.distance(self.agent.position) <= self.config.arrival_epsilon);

        if at_goal {
            self.agent.clear_route();
            if let Some(cell) = goal {
                self.events.push(NavEvent::Arrived { cell });
            }
            let target_valid = self.agent.action_target.is_some();
            self.apply(StateInput::Arrived { target_valid });
            return MoveOutcome::AlreadyThere;
        }

        if let Some(goal) = goal {
            log::info!("Walking to {goal} ({steps} steps)");
            self.events.push(NavEvent::PathFound { goal, steps });
        }
        self.agent.set_route(cells, waypoints);
        self.apply(StateInput::Walk);
        MoveOutcome::Started { steps }
    }

    /// Cheapest route to a walkable orthogonal neighbour of `target_cell`.
    ///
    /// Candidates are tried in the order +x, -x, +z, -z; the first of
    /// equally cheap routes wins.
    fn stand_off_path(&self, target_cell: Cell) -> Option<Path> {
        let start = self.agent_cell();
        Cell::ORTHOGONAL
            .iter()
            .map(|&(dx, dz)| target_cell.offset(dx, dz))
            .filter(|&cell| self.grid.is_walkable(cell))
            .map(|cell| self.finder.find_path(&self.grid, start, cell))
            .filter(|path| !path.is_empty())
            .min_by(|a, b| a.cost().total_cmp(&b.cost()))
    }
}

impl<T: Terrain + fmt::Debug> fmt::Debug for NavigationCore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationCore")
            .field("config", &self.config)
            .field("agent", &self.agent)
            .field("build_mode", &self.build_mode)
            .field("queued_commands", &self.commands.len())
            .finish_non_exhaustive()
    }
}
