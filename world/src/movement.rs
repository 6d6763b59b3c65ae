use std::time::Duration;

use cucumber_world_core::{Direction, GridPosition, MovementRejection, PixelPosition};
use glam::Vec2;

use crate::{Grid, TileView};

/// Animation state of the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MovementState {
    /// The player rests at the center of its current cell.
    Idle,
    /// The player is animating toward a neighbouring cell.
    InFlight(InFlight),
}

/// Parameters of a step that is currently animating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InFlight {
    /// Pixel position the step started from.
    pub from: PixelPosition,
    /// Pixel position at the center of the target cell.
    pub to: PixelPosition,
    /// Cell the player will occupy once the step completes.
    pub target_cell: GridPosition,
    /// Direction of travel.
    pub direction: Direction,
    /// Simulation time at which the step started.
    pub started_at: Duration,
    /// Time the step takes to complete.
    pub duration: Duration,
}

impl InFlight {
    fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        let ratio = elapsed.as_nanos() as f64 / self.duration.as_nanos() as f64;
        ratio.clamp(0.0, 1.0) as f32
    }
}

/// Everything the movement controller tracks about the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerGridState {
    current_cell: GridPosition,
    current_pixel: PixelPosition,
    movement: MovementState,
    pending_direction: Option<Direction>,
    step_count: u32,
    last_encounter_step: u32,
}

impl PlayerGridState {
    /// Cell the player currently occupies.
    #[must_use]
    pub const fn current_cell(&self) -> GridPosition {
        self.current_cell
    }

    /// Pixel position of the player, interpolated while a step animates.
    #[must_use]
    pub const fn current_pixel(&self) -> PixelPosition {
        self.current_pixel
    }

    /// Animation state of the player.
    #[must_use]
    pub const fn movement(&self) -> MovementState {
        self.movement
    }

    /// Direction that will be re-issued when the current step completes.
    #[must_use]
    pub const fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Number of completed steps.
    #[must_use]
    pub const fn step_count(&self) -> u32 {
        self.step_count
    }

    /// Step count recorded when the last encounter fired.
    #[must_use]
    pub const fn last_encounter_step(&self) -> u32 {
        self.last_encounter_step
    }

    /// Reports whether a step is animating.
    #[must_use]
    pub const fn is_moving(&self) -> bool {
        matches!(self.movement, MovementState::InFlight(_))
    }
}

/// Result of submitting a direction to the movement controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    /// A new step started toward the provided cell.
    Started {
        /// Cell the player is leaving.
        from: GridPosition,
        /// Cell the player is heading to.
        to: GridPosition,
    },
    /// The direction was stored because a step is already in flight.
    Queued,
    /// The step was refused; nothing changed.
    Rejected(MovementRejection),
}

/// Step that finished during [`MovementController::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletedStep {
    /// Cell the player landed on.
    pub cell: GridPosition,
    /// Number of completed steps including this one.
    pub step_count: u32,
}

/// Tile-stepping state machine that owns the player's grid state.
#[derive(Clone, Debug)]
pub struct MovementController {
    state: PlayerGridState,
    movement_speed: Duration,
}

impl MovementController {
    /// Creates an idle controller resting on `start`.
    #[must_use]
    pub fn new(start: GridPosition, grid: &Grid, movement_speed: Duration) -> Self {
        Self {
            state: PlayerGridState {
                current_cell: start,
                current_pixel: grid.center_pixel_of(start),
                movement: MovementState::Idle,
                pending_direction: None,
                step_count: 0,
                last_encounter_step: 0,
            },
            movement_speed,
        }
    }

    /// Snapshot of the player's grid state.
    #[must_use]
    pub const fn state(&self) -> &PlayerGridState {
        &self.state
    }

    /// Time a single step takes to animate.
    #[must_use]
    pub const fn movement_speed(&self) -> Duration {
        self.movement_speed
    }

    /// Submits a directional intent at simulation time `now`.
    ///
    /// While idle the target cell is validated and, when passable, a new
    /// step starts. While a step is in flight the direction replaces any
    /// previously queued one.
    pub fn request(
        &mut self,
        direction: Direction,
        now: Duration,
        tiles: &TileView<'_>,
    ) -> MoveOutcome {
        if self.state.is_moving() {
            self.state.pending_direction = Some(direction);
            return MoveOutcome::Queued;
        }

        let from = self.state.current_cell;
        let Some(target_cell) = from
            .step(direction)
            .filter(|cell| tiles.grid().is_valid(*cell))
        else {
            return MoveOutcome::Rejected(MovementRejection::OutOfBounds);
        };

        if !tiles.is_passable(target_cell) {
            return MoveOutcome::Rejected(MovementRejection::Blocked);
        }

        self.state.movement = MovementState::InFlight(InFlight {
            from: self.state.current_pixel,
            to: tiles.grid().center_pixel_of(target_cell),
            target_cell,
            direction,
            started_at: now,
            duration: self.movement_speed,
        });

        MoveOutcome::Started {
            from,
            to: target_cell,
        }
    }

    /// Advances the animation to simulation time `now`.
    ///
    /// Returns the completed step when the animation reached its target.
    /// The pending direction is left in place for the caller to re-issue
    /// after it has run its post-step checks.
    pub fn advance(&mut self, now: Duration) -> Option<CompletedStep> {
        let MovementState::InFlight(flight) = self.state.movement else {
            return None;
        };

        let progress = flight.progress(now);
        let from = Vec2::new(flight.from.x(), flight.from.y());
        let to = Vec2::new(flight.to.x(), flight.to.y());
        let position = from.lerp(to, progress);
        self.state.current_pixel = PixelPosition::new(position.x, position.y);

        if progress < 1.0 {
            return None;
        }

        self.state.current_cell = flight.target_cell;
        self.state.current_pixel = flight.to;
        self.state.step_count = self.state.step_count.saturating_add(1);
        self.state.movement = MovementState::Idle;

        Some(CompletedStep {
            cell: flight.target_cell,
            step_count: self.state.step_count,
        })
    }

    /// Removes and returns the queued direction.
    pub fn take_pending(&mut self) -> Option<Direction> {
        self.state.pending_direction.take()
    }

    /// Records that an encounter fired at the current step count.
    pub fn record_encounter(&mut self) {
        self.state.last_encounter_step = self.state.step_count;
    }

    /// Restores a saved step counter.
    ///
    /// The encounter spacing restarts from the restored count so a resumed
    /// session does not fire an encounter on its first step.
    pub fn resume_step_count(&mut self, step_count: u32) {
        self.state.step_count = step_count;
        self.state.last_encounter_step = step_count;
    }

    /// Teleports an idle player onto `cell`.
    ///
    /// Returns `false` without changing state when the cell is outside the
    /// grid or a step is in flight.
    pub fn place(&mut self, cell: GridPosition, grid: &Grid) -> bool {
        if self.state.is_moving() || !grid.is_valid(cell) {
            return false;
        }
        self.state.current_cell = cell;
        self.state.current_pixel = grid.center_pixel_of(cell);
        true
    }
}
