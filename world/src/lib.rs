#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative per-level state for the Cucumber World grid explorer.
//!
//! A [`World`] owns the tile grid of one level, the tile catalog that gives
//! tags their meaning, the player's movement state and the camera. It is
//! mutated exclusively through [`apply`], which emits [`Event`] values that
//! describe every change, and inspected through the [`query`] module.

mod camera;
mod catalog;
mod grid;
mod level;
mod movement;

use std::time::Duration;

use cucumber_world_core::{Command, Direction, Event, TileLookup, DEFAULT_MOVEMENT_SPEED};
use cucumber_world_system_encounter::{
    Config as EncounterConfig, EncounterTrigger, DEFAULT_MIN_SPACING,
};
use cucumber_world_system_interaction::InteractionResolver;

pub use camera::{compute_offset, Camera, CameraMode, ScreenSize};
pub use catalog::{CatalogOrigin, TileCatalog};
pub use grid::{Grid, TileView};
pub use level::{InteractiveObject, Level, LevelDimensions};
pub use movement::{
    CompletedStep, InFlight, MoveOutcome, MovementController, MovementState, PlayerGridState,
};

/// Failures raised while parsing catalog and level documents.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The tile catalog document could not be parsed.
    #[error("malformed tile catalog: {0}")]
    Catalog(#[source] serde_json::Error),
    /// The level document could not be parsed.
    #[error("malformed level document: {0}")]
    Level(#[source] serde_json::Error),
    /// The level document asks for an empty or oversized grid.
    #[error("level dimensions {columns}x{rows} are out of range")]
    Dimensions {
        /// Requested number of columns.
        columns: u32,
        /// Requested number of rows.
        rows: u32,
    },
}

/// Tunable parameters of a world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    /// Time a single step takes to animate.
    pub movement_speed: Duration,
    /// Dimensions of the viewport the camera frames.
    pub screen: ScreenSize,
    /// How the camera follows the player.
    pub camera_mode: CameraMode,
    /// Minimum number of steps between two encounters.
    pub encounter_spacing: u32,
    /// Seed of the encounter random stream.
    pub encounter_seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            movement_speed: DEFAULT_MOVEMENT_SPEED,
            screen: ScreenSize::default(),
            camera_mode: CameraMode::default(),
            encounter_spacing: DEFAULT_MIN_SPACING,
            encounter_seed: 0,
        }
    }
}

/// Represents the state of a single loaded level.
#[derive(Debug)]
pub struct World {
    catalog: TileCatalog,
    level: Level,
    camera: Camera,
    movement: MovementController,
    encounters: EncounterTrigger,
    interactions: InteractionResolver,
    clock: Duration,
}

impl World {
    /// Creates a world that places the player on the level's start cell.
    #[must_use]
    pub fn new(level: Level, catalog: TileCatalog, config: WorldConfig) -> Self {
        let movement =
            MovementController::new(level.player_start(), level.grid(), config.movement_speed);
        let mut camera = Camera::new(config.camera_mode, config.screen);
        camera.snap_to(movement.state().current_pixel(), level.grid());

        Self {
            catalog,
            level,
            camera,
            movement,
            encounters: EncounterTrigger::new(EncounterConfig::new(
                config.encounter_spacing,
                config.encounter_seed,
            )),
            interactions: InteractionResolver,
            clock: Duration::ZERO,
        }
    }

    fn tiles(&self) -> TileView<'_> {
        TileView::new(self.level.grid(), &self.catalog)
    }

    fn request_move(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let tiles = TileView::new(self.level.grid(), &self.catalog);
        match self.movement.request(direction, self.clock, &tiles) {
            MoveOutcome::Started { from, to } => out_events.push(Event::MovementStarted {
                direction,
                from,
                to,
            }),
            MoveOutcome::Queued => out_events.push(Event::MovementQueued { direction }),
            MoveOutcome::Rejected(reason) => {
                tracing::trace!(?direction, ?reason, "movement rejected");
                out_events.push(Event::MovementRejected { direction, reason });
            }
        }
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        let completed = self.movement.advance(self.clock);
        self.camera
            .follow(self.movement.state().current_pixel(), self.level.grid());

        let Some(step) = completed else {
            return;
        };

        out_events.push(Event::StepCompleted {
            cell: step.cell,
            step_count: step.step_count,
        });
        self.check_encounter(step, out_events);
        self.check_auto_trigger(step, out_events);

        if let Some(direction) = self.movement.take_pending() {
            self.request_move(direction, out_events);
        }
    }

    fn check_encounter(&mut self, step: CompletedStep, out_events: &mut Vec<Event>) {
        let tiles = TileView::new(self.level.grid(), &self.catalog);
        let tile = tiles.definition_at(step.cell);
        let fired = self.encounters.maybe_fire(
            step.cell,
            tile,
            step.step_count,
            self.movement.state().last_encounter_step(),
        );

        if let Some(encounter) = fired {
            self.movement.record_encounter();
            out_events.push(Event::EncounterTriggered {
                kind: encounter.kind,
                tile: encounter.tile,
                cell: encounter.cell,
            });
        }
    }

    fn check_auto_trigger(&self, step: CompletedStep, out_events: &mut Vec<Event>) {
        let Some(target) = self
            .interactions
            .resolve_auto_trigger(step.cell, &self.tiles())
        else {
            return;
        };

        tracing::debug!(cell = %target.cell, "auto-triggered tile");
        if target.tile.healing {
            out_events.push(Event::HealingTriggered { cell: target.cell });
        }
        if let Some(transition) = &target.tile.transition {
            out_events.push(Event::TransitionTriggered {
                transition: transition.clone(),
                cell: target.cell,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance(out_events);
        }
        Command::Move { direction } => world.request_move(direction, out_events),
        Command::Interact => {
            let cell = world.movement.state().current_cell();
            if let Some(target) = world.interactions.resolve(cell, &world.tiles()) {
                tracing::debug!(cell = %target.cell, "interaction resolved");
                out_events.push(Event::InteractionTriggered {
                    tile: target.tile,
                    cell: target.cell,
                });
            }
        }
        Command::PlacePlayer { cell } => {
            if world.movement.place(cell, world.level.grid()) {
                world
                    .camera
                    .snap_to(world.movement.state().current_pixel(), world.level.grid());
                out_events.push(Event::PlayerPlaced { cell });
            }
        }
        Command::ResumeStepCount { step_count } => world.movement.resume_step_count(step_count),
        Command::SetTile { cell, tag } => world.level.grid_mut().set_tile(cell, tag),
        Command::FillGrid { tag } => world.level.grid_mut().fill(&tag),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use cucumber_world_core::PixelPosition;

    use super::{Grid, Level, PlayerGridState, TileCatalog, TileView, World};

    /// Tile grid of the loaded level.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        world.level.grid()
    }

    /// Tile catalog resolving the grid's tags.
    #[must_use]
    pub fn catalog(world: &World) -> &TileCatalog {
        &world.catalog
    }

    /// Level the world was built from.
    #[must_use]
    pub fn level(world: &World) -> &Level {
        &world.level
    }

    /// Snapshot of the player's grid state.
    #[must_use]
    pub fn player(world: &World) -> &PlayerGridState {
        world.movement.state()
    }

    /// Top-left offset of the viewport in world pixels.
    #[must_use]
    pub fn camera_offset(world: &World) -> PixelPosition {
        world.camera.offset()
    }

    /// View resolving grid cells to their tile definitions.
    #[must_use]
    pub fn tile_view(world: &World) -> TileView<'_> {
        world.tiles()
    }

    /// Simulation time accumulated from ticks.
    #[must_use]
    pub fn now(world: &World) -> Duration {
        world.clock
    }
}
