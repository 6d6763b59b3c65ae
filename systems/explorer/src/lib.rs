#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Orchestrator that runs a Cucumber World level from per-frame input.
//!
//! [`GridWorldExplorer`] loads a level through a [`DocumentSource`], turns
//! the held keys of every frame into world commands and relays the tile
//! events the world reports to the host's [`Collaborators`]: the battle
//! launcher, the dialog display and the level loader.

mod clock;
mod config;
mod save;
mod source;

use cucumber_world_core::{
    Command, Event, GridPosition, InputState, TileDefinition, TransitionSpec,
};
use cucumber_world_world::{
    self as world, query, DocumentError, InteractiveObject, Level, TileCatalog, World,
};

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ExplorerConfig;
pub use save::ExplorerState;
pub use source::{DirectorySource, DocumentSource, MemorySource, SourceError};

/// Receivers of the events an exploration session produces.
///
/// Every callback is fire-and-forget and does nothing by default.
pub trait Collaborators {
    /// A random encounter fired on the tile the player landed on.
    fn on_encounter(&mut self, _kind: &str, _tile: &TileDefinition, _cell: GridPosition) {}

    /// The player interacted with an interactive tile.
    ///
    /// `object` is the level's interactive object on that cell, if any.
    fn on_interaction(
        &mut self,
        _tile: &TileDefinition,
        _cell: GridPosition,
        _object: Option<&InteractiveObject>,
    ) {
    }

    /// The player stepped on or interacted with a healing tile.
    fn on_healing(&mut self) {}

    /// The player stepped on a tile that leads to another level.
    fn on_transition(&mut self, _transition: &TransitionSpec) {}
}

impl Collaborators for () {}

#[derive(Debug, thiserror::Error)]
enum LoadError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// Runs one level at a time and relays its events.
#[derive(Debug)]
pub struct GridWorldExplorer<C, K> {
    config: ExplorerConfig,
    world: World,
    world_id: String,
    level_id: String,
    collaborators: C,
    clock: K,
    interact_held: bool,
    events: Vec<Event>,
}

impl<C, K> GridWorldExplorer<C, K>
where
    C: Collaborators,
    K: Clock,
{
    /// Loads `level_id` of `world_id` and places the player on its start cell.
    ///
    /// Loading never fails: an unusable catalog is replaced by the built-in
    /// fallback definitions and an unusable level by a generated one.
    pub fn load<S>(
        source: &S,
        world_id: &str,
        level_id: &str,
        config: ExplorerConfig,
        collaborators: C,
        clock: K,
    ) -> Self
    where
        S: DocumentSource + ?Sized,
    {
        let catalog = load_catalog(source);
        let level = load_level(source, world_id, level_id, &config);
        tracing::info!(
            world = world_id,
            level = level.id(),
            start = %level.player_start(),
            "level ready"
        );

        Self {
            world: World::new(level, catalog, config.world_config()),
            config,
            world_id: world_id.to_owned(),
            level_id: level_id.to_owned(),
            collaborators,
            clock,
            interact_held: false,
            events: Vec::new(),
        }
    }

    /// Runs one frame.
    ///
    /// The world first advances by the time the clock reports, then the
    /// held direction is submitted and a fresh interact press is resolved.
    /// Tile events produced along the way are relayed to the collaborators.
    pub fn update(&mut self, input: &InputState) {
        self.events.clear();

        let dt = self.clock.delta();
        world::apply(&mut self.world, Command::Tick { dt }, &mut self.events);

        if let Some(direction) = input.direction() {
            world::apply(&mut self.world, Command::Move { direction }, &mut self.events);
        }

        if input.interact && !self.interact_held {
            world::apply(&mut self.world, Command::Interact, &mut self.events);
        }
        self.interact_held = input.interact;

        self.relay();
    }

    fn relay(&mut self) {
        let level = query::level(&self.world);
        for event in &self.events {
            match event {
                Event::EncounterTriggered { kind, tile, cell } => {
                    self.collaborators.on_encounter(kind, tile, *cell);
                }
                Event::InteractionTriggered { tile, cell } => {
                    self.collaborators
                        .on_interaction(tile, *cell, level.object_at(*cell));
                    if tile.healing {
                        self.collaborators.on_healing();
                    }
                }
                Event::HealingTriggered { .. } => self.collaborators.on_healing(),
                Event::TransitionTriggered { transition, .. } => {
                    self.collaborators.on_transition(transition);
                }
                _ => {}
            }
        }
    }

    /// Events the world reported during the most recent frame.
    #[must_use]
    pub fn frame_events(&self) -> &[Event] {
        &self.events
    }

    /// Snapshot of the session for saving.
    #[must_use]
    pub fn state(&self) -> ExplorerState {
        let player = query::player(&self.world);
        ExplorerState {
            current_world: self.world_id.clone(),
            current_level: self.level_id.clone(),
            player_grid_x: player.current_cell().column(),
            player_grid_y: player.current_cell().row(),
            step_count: player.step_count(),
        }
    }

    /// Restores a saved session onto the loaded level.
    ///
    /// Returns `false` without changing anything when the snapshot belongs
    /// to another level. A saved cell outside the grid is ignored while the
    /// step count is still restored.
    pub fn restore(&mut self, state: &ExplorerState) -> bool {
        if state.current_world != self.world_id || state.current_level != self.level_id {
            tracing::warn!(
                world = state.current_world.as_str(),
                level = state.current_level.as_str(),
                "saved session belongs to another level"
            );
            return false;
        }

        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::PlacePlayer {
                cell: state.player_cell(),
            },
            &mut events,
        );
        world::apply(
            &mut self.world,
            Command::ResumeStepCount {
                step_count: state.step_count,
            },
            &mut events,
        );
        true
    }

    /// Loads another level and carries the step count over.
    ///
    /// `spawn`, when valid for the new level, replaces its start cell.
    pub fn travel<S>(
        &mut self,
        source: &S,
        world_id: &str,
        level_id: &str,
        spawn: Option<GridPosition>,
    ) where
        S: DocumentSource + ?Sized,
    {
        let catalog = load_catalog(source);
        let level = load_level(source, world_id, level_id, &self.config);
        tracing::info!(world = world_id, level = level.id(), "travelling");
        self.world_id = world_id.to_owned();
        self.level_id = level_id.to_owned();
        self.replace_level(level, catalog);

        if let Some(cell) = spawn {
            let mut events = Vec::new();
            world::apply(&mut self.world, Command::PlacePlayer { cell }, &mut events);
        }
    }

    /// Follows a transition reported by a tile.
    ///
    /// A transition without a level name changes nothing and returns
    /// `false`. A missing world name stays in the current world.
    pub fn follow_transition<S>(&mut self, source: &S, transition: &TransitionSpec) -> bool
    where
        S: DocumentSource + ?Sized,
    {
        let Some(level_id) = transition.level.as_deref() else {
            return false;
        };
        let world_id = transition
            .world
            .clone()
            .unwrap_or_else(|| self.world_id.clone());
        self.travel(source, &world_id, level_id, transition.spawn);
        true
    }

    /// Replaces the running level wholesale, keeping the step count.
    pub fn replace_level(&mut self, level: Level, catalog: TileCatalog) {
        let step_count = query::player(&self.world).step_count();
        self.world = World::new(level, catalog, self.config.world_config());
        self.interact_held = false;
        self.events.clear();
        world::apply(
            &mut self.world,
            Command::ResumeStepCount { step_count },
            &mut self.events,
        );
    }

    /// World backing the running level.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Identifier of the world being explored.
    #[must_use]
    pub fn world_id(&self) -> &str {
        &self.world_id
    }

    /// Identifier of the running level.
    #[must_use]
    pub fn level_id(&self) -> &str {
        &self.level_id
    }

    /// Configuration the explorer was built with.
    #[must_use]
    pub const fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Receivers of relayed events.
    #[must_use]
    pub const fn collaborators(&self) -> &C {
        &self.collaborators
    }

    /// Mutable access to the receivers of relayed events.
    pub fn collaborators_mut(&mut self) -> &mut C {
        &mut self.collaborators
    }
}

fn load_catalog<S>(source: &S) -> TileCatalog
where
    S: DocumentSource + ?Sized,
{
    match source.catalog() {
        Ok(text) => TileCatalog::from_json_or_fallback(&text),
        Err(error) => {
            tracing::warn!(%error, "tile catalog unavailable, using fallback definitions");
            TileCatalog::fallback()
        }
    }
}

fn load_level<S>(source: &S, world_id: &str, level_id: &str, config: &ExplorerConfig) -> Level
where
    S: DocumentSource + ?Sized,
{
    let dimensions = config.dimensions();
    let parsed = source
        .level(world_id, level_id)
        .map_err(LoadError::from)
        .and_then(|text| {
            Level::from_json(&text, dimensions, config.seed).map_err(LoadError::from)
        });

    match parsed {
        Ok(level) => level,
        Err(error) => {
            tracing::warn!(
                %error,
                world = world_id,
                level = level_id,
                "level unavailable, generating fallback level"
            );
            Level::generate_default(dimensions, config.seed)
        }
    }
}
