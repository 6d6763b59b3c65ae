#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Cucumber World grid explorer.
//!
//! This crate defines the message surface that connects the explorer, the
//! authoritative per-level world, and the pure encounter and interaction
//! systems. The explorer submits [`Command`] values describing player intents
//! and clock advances, the world executes them via its `apply` entry point,
//! and then reports [`Event`] values that the explorer relays to external
//! collaborators such as the battle launcher or the dialog display.

use std::{fmt, sync::Arc, time::Duration};

use serde::{Deserialize, Serialize};

/// Time a single tile step takes to animate unless configured otherwise.
pub const DEFAULT_MOVEMENT_SPEED: Duration = Duration::from_millis(150);

/// Encounter kind reported when a tile does not name its own encounter types.
pub const DEFAULT_ENCOUNTER_KIND: &str = "wild_fruit";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player step one tile in the provided direction.
    Move {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Requests that the player interact with the current or an adjacent tile.
    Interact,
    /// Teleports an idle player onto the provided cell.
    PlacePlayer {
        /// Cell the player should occupy.
        cell: GridPosition,
    },
    /// Restores the step counter recorded in a saved session.
    ResumeStepCount {
        /// Number of steps the player had completed.
        step_count: u32,
    },
    /// Replaces the tile stored in a single cell.
    SetTile {
        /// Cell whose tile should change.
        cell: GridPosition,
        /// Tile to store, or `None` to clear the cell.
        tag: Option<TileTag>,
    },
    /// Replaces every cell of the grid with the provided tile.
    FillGrid {
        /// Tile stored into every cell.
        tag: TileTag,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the player began animating toward a neighbouring cell.
    MovementStarted {
        /// Direction of travel.
        direction: Direction,
        /// Cell the player is leaving.
        from: GridPosition,
        /// Cell the player will occupy once the step completes.
        to: GridPosition,
    },
    /// Reports that a direction was stored while a step was still in flight.
    MovementQueued {
        /// Direction that will be re-issued when the current step completes.
        direction: Direction,
    },
    /// Reports that a movement intent was rejected without changing state.
    MovementRejected {
        /// Direction of the rejected intent.
        direction: Direction,
        /// Specific reason the step was refused.
        reason: MovementRejection,
    },
    /// Confirms that the player finished a step and now rests on a new cell.
    StepCompleted {
        /// Cell the player landed on.
        cell: GridPosition,
        /// Total number of completed steps after this one.
        step_count: u32,
    },
    /// Confirms that the player was teleported onto a cell.
    PlayerPlaced {
        /// Cell the player now occupies.
        cell: GridPosition,
    },
    /// Announces that a random encounter fired on the landed tile.
    EncounterTriggered {
        /// Encounter category requested from the external encounter generator.
        kind: String,
        /// Definition of the tile the encounter fired on.
        tile: Arc<TileDefinition>,
        /// Cell the encounter fired on.
        cell: GridPosition,
    },
    /// Announces that the player interacted with an interactive tile.
    InteractionTriggered {
        /// Definition of the tile that was interacted with.
        tile: Arc<TileDefinition>,
        /// Cell holding the interacted tile.
        cell: GridPosition,
    },
    /// Announces that an auto-triggered healing tile was stepped on.
    HealingTriggered {
        /// Cell holding the healing tile.
        cell: GridPosition,
    },
    /// Announces that an auto-triggered tile requested a level transition.
    TransitionTriggered {
        /// Destination described by the tile.
        transition: TransitionSpec,
        /// Cell holding the transition tile.
        cell: GridPosition,
    },
}

/// Reasons a movement intent may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementRejection {
    /// The target cell lies outside the grid.
    OutOfBounds,
    /// The target cell holds a tile that cannot be walked on.
    Blocked,
}

/// Cardinal movement directions available to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Every direction in neighbour search order.
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Column and row offsets applied by a single step in this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    #[serde(alias = "x")]
    column: u32,
    #[serde(alias = "y")]
    row: u32,
}

impl GridPosition {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Returns the neighbouring cell in the provided direction.
    ///
    /// Stepping past column or row zero yields `None`. The upper bound is
    /// owned by the grid, so callers still need to validate the result.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<GridPosition> {
        let (column_delta, row_delta) = direction.delta();
        let column = self.column.checked_add_signed(column_delta)?;
        let row = self.row.checked_add_signed(row_delta)?;
        Some(Self::new(column, row))
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// Point in world pixel space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelPosition {
    x: f32,
    y: f32,
}

impl PixelPosition {
    /// Origin of world pixel space.
    pub const ORIGIN: PixelPosition = PixelPosition::new(0.0, 0.0);

    /// Creates a new pixel position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in pixels.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in pixels.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Name of a terrain or object category stored in a grid cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileTag(String);

impl TileTag {
    /// Creates a new tile tag.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrows the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TileTag {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for TileTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Behaviour record a tile tag resolves to.
///
/// Field names follow the tile catalog document so definitions deserialise
/// directly from it. Missing fields take the values of [`Default`], which
/// describes a plain walkable tile without any special behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileDefinition {
    /// Human readable name shown by dialogs.
    pub name: Option<String>,
    /// Glyph used by presentation layers.
    pub emoji: Option<String>,
    /// Background colour used by presentation layers.
    pub color: Option<String>,
    /// Whether the player may step onto the tile.
    pub walkable: bool,
    /// Marks the tile as an obstacle. Passability follows `walkable` alone.
    pub blocks_movement: bool,
    /// Probability in `[0, 1]` that a completed step onto the tile fires an encounter.
    pub encounter_rate: Option<f32>,
    /// Encounter categories the tile offers; the first one is requested.
    pub encounter_types: Vec<String>,
    /// Whether the explicit interact intent resolves to this tile.
    pub interactive: bool,
    /// Whether the tile fires its tile events automatically when stepped on.
    pub auto_trigger: bool,
    /// Whether stepping on the tile heals the player's party.
    pub healing: bool,
    /// Level transition requested when the tile is auto-triggered.
    pub transition: Option<TransitionSpec>,
    /// Extra actions a dialog may offer when the tile is interacted with.
    pub special_actions: Vec<String>,
    /// Whether the tile displays the text of its level object on interaction.
    pub has_text: bool,
    /// Whether the tile yields items on interaction.
    pub harvestable: bool,
}

impl TileDefinition {
    /// Reports whether the player may step onto the tile.
    ///
    /// Only `walkable` decides; `blocks_movement` is descriptive.
    #[must_use]
    pub const fn is_passable(&self) -> bool {
        self.walkable
    }

    /// Encounter rate if the tile can fire encounters at all.
    ///
    /// Rates that are absent, zero, negative, or not a number disable
    /// encounters on the tile.
    #[must_use]
    pub fn effective_encounter_rate(&self) -> Option<f32> {
        self.encounter_rate.filter(|rate| *rate > 0.0)
    }

    /// Encounter category requested when an encounter fires on the tile.
    #[must_use]
    pub fn encounter_kind(&self) -> &str {
        self.encounter_types
            .first()
            .map_or(DEFAULT_ENCOUNTER_KIND, String::as_str)
    }
}

impl Default for TileDefinition {
    fn default() -> Self {
        Self {
            name: None,
            emoji: None,
            color: None,
            walkable: true,
            blocks_movement: false,
            encounter_rate: None,
            encounter_types: Vec::new(),
            interactive: false,
            auto_trigger: false,
            healing: false,
            transition: None,
            special_actions: Vec::new(),
            has_text: false,
            harvestable: false,
        }
    }
}

/// Destination requested by a transition tile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSpec {
    /// World that hosts the destination level; `None` keeps the current world.
    pub world: Option<String>,
    /// Identifier of the destination level.
    pub level: Option<String>,
    /// Cell the player should appear on in the destination level.
    pub spawn: Option<GridPosition>,
}

/// Read access to the tile definitions laid out on a grid.
pub trait TileLookup {
    /// Resolves the definition of the tile stored at the provided cell.
    ///
    /// Returns `None` for cells outside the grid, empty cells, and tags the
    /// catalog does not know.
    fn definition_at(&self, cell: GridPosition) -> Option<&Arc<TileDefinition>>;
}

/// Buttons held by the player during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct InputState {
    /// Whether an "up" key is held.
    pub up: bool,
    /// Whether a "down" key is held.
    pub down: bool,
    /// Whether a "left" key is held.
    pub left: bool,
    /// Whether a "right" key is held.
    pub right: bool,
    /// Whether the interact key is held.
    pub interact: bool,
}

impl InputState {
    /// Input holding a single direction key.
    #[must_use]
    pub fn holding(direction: Direction) -> Self {
        let mut input = Self {
            up: false,
            down: false,
            left: false,
            right: false,
            interact: false,
        };
        match direction {
            Direction::Up => input.up = true,
            Direction::Down => input.down = true,
            Direction::Left => input.left = true,
            Direction::Right => input.right = true,
        }
        input
    }

    /// Input holding only the interact key.
    #[must_use]
    pub const fn interacting() -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
            interact: true,
        }
    }

    /// Direction the held keys resolve to.
    ///
    /// When several direction keys are held, up wins over down, down over
    /// left, and left over right.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        if self.up {
            Some(Direction::Up)
        } else if self.down {
            Some(Direction::Down)
        } else if self.left {
            Some(Direction::Left)
        } else if self.right {
            Some(Direction::Right)
        } else {
            None
        }
    }
}
