use std::collections::BTreeMap;

use cucumber_world_core::{GridPosition, TileTag};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::{DocumentError, Grid};

const FALLBACK_LEVEL_ID: &str = "fallback_level";
const FALLBACK_LEVEL_NAME: &str = "Fallback Garden";
const BACKGROUND_TILE: &str = "grass";
const PATH_TILE: &str = "path";
const TREE_TILE: &str = "tree";
const BUSH_TILE: &str = "bush";
const GENERATED_TREES: usize = 20;
const GENERATED_BUSHES: usize = 15;
/// Largest grid a level document may request.
const MAX_LEVEL_CELLS: u64 = 1 << 20;

/// Grid dimensions used when a level document does not provide its own.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelDimensions {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in pixels.
    pub tile_size: f32,
}

impl LevelDimensions {
    /// Dimensions that tile the provided screen with whole tiles.
    #[must_use]
    pub fn covering(screen_width: f32, screen_height: f32, tile_size: f32) -> Self {
        let tiles = |length: f32| {
            if tile_size > 0.0 {
                (length / tile_size).floor().max(0.0) as u32
            } else {
                0
            }
        };
        Self {
            columns: tiles(screen_width),
            rows: tiles(screen_height),
            tile_size,
        }
    }
}

impl Default for LevelDimensions {
    fn default() -> Self {
        Self::covering(1200.0, 800.0, 32.0)
    }
}

/// Object placed on a level cell that carries dialog text or other payload.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractiveObject {
    position: GridPosition,
    text: Option<String>,
    payload: serde_json::Value,
}

impl InteractiveObject {
    /// Creates a new interactive object.
    #[must_use]
    pub fn new(position: GridPosition, text: Option<String>, payload: serde_json::Value) -> Self {
        Self {
            position,
            text,
            payload,
        }
    }

    /// Cell the object sits on.
    #[must_use]
    pub const fn position(&self) -> GridPosition {
        self.position
    }

    /// Dialog text shown when the object is inspected.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Remaining document fields attached to the object.
    #[must_use]
    pub const fn payload(&self) -> &serde_json::Value {
        &self.payload
    }
}

/// A loaded level: its tile grid, start cell and interactive objects.
#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    id: String,
    name: Option<String>,
    description: Option<String>,
    grid: Grid,
    player_start: GridPosition,
    interactive_objects: Vec<InteractiveObject>,
}

impl Level {
    /// Creates a level from an already populated grid.
    ///
    /// An invalid `player_start` is replaced by the grid's center cell.
    #[must_use]
    pub fn new(id: impl Into<String>, grid: Grid, player_start: GridPosition) -> Self {
        let player_start = if grid.is_valid(player_start) {
            player_start
        } else {
            grid.center_cell()
        };
        Self {
            id: id.into(),
            name: None,
            description: None,
            grid,
            player_start,
            interactive_objects: Vec::new(),
        }
    }

    /// Attaches interactive objects to the level.
    #[must_use]
    pub fn with_objects(mut self, objects: Vec<InteractiveObject>) -> Self {
        self.interactive_objects = objects;
        self
    }

    /// Parses a level document.
    ///
    /// `grid_layout` takes precedence over `tile_map`. A document with
    /// neither is filled by [`Level::generate_default`]'s layout. The
    /// player starts on `player_start` when it names a valid cell and on the
    /// grid's center otherwise.
    ///
    /// A grid without cells or with more than `MAX_LEVEL_CELLS` cells is
    /// rejected with [`DocumentError::Dimensions`].
    pub fn from_json(
        text: &str,
        dimensions: LevelDimensions,
        seed: u64,
    ) -> Result<Self, DocumentError> {
        let document: LevelDocument = serde_json::from_str(text).map_err(DocumentError::Level)?;
        let columns = document.width.unwrap_or(dimensions.columns);
        let rows = document.height.unwrap_or(dimensions.rows);
        let cells = u64::from(columns) * u64::from(rows);
        if cells == 0 || cells > MAX_LEVEL_CELLS {
            return Err(DocumentError::Dimensions { columns, rows });
        }
        let mut grid = Grid::new(columns, rows, dimensions.tile_size);

        if let Some(layout) = &document.grid_layout {
            apply_grid_layout(&mut grid, layout);
        } else if let Some(tile_map) = &document.tile_map {
            apply_tile_map(&mut grid, tile_map);
        } else {
            tracing::info!("level document has no grid data, generating default layout");
            generate_layout(&mut grid, seed);
        }

        let player_start = match document.player_start.as_ref().and_then(CellDocument::to_cell) {
            Some(cell) if grid.is_valid(cell) => cell,
            _ => {
                if document.player_start.is_some() {
                    tracing::warn!("level player_start lies outside the grid, using center");
                }
                grid.center_cell()
            }
        };

        let interactive_objects = document
            .interactive_objects
            .into_iter()
            .filter_map(ObjectDocument::into_object)
            .collect();

        Ok(Self {
            id: document.id.unwrap_or_else(|| "unknown".to_owned()),
            name: document.name,
            description: document.description,
            grid,
            player_start,
            interactive_objects,
        })
    }

    /// Procedurally generates the default level.
    ///
    /// The grid is filled with grass, scattered with trees and bushes at
    /// seeded random cells, and crossed by one horizontal path along the
    /// middle row. The player starts on the grid's center.
    #[must_use]
    pub fn generate_default(dimensions: LevelDimensions, seed: u64) -> Self {
        let mut grid = Grid::new(dimensions.columns, dimensions.rows, dimensions.tile_size);
        generate_layout(&mut grid, seed);
        let mut level = Self::new(FALLBACK_LEVEL_ID, grid, GridPosition::new(0, 0));
        level.player_start = level.grid.center_cell();
        level.name = Some(FALLBACK_LEVEL_NAME.to_owned());
        level
    }

    /// Identifier of the level.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name of the level.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Description shown when entering the level.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Tile grid of the level.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Cell the player starts on.
    #[must_use]
    pub const fn player_start(&self) -> GridPosition {
        self.player_start
    }

    /// Interactive objects placed on the level.
    #[must_use]
    pub fn interactive_objects(&self) -> &[InteractiveObject] {
        &self.interactive_objects
    }

    /// Interactive object placed on the provided cell, if any.
    #[must_use]
    pub fn object_at(&self, cell: GridPosition) -> Option<&InteractiveObject> {
        self.interactive_objects
            .iter()
            .find(|object| object.position == cell)
    }
}

fn apply_grid_layout(grid: &mut Grid, layout: &[Vec<Option<String>>]) {
    for (row, tiles) in (0..grid.rows()).zip(layout) {
        for (column, tile) in (0..grid.columns()).zip(tiles) {
            grid.set_tile(GridPosition::new(column, row), tile.as_deref().map(TileTag::new));
        }
    }
}

fn apply_tile_map(grid: &mut Grid, tile_map: &BTreeMap<String, String>) {
    grid.fill(&TileTag::new(BACKGROUND_TILE));
    for (key, tag) in tile_map {
        match parse_cell_key(key) {
            Some(cell) if grid.is_valid(cell) => {
                grid.set_tile(cell, Some(TileTag::new(tag.as_str())));
            }
            _ => {
                tracing::trace!(key = key.as_str(), "skipping tile_map entry outside the grid");
            }
        }
    }
}

fn parse_cell_key(key: &str) -> Option<GridPosition> {
    let (column, row) = key.split_once(',')?;
    let column = u32::try_from(column.trim().parse::<i64>().ok()?).ok()?;
    let row = u32::try_from(row.trim().parse::<i64>().ok()?).ok()?;
    Some(GridPosition::new(column, row))
}

fn generate_layout(grid: &mut Grid, seed: u64) {
    grid.fill(&TileTag::new(BACKGROUND_TILE));
    if grid.columns() == 0 || grid.rows() == 0 {
        return;
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for (tag, count) in [(TREE_TILE, GENERATED_TREES), (BUSH_TILE, GENERATED_BUSHES)] {
        for _ in 0..count {
            let cell = GridPosition::new(
                rng.gen_range(0..grid.columns()),
                rng.gen_range(0..grid.rows()),
            );
            grid.set_tile(cell, Some(TileTag::new(tag)));
        }
    }

    let path_row = grid.rows() / 2;
    for column in 0..grid.columns() {
        grid.set_tile(
            GridPosition::new(column, path_row),
            Some(TileTag::new(PATH_TILE)),
        );
    }
}

#[derive(Debug, Deserialize)]
struct LevelDocument {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    width: Option<u32>,
    #[serde(default)]
    height: Option<u32>,
    #[serde(default)]
    grid_layout: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    tile_map: Option<BTreeMap<String, String>>,
    #[serde(default)]
    player_start: Option<CellDocument>,
    #[serde(default)]
    interactive_objects: Vec<ObjectDocument>,
}

#[derive(Debug, Deserialize)]
struct CellDocument {
    x: i64,
    y: i64,
}

impl CellDocument {
    fn to_cell(&self) -> Option<GridPosition> {
        Some(GridPosition::new(
            u32::try_from(self.x).ok()?,
            u32::try_from(self.y).ok()?,
        ))
    }
}

#[derive(Debug, Deserialize)]
struct ObjectDocument {
    position: CellDocument,
    #[serde(default)]
    text: Option<String>,
    #[serde(flatten)]
    payload: serde_json::Map<String, serde_json::Value>,
}

impl ObjectDocument {
    fn into_object(self) -> Option<InteractiveObject> {
        let position = self.position.to_cell()?;
        Some(InteractiveObject::new(
            position,
            self.text,
            serde_json::Value::Object(self.payload),
        ))
    }
}
