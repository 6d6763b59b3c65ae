use std::time::Duration;

use cucumber_world_world::{CameraMode, LevelDimensions, ScreenSize, WorldConfig};
use serde::{Deserialize, Serialize};

/// Tunable parameters of the explorer.
///
/// Every field is optional in serialized form; missing fields take their
/// default value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Side length of a tile in pixels.
    pub tile_size: f32,
    /// Viewport width in pixels.
    pub screen_width: f32,
    /// Viewport height in pixels.
    pub screen_height: f32,
    /// Grid columns; derived from the screen width when absent.
    pub grid_columns: Option<u32>,
    /// Grid rows; derived from the screen height when absent.
    pub grid_rows: Option<u32>,
    /// Duration of a single step in milliseconds.
    pub movement_speed_ms: u64,
    /// Minimum number of steps between two encounters.
    pub encounter_spacing: u32,
    /// How the camera follows the player.
    pub camera: CameraMode,
    /// Seed shared by level generation and the encounter stream.
    pub seed: u64,
}

impl ExplorerConfig {
    /// Dimensions applied to level documents that do not carry their own.
    #[must_use]
    pub fn dimensions(&self) -> LevelDimensions {
        let covering =
            LevelDimensions::covering(self.screen_width, self.screen_height, self.tile_size);
        LevelDimensions {
            columns: self.grid_columns.unwrap_or(covering.columns),
            rows: self.grid_rows.unwrap_or(covering.rows),
            tile_size: self.tile_size,
        }
    }

    /// Parameters handed to every world the explorer builds.
    #[must_use]
    pub fn world_config(&self) -> WorldConfig {
        WorldConfig {
            movement_speed: Duration::from_millis(self.movement_speed_ms),
            screen: ScreenSize::new(self.screen_width, self.screen_height),
            camera_mode: self.camera,
            encounter_spacing: self.encounter_spacing,
            encounter_seed: self.seed,
        }
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            screen_width: 1200.0,
            screen_height: 800.0,
            grid_columns: None,
            grid_rows: None,
            movement_speed_ms: 150,
            encounter_spacing: 3,
            camera: CameraMode::Instant,
            seed: 0,
        }
    }
}
