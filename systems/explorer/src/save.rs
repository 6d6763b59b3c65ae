use cucumber_world_core::GridPosition;
use serde::{Deserialize, Serialize};

/// Snapshot of an exploration session.
///
/// Serializes to the flat `currentWorld`, `currentLevel`, `playerGridX`,
/// `playerGridY` and `stepCount` keys.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerState {
    /// World the player is exploring.
    pub current_world: String,
    /// Level the player is on.
    pub current_level: String,
    /// Column of the cell the player occupies.
    pub player_grid_x: u32,
    /// Row of the cell the player occupies.
    pub player_grid_y: u32,
    /// Number of completed steps.
    pub step_count: u32,
}

impl ExplorerState {
    /// Cell the player occupies.
    #[must_use]
    pub const fn player_cell(&self) -> GridPosition {
        GridPosition::new(self.player_grid_x, self.player_grid_y)
    }
}
