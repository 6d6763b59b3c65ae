use cucumber_world_core::PixelPosition;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Grid;

/// Pixel dimensions of the viewport the camera frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenSize {
    width: f32,
    height: f32,
}

impl ScreenSize {
    /// Creates a new viewport size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Viewport width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Viewport height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    fn as_vec2(self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(1200.0, 800.0)
    }
}

/// How the camera follows its focal point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum CameraMode {
    /// The offset snaps to its target on every recompute.
    #[default]
    Instant,
    /// The offset closes the provided fraction of the remaining distance on
    /// every recompute. Factors outside `(0, 1]` behave like [`CameraMode::Instant`].
    Smooth {
        /// Fraction of the remaining distance covered per recompute.
        factor: f32,
    },
}

/// Computes the top-left viewport offset that centers `focal` on screen.
///
/// Each axis is clamped to `[0, world - screen]`. When the world is smaller
/// than the screen the range collapses and the offset is pinned to zero.
#[must_use]
pub fn compute_offset(focal: PixelPosition, grid: &Grid, screen: ScreenSize) -> PixelPosition {
    let screen = screen.as_vec2();
    let world = Vec2::new(grid.world_width(), grid.world_height());
    let target = Vec2::new(focal.x(), focal.y()) - screen / 2.0;
    let clamped = target.min(world - screen).max(Vec2::ZERO);
    PixelPosition::new(clamped.x, clamped.y)
}

/// Viewport that tracks the player.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    offset: PixelPosition,
    mode: CameraMode,
    screen: ScreenSize,
}

impl Camera {
    /// Creates a camera framing the world origin.
    #[must_use]
    pub const fn new(mode: CameraMode, screen: ScreenSize) -> Self {
        Self {
            offset: PixelPosition::ORIGIN,
            mode,
            screen,
        }
    }

    /// Current top-left offset of the viewport in world pixels.
    #[must_use]
    pub const fn offset(&self) -> PixelPosition {
        self.offset
    }

    /// Viewport dimensions.
    #[must_use]
    pub const fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Follow behaviour.
    #[must_use]
    pub const fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Recomputes the offset for the provided focal point.
    pub fn follow(&mut self, focal: PixelPosition, grid: &Grid) {
        let target = compute_offset(focal, grid, self.screen);
        self.offset = match self.mode {
            CameraMode::Smooth { factor } if factor > 0.0 && factor < 1.0 => {
                let current = Vec2::new(self.offset.x(), self.offset.y());
                let goal = Vec2::new(target.x(), target.y());
                let next = current.lerp(goal, factor);
                PixelPosition::new(next.x, next.y)
            }
            _ => target,
        };
    }

    /// Snaps the offset onto the provided focal point regardless of mode.
    pub fn snap_to(&mut self, focal: PixelPosition, grid: &Grid) {
        self.offset = compute_offset(focal, grid, self.screen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_within_bounds(offset: PixelPosition, grid: &Grid, screen: ScreenSize) {
        let max_x = (grid.world_width() - screen.width()).max(0.0);
        let max_y = (grid.world_height() - screen.height()).max(0.0);
        assert!(
            (0.0..=max_x).contains(&offset.x()),
            "x offset {} outside [0, {max_x}]",
            offset.x()
        );
        assert!(
            (0.0..=max_y).contains(&offset.y()),
            "y offset {} outside [0, {max_y}]",
            offset.y()
        );
    }

    #[test]
    fn centers_focal_point_away_from_edges() {
        let grid = Grid::new(100, 100, 32.0);
        let screen = ScreenSize::new(640.0, 480.0);
        let offset = compute_offset(PixelPosition::new(1600.0, 1600.0), &grid, screen);
        assert_eq!(offset, PixelPosition::new(1280.0, 1360.0));
    }

    #[test]
    fn clamps_to_world_edges() {
        let grid = Grid::new(40, 30, 32.0);
        let screen = ScreenSize::new(640.0, 480.0);

        let top_left = compute_offset(PixelPosition::new(16.0, 16.0), &grid, screen);
        assert_eq!(top_left, PixelPosition::ORIGIN);

        let bottom_right = compute_offset(PixelPosition::new(1264.0, 944.0), &grid, screen);
        assert_eq!(bottom_right, PixelPosition::new(640.0, 480.0));
    }

    #[test]
    fn world_smaller_than_screen_pins_offset_to_zero() {
        let grid = Grid::new(10, 10, 32.0);
        let screen = ScreenSize::new(1200.0, 800.0);
        let offset = compute_offset(PixelPosition::new(300.0, 300.0), &grid, screen);
        assert_eq!(offset, PixelPosition::ORIGIN);
    }

    #[test]
    fn offsets_stay_in_range_across_the_world() {
        let screen = ScreenSize::new(1200.0, 800.0);
        for grid in [
            Grid::new(37, 25, 32.0),
            Grid::new(80, 12, 32.0),
            Grid::new(5, 60, 16.0),
        ] {
            let mut y = 0.0;
            while y <= grid.world_height() {
                let mut x = 0.0;
                while x <= grid.world_width() {
                    let offset = compute_offset(PixelPosition::new(x, y), &grid, screen);
                    assert_within_bounds(offset, &grid, screen);
                    x += 7.5;
                }
                y += 7.5;
            }
        }
    }

    #[test]
    fn smooth_mode_closes_part_of_the_distance() {
        let grid = Grid::new(100, 100, 32.0);
        let screen = ScreenSize::new(640.0, 480.0);
        let mut camera = Camera::new(CameraMode::Smooth { factor: 0.5 }, screen);

        camera.follow(PixelPosition::new(1320.0, 1240.0), &grid);
        assert_eq!(camera.offset(), PixelPosition::new(500.0, 500.0));

        camera.snap_to(PixelPosition::new(1320.0, 1240.0), &grid);
        assert_eq!(camera.offset(), PixelPosition::new(1000.0, 1000.0));
    }

    #[test]
    fn instant_mode_snaps() {
        let grid = Grid::new(100, 100, 32.0);
        let mut camera = Camera::new(CameraMode::default(), ScreenSize::new(640.0, 480.0));
        camera.follow(PixelPosition::new(1320.0, 1240.0), &grid);
        assert_eq!(camera.offset(), PixelPosition::new(1000.0, 1000.0));
    }
}
