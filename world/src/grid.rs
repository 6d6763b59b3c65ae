use std::sync::Arc;

use cucumber_world_core::{GridPosition, PixelPosition, TileDefinition, TileLookup, TileTag};

use crate::TileCatalog;

/// Dense tile layout of a single level.
///
/// Every valid cell owns exactly one slot; empty cells hold `None`. Reads
/// and writes outside the grid are ignored rather than reported.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    columns: u32,
    rows: u32,
    tile_size: f32,
    cells: Vec<Option<TileTag>>,
}

impl Grid {
    /// Creates an empty grid with the provided dimensions.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tile_size: f32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            tile_size,
            cells: vec![None; capacity],
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile in pixels.
    #[must_use]
    pub const fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Total width of the grid in pixels.
    #[must_use]
    pub fn world_width(&self) -> f32 {
        self.columns as f32 * self.tile_size
    }

    /// Total height of the grid in pixels.
    #[must_use]
    pub fn world_height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn is_valid(&self, cell: GridPosition) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Tile stored at the provided cell; `None` for empty or invalid cells.
    #[must_use]
    pub fn tile(&self, cell: GridPosition) -> Option<&TileTag> {
        self.index(cell)
            .and_then(|index| self.cells.get(index))
            .and_then(Option::as_ref)
    }

    /// Stores a tile at the provided cell. Invalid cells are ignored.
    pub fn set_tile(&mut self, cell: GridPosition, tag: Option<TileTag>) {
        if let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) {
            *slot = tag;
        }
    }

    /// Stores the provided tile in every cell.
    pub fn fill(&mut self, tag: &TileTag) {
        self.cells.fill(Some(tag.clone()));
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Cell at the middle of the grid, rounding toward the origin.
    #[must_use]
    pub const fn center_cell(&self) -> GridPosition {
        GridPosition::new(self.columns / 2, self.rows / 2)
    }

    /// Pixel position at the center of the provided cell.
    #[must_use]
    pub fn center_pixel_of(&self, cell: GridPosition) -> PixelPosition {
        let half = self.tile_size / 2.0;
        PixelPosition::new(
            cell.column() as f32 * self.tile_size + half,
            cell.row() as f32 * self.tile_size + half,
        )
    }

    /// Iterates over rows of the grid from top to bottom.
    pub fn rows_iter(&self) -> impl Iterator<Item = &[Option<TileTag>]> {
        let width = usize::try_from(self.columns).unwrap_or(0).max(1);
        self.cells.chunks(width)
    }

    fn index(&self, cell: GridPosition) -> Option<usize> {
        if self.is_valid(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Read-only view that resolves grid cells to catalog definitions.
#[derive(Clone, Copy, Debug)]
pub struct TileView<'a> {
    grid: &'a Grid,
    catalog: &'a TileCatalog,
}

impl<'a> TileView<'a> {
    /// Captures a view over the provided grid and catalog.
    #[must_use]
    pub const fn new(grid: &'a Grid, catalog: &'a TileCatalog) -> Self {
        Self { grid, catalog }
    }

    /// Grid backing the view.
    #[must_use]
    pub const fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Reports whether the player may step onto the cell.
    ///
    /// Cells outside the grid are never passable. Empty cells and tags the
    /// catalog does not know are passable.
    #[must_use]
    pub fn is_passable(&self, cell: GridPosition) -> bool {
        self.grid.is_valid(cell)
            && self
                .definition_at(cell)
                .map_or(true, |tile| tile.is_passable())
    }
}

impl TileLookup for TileView<'_> {
    fn definition_at(&self, cell: GridPosition) -> Option<&Arc<TileDefinition>> {
        self.grid
            .tile(cell)
            .and_then(|tag| self.catalog.lookup(tag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_valid_matches_bounds_formula() {
        let grid = Grid::new(7, 4, 32.0);
        for row in 0..10 {
            for column in 0..10 {
                let expected = column < 7 && row < 4;
                assert_eq!(grid.is_valid(GridPosition::new(column, row)), expected);
            }
        }
    }

    #[test]
    fn out_of_bounds_access_is_ignored() {
        let mut grid = Grid::new(3, 3, 16.0);
        let outside = GridPosition::new(3, 0);
        let far_outside = GridPosition::new(u32::MAX, u32::MAX);

        grid.set_tile(outside, Some(TileTag::new("tree")));
        grid.set_tile(far_outside, Some(TileTag::new("tree")));

        assert_eq!(grid.tile(outside), None);
        assert_eq!(grid.tile(far_outside), None);
        assert!(grid.rows_iter().flatten().all(Option::is_none));
    }

    #[test]
    fn set_tile_addresses_row_major_index() {
        let mut grid = Grid::new(4, 3, 16.0);
        grid.set_tile(GridPosition::new(1, 2), Some(TileTag::new("bush")));

        let rows: Vec<_> = grid.rows_iter().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2][1], Some(TileTag::new("bush")));
        assert_eq!(grid.tile(GridPosition::new(2, 1)), None);
    }

    #[test]
    fn fill_and_clear_touch_every_cell() {
        let mut grid = Grid::new(5, 2, 16.0);
        let grass = TileTag::new("grass");
        grid.fill(&grass);
        assert!(grid.rows_iter().flatten().all(|cell| cell.as_ref() == Some(&grass)));

        grid.clear();
        assert!(grid.rows_iter().flatten().all(Option::is_none));
    }

    #[test]
    fn center_pixel_sits_in_the_middle_of_the_tile() {
        let grid = Grid::new(10, 10, 32.0);
        assert_eq!(
            grid.center_pixel_of(GridPosition::new(5, 4)),
            PixelPosition::new(176.0, 144.0)
        );
        assert_eq!(grid.center_cell(), GridPosition::new(5, 5));
    }

    #[test]
    fn unknown_and_empty_tiles_are_passable() {
        let mut grid = Grid::new(3, 1, 32.0);
        grid.set_tile(GridPosition::new(1, 0), Some(TileTag::new("mystery")));
        grid.set_tile(GridPosition::new(2, 0), Some(TileTag::new("tree")));
        let catalog = TileCatalog::fallback();
        let view = TileView::new(&grid, &catalog);

        assert!(view.is_passable(GridPosition::new(0, 0)));
        assert!(view.is_passable(GridPosition::new(1, 0)));
        assert!(!view.is_passable(GridPosition::new(2, 0)));
        assert!(!view.is_passable(GridPosition::new(3, 0)));
    }
}
