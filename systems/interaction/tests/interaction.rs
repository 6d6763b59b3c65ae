use std::{collections::HashMap, sync::Arc};

use cucumber_world_core::{GridPosition, TileDefinition, TileLookup};
use cucumber_world_system_interaction::InteractionResolver;

#[derive(Default)]
struct SparseTiles {
    cells: HashMap<GridPosition, Arc<TileDefinition>>,
}

impl SparseTiles {
    fn place(&mut self, cell: GridPosition, tile: TileDefinition) {
        let _ = self.cells.insert(cell, Arc::new(tile));
    }
}

impl TileLookup for SparseTiles {
    fn definition_at(&self, cell: GridPosition) -> Option<&Arc<TileDefinition>> {
        self.cells.get(&cell)
    }
}

fn interactive(name: &str) -> TileDefinition {
    TileDefinition {
        name: Some(name.to_owned()),
        interactive: true,
        ..TileDefinition::default()
    }
}

#[test]
fn own_tile_takes_priority_over_neighbours() {
    let mut tiles = SparseTiles::default();
    tiles.place(GridPosition::new(2, 2), interactive("sign"));
    tiles.place(GridPosition::new(2, 1), interactive("bush"));

    let target = InteractionResolver
        .resolve(GridPosition::new(2, 2), &tiles)
        .expect("own tile resolves");

    assert_eq!(target.cell, GridPosition::new(2, 2));
    assert_eq!(target.tile.name.as_deref(), Some("sign"));
}

#[test]
fn up_wins_over_right() {
    let mut tiles = SparseTiles::default();
    tiles.place(GridPosition::new(3, 2), interactive("up"));
    tiles.place(GridPosition::new(4, 3), interactive("right"));

    let target = InteractionResolver
        .resolve(GridPosition::new(3, 3), &tiles)
        .expect("neighbour resolves");

    assert_eq!(target.cell, GridPosition::new(3, 2));
}

#[test]
fn neighbours_are_checked_up_down_left_right() {
    let center = GridPosition::new(3, 3);
    let down = GridPosition::new(3, 4);
    let left = GridPosition::new(2, 3);
    let right = GridPosition::new(4, 3);

    let mut tiles = SparseTiles::default();
    tiles.place(right, interactive("right"));
    tiles.place(left, interactive("left"));
    tiles.place(down, interactive("down"));
    assert_eq!(InteractionResolver.resolve(center, &tiles).map(|t| t.cell), Some(down));

    let _ = tiles.cells.remove(&down);
    assert_eq!(InteractionResolver.resolve(center, &tiles).map(|t| t.cell), Some(left));

    let _ = tiles.cells.remove(&left);
    assert_eq!(InteractionResolver.resolve(center, &tiles).map(|t| t.cell), Some(right));
}

#[test]
fn non_interactive_tiles_are_skipped() {
    let mut tiles = SparseTiles::default();
    tiles.place(GridPosition::new(1, 0), TileDefinition::default());
    tiles.place(GridPosition::new(1, 1), TileDefinition::default());

    assert!(InteractionResolver
        .resolve(GridPosition::new(1, 1), &tiles)
        .is_none());
}

#[test]
fn corner_cells_skip_neighbours_past_the_origin() {
    let mut tiles = SparseTiles::default();
    tiles.place(GridPosition::new(1, 0), interactive("right"));

    let target = InteractionResolver
        .resolve(GridPosition::new(0, 0), &tiles)
        .expect("right neighbour resolves");

    assert_eq!(target.cell, GridPosition::new(1, 0));
}

#[test]
fn auto_trigger_only_inspects_own_tile() {
    let mut tiles = SparseTiles::default();
    let healing = TileDefinition {
        auto_trigger: true,
        healing: true,
        ..TileDefinition::default()
    };
    tiles.place(GridPosition::new(5, 4), healing);
    tiles.place(GridPosition::new(5, 5), interactive("sign"));

    assert!(InteractionResolver
        .resolve_auto_trigger(GridPosition::new(5, 5), &tiles)
        .is_none());
    let target = InteractionResolver
        .resolve_auto_trigger(GridPosition::new(5, 4), &tiles)
        .expect("auto-trigger tile resolves");
    assert!(target.tile.healing);
}
