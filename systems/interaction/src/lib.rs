#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Resolves which tile an interaction applies to.

use std::sync::Arc;

use cucumber_world_core::{Direction, GridPosition, TileDefinition, TileLookup};

/// Orthogonal neighbours are checked in this order when the player's own tile
/// is not interactive.
const PROBE_ORDER: [Direction; 4] = Direction::ALL;

/// Tile an interaction resolved to.
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionTarget {
    /// Definition of the resolved tile.
    pub tile: Arc<TileDefinition>,
    /// Cell holding the resolved tile.
    pub cell: GridPosition,
}

/// Pure resolver for explicit and automatic tile interactions.
#[derive(Clone, Copy, Debug, Default)]
pub struct InteractionResolver;

impl InteractionResolver {
    /// Resolves the target of an explicit interact intent.
    ///
    /// The tile under the player takes priority. Otherwise the first
    /// interactive neighbour in up, down, left, right order wins.
    #[must_use]
    pub fn resolve<L>(&self, cell: GridPosition, lookup: &L) -> Option<InteractionTarget>
    where
        L: TileLookup + ?Sized,
    {
        if let Some(target) = target_if(cell, lookup, |tile| tile.interactive) {
            return Some(target);
        }

        PROBE_ORDER
            .iter()
            .filter_map(|direction| cell.step(*direction))
            .find_map(|neighbor| target_if(neighbor, lookup, |tile| tile.interactive))
    }

    /// Resolves the auto-triggered tile under the player after a completed step.
    #[must_use]
    pub fn resolve_auto_trigger<L>(
        &self,
        cell: GridPosition,
        lookup: &L,
    ) -> Option<InteractionTarget>
    where
        L: TileLookup + ?Sized,
    {
        target_if(cell, lookup, |tile| tile.auto_trigger)
    }
}

fn target_if<L, F>(cell: GridPosition, lookup: &L, predicate: F) -> Option<InteractionTarget>
where
    L: TileLookup + ?Sized,
    F: Fn(&TileDefinition) -> bool,
{
    let tile = lookup.definition_at(cell)?;
    if predicate(tile) {
        Some(InteractionTarget {
            tile: Arc::clone(tile),
            cell,
        })
    } else {
        None
    }
}
