#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Step-counted random encounter trigger.
//!
//! After every completed step the world asks the trigger whether the landed
//! tile fires an encounter. Tiles without an encounter rate never fire, and a
//! minimum spacing measured in steps suppresses encounters that would follow
//! the previous one too closely. Randomness comes from a seeded ChaCha stream
//! so identical seeds and step sequences replay identically.

use std::sync::Arc;

use cucumber_world_core::{GridPosition, TileDefinition};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Number of steps that must separate two encounters unless configured otherwise.
pub const DEFAULT_MIN_SPACING: u32 = 3;

/// Configuration parameters required to construct the encounter trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    min_spacing: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided spacing and seed.
    #[must_use]
    pub const fn new(min_spacing: u32, rng_seed: u64) -> Self {
        Self {
            min_spacing,
            rng_seed,
        }
    }

    /// Creates a configuration using the default spacing and the provided seed.
    #[must_use]
    pub const fn seeded(rng_seed: u64) -> Self {
        Self::new(DEFAULT_MIN_SPACING, rng_seed)
    }

    /// Minimum number of steps between two encounters.
    #[must_use]
    pub const fn min_spacing(&self) -> u32 {
        self.min_spacing
    }
}

/// Encounter fired on a tile; the creature itself is chosen by an external collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct Encounter {
    /// Encounter category requested from the encounter generator.
    pub kind: String,
    /// Definition of the tile the encounter fired on.
    pub tile: Arc<TileDefinition>,
    /// Cell the player stood on when the encounter fired.
    pub cell: GridPosition,
}

/// Probabilistic encounter check with a minimum step spacing.
#[derive(Debug)]
pub struct EncounterTrigger {
    min_spacing: u32,
    rng: ChaCha8Rng,
}

impl EncounterTrigger {
    /// Creates a new trigger using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            min_spacing: config.min_spacing,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Decides whether the step that landed on `cell` fires an encounter.
    ///
    /// The caller owns the step counters and must record `step_count` as the
    /// last encounter step whenever an encounter is returned.
    pub fn maybe_fire(
        &mut self,
        cell: GridPosition,
        tile: Option<&Arc<TileDefinition>>,
        step_count: u32,
        last_encounter_step: u32,
    ) -> Option<Encounter> {
        let tile = tile?;
        let rate = tile.effective_encounter_rate()?;

        if step_count.saturating_sub(last_encounter_step) < self.min_spacing {
            return None;
        }

        let roll: f32 = self.rng.gen();
        if roll >= rate {
            return None;
        }

        tracing::debug!(
            cell = %cell,
            step_count,
            rate,
            roll,
            "encounter fired"
        );
        Some(Encounter {
            kind: tile.encounter_kind().to_owned(),
            tile: Arc::clone(tile),
            cell,
        })
    }
}

impl Default for EncounterTrigger {
    fn default() -> Self {
        Self::new(Config::seeded(0))
    }
}
