//! Mini-game round models.
//!
//! Each game is a small state machine driven by taps from the host page. None
//! of them render anything or own timers: the host shows cards / cells /
//! icons from the exposed state and calls back in (e.g. `hide_mismatch()`
//! after its one-shot delay). When a round finishes it yields a
//! [`RoundOutcome`] that the session turns into points and profile credit.

mod airplanes;
mod boots;
mod digging;
mod memory;

pub use airplanes::{AirplanesRound, TapResult};
pub use boots::{BootColor, BootsRound, PickResult};
pub use digging::{DigResult, DiggingRound};
pub use memory::{FlipResult, MemoryRound};

use crate::catalog::GameId;
use crate::config::ArcadeConfig;
use crate::metrics::GameMetrics;

/// What a finished round reports.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundOutcome {
    pub game: GameId,
    pub score: f64,
    pub attempts: u32,
    pub metrics: GameMetrics,
}

/// The round currently being played.
pub enum ActiveRound {
    Memory(MemoryRound),
    Digging(DiggingRound),
    Boots(BootsRound),
    Airplanes(AirplanesRound),
}

impl ActiveRound {
    /// Fresh round sized from the config.
    pub fn new(game: GameId, config: &ArcadeConfig, seed: u64) -> Self {
        let mut rng = Lcg::new(seed);
        match game {
            GameId::Memory => ActiveRound::Memory(MemoryRound::new(config.memory_pairs, &mut rng)),
            GameId::Digging => ActiveRound::Digging(DiggingRound::new(config.dig_width, config.dig_height, &mut rng)),
            GameId::Boots => ActiveRound::Boots(BootsRound::new(config.boots_prompts, &mut rng)),
            GameId::Airplanes => ActiveRound::Airplanes(AirplanesRound::new(config.airplanes_total)),
        }
    }

    pub fn game(&self) -> GameId {
        match self {
            ActiveRound::Memory(_) => GameId::Memory,
            ActiveRound::Digging(_) => GameId::Digging,
            ActiveRound::Boots(_) => GameId::Boots,
            ActiveRound::Airplanes(_) => GameId::Airplanes,
        }
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        match self {
            ActiveRound::Memory(r) => r.outcome(),
            ActiveRound::Digging(r) => r.outcome(),
            ActiveRound::Boots(r) => r.outcome(),
            ActiveRound::Airplanes(r) => r.outcome(),
        }
    }
}

/// Tiny linear congruential generator for shuffles (not crypto secure).
#[derive(Clone, Debug)]
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    pub fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.next_u32() as usize % len
    }

    /// Fisher–Yates.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}
