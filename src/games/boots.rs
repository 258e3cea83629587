// Rain Boots: tap the boots whose colour was called out.
use serde::{Deserialize, Serialize};

use super::{Lcg, RoundOutcome};
use crate::catalog::GameId;
use crate::metrics::{GameMetrics, round_half_up};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootColor {
    Red,
    Blue,
    Yellow,
    Green,
}

impl BootColor {
    pub const ALL: [BootColor; 4] = [BootColor::Red, BootColor::Blue, BootColor::Yellow, BootColor::Green];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickResult {
    Ignored,
    Wrong,
    Correct,
    Finished,
}

pub struct BootsRound {
    targets: Vec<BootColor>,
    current: usize,
    picks: u32,
}

impl BootsRound {
    pub fn new(prompts: u32, rng: &mut Lcg) -> Self {
        let targets = (0..prompts.max(1))
            .map(|_| BootColor::ALL[rng.index(BootColor::ALL.len())])
            .collect();
        Self {
            targets,
            current: 0,
            picks: 0,
        }
    }

    /// Colour to call out next, `None` once the round is over.
    pub fn target(&self) -> Option<BootColor> {
        self.targets.get(self.current).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.current >= self.targets.len()
    }

    pub fn pick(&mut self, color: BootColor) -> PickResult {
        let Some(target) = self.target() else {
            return PickResult::Ignored;
        };
        self.picks += 1;
        if color != target {
            return PickResult::Wrong;
        }
        self.current += 1;
        if self.is_finished() {
            PickResult::Finished
        } else {
            PickResult::Correct
        }
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        if !self.is_finished() {
            return None;
        }
        let attempts = self.picks.max(1);
        let accuracy = round_half_up(self.targets.len() as f64 / attempts as f64 * 100.0);
        Some(RoundOutcome {
            game: GameId::Boots,
            score: accuracy,
            attempts,
            metrics: GameMetrics::Boots { accuracy },
        })
    }
}
