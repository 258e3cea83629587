// Treasure Dig: tap cells until the hidden treasure turns up.
use super::{Lcg, RoundOutcome};
use crate::catalog::GameId;
use crate::metrics::GameMetrics;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DigResult {
    Ignored,
    Empty,
    Found,
}

pub struct DiggingRound {
    width: u8,
    height: u8,
    treasure: usize,
    dug: Vec<bool>,
    attempts: u32,
    found: bool,
}

impl DiggingRound {
    pub fn new(width: u8, height: u8, rng: &mut Lcg) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let cells = width as usize * height as usize;
        Self {
            width,
            height,
            treasure: rng.index(cells),
            dug: vec![false; cells],
            attempts: 0,
            found: false,
        }
    }

    pub fn size(&self) -> (u8, u8) {
        (self.width, self.height)
    }

    pub fn is_dug(&self, x: u8, y: u8) -> bool {
        self.cell(x, y).map(|i| self.dug[i]).unwrap_or(false)
    }

    pub fn is_finished(&self) -> bool {
        self.found
    }

    fn cell(&self, x: u8, y: u8) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn dig(&mut self, x: u8, y: u8) -> DigResult {
        if self.found {
            return DigResult::Ignored;
        }
        let Some(idx) = self.cell(x, y) else {
            return DigResult::Ignored;
        };
        if self.dug[idx] {
            return DigResult::Ignored;
        }
        self.dug[idx] = true;
        self.attempts += 1;
        if idx == self.treasure {
            self.found = true;
            DigResult::Found
        } else {
            DigResult::Empty
        }
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        if !self.found {
            return None;
        }
        let score = (100.0 - (self.attempts as f64 - 1.0) * 10.0).max(10.0);
        Some(RoundOutcome {
            game: GameId::Digging,
            score,
            attempts: self.attempts,
            metrics: GameMetrics::Digging {
                persistence: self.attempts as f64,
            },
        })
    }
}
