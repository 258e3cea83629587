// Paper Airplanes: tap falling planes before they land.
use super::RoundOutcome;
use crate::catalog::GameId;
use crate::metrics::{GameMetrics, round_half_up};

/// Reaction time that still earns a full reaction score.
const FAST_TAP_MS: f64 = 400.0;
/// Each this-many ms slower than `FAST_TAP_MS` costs one point.
const MS_PER_POINT: f64 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapResult {
    Ignored,
    Hit,
    Miss,
    Finished,
}

pub struct AirplanesRound {
    total: u32,
    spawned: u32,
    live: Vec<(u32, u64)>,
    hits: u32,
    taps: u32,
    reaction_ms_total: u64,
}

impl AirplanesRound {
    pub fn new(total: u32) -> Self {
        Self {
            total: total.max(1),
            spawned: 0,
            live: Vec::new(),
            hits: 0,
            taps: 0,
            reaction_ms_total: 0,
        }
    }

    /// Launch the next plane; `None` once all planes have flown.
    pub fn spawn(&mut self, now_ms: u64) -> Option<u32> {
        if self.spawned >= self.total {
            return None;
        }
        let id = self.spawned;
        self.spawned += 1;
        self.live.push((id, now_ms));
        Some(id)
    }

    pub fn live_planes(&self) -> impl Iterator<Item = u32> + '_ {
        self.live.iter().map(|(id, _)| *id)
    }

    pub fn is_finished(&self) -> bool {
        self.spawned >= self.total && self.live.is_empty()
    }

    /// `plane` is what the tap landed on, `None` for empty sky.
    pub fn tap(&mut self, plane: Option<u32>, now_ms: u64) -> TapResult {
        if self.is_finished() {
            return TapResult::Ignored;
        }
        self.taps += 1;
        let Some(pos) = plane.and_then(|id| self.live.iter().position(|(p, _)| *p == id)) else {
            return TapResult::Miss;
        };
        let (_, spawned_at) = self.live.swap_remove(pos);
        self.hits += 1;
        self.reaction_ms_total += now_ms.saturating_sub(spawned_at);
        if self.is_finished() {
            TapResult::Finished
        } else {
            TapResult::Hit
        }
    }

    /// Plane left the screen untouched. Returns true if that ended the round.
    pub fn expire(&mut self, plane: u32) -> bool {
        let before = self.live.len();
        self.live.retain(|(p, _)| *p != plane);
        before != self.live.len() && self.is_finished()
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        if !self.is_finished() {
            return None;
        }
        let score = round_half_up(self.hits as f64 / self.total as f64 * 100.0);
        let reaction_score = (self.hits > 0).then(|| {
            let mean = self.reaction_ms_total as f64 / self.hits as f64;
            round_half_up(100.0 - (mean - FAST_TAP_MS) / MS_PER_POINT).clamp(0.0, 100.0)
        });
        Some(RoundOutcome {
            game: GameId::Airplanes,
            score,
            attempts: self.taps.max(1),
            metrics: GameMetrics::Airplanes {
                reaction_score,
                concentration: None,
            },
        })
    }
}
