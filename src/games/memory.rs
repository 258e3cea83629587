// Memory Match: flip two cards, keep them if they match.
use super::{Lcg, RoundOutcome};
use crate::catalog::GameId;
use crate::metrics::{GameMetrics, round_half_up};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Card {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipResult {
    /// Out of range, already face up, or a mismatch is still showing.
    Ignored,
    Revealed,
    Matched,
    /// Both cards stay up until `hide_mismatch()`.
    Mismatch,
    Finished,
}

pub struct MemoryRound {
    faces: Vec<u8>,
    cards: Vec<Card>,
    first: Option<(usize, u64)>,
    mismatch: Option<(usize, usize)>,
    pairs: u32,
    matched: u32,
    attempts: u32,
    hold_ms_total: u64,
}

impl MemoryRound {
    pub fn new(pairs: u32, rng: &mut Lcg) -> Self {
        let pairs = pairs.clamp(1, u8::MAX as u32);
        let mut faces: Vec<u8> = (0..pairs as u8).flat_map(|f| [f, f]).collect();
        rng.shuffle(&mut faces);
        let cards = vec![Card::Hidden; faces.len()];
        Self {
            faces,
            cards,
            first: None,
            mismatch: None,
            pairs,
            matched: 0,
            attempts: 0,
            hold_ms_total: 0,
        }
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Face id if the card is currently showing.
    pub fn visible_face(&self, idx: usize) -> Option<u8> {
        match self.cards.get(idx)? {
            Card::Hidden => None,
            _ => Some(self.faces[idx]),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.matched == self.pairs
    }

    pub fn has_pending_mismatch(&self) -> bool {
        self.mismatch.is_some()
    }

    pub fn flip(&mut self, idx: usize, now_ms: u64) -> FlipResult {
        if self.is_finished() || self.mismatch.is_some() {
            return FlipResult::Ignored;
        }
        if self.cards.get(idx) != Some(&Card::Hidden) {
            return FlipResult::Ignored;
        }
        self.cards[idx] = Card::Revealed;
        let Some((first, flipped_at)) = self.first.take() else {
            self.first = Some((idx, now_ms));
            return FlipResult::Revealed;
        };
        self.attempts += 1;
        self.hold_ms_total += now_ms.saturating_sub(flipped_at);
        if self.faces[first] == self.faces[idx] {
            self.cards[first] = Card::Matched;
            self.cards[idx] = Card::Matched;
            self.matched += 1;
            if self.is_finished() {
                FlipResult::Finished
            } else {
                FlipResult::Matched
            }
        } else {
            self.mismatch = Some((first, idx));
            FlipResult::Mismatch
        }
    }

    /// Turn a mismatched pair back over (host timer fired).
    pub fn hide_mismatch(&mut self) {
        if let Some((a, b)) = self.mismatch.take() {
            self.cards[a] = Card::Hidden;
            self.cards[b] = Card::Hidden;
        }
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        if !self.is_finished() {
            return None;
        }
        let attempts = self.attempts.max(1);
        let score = round_half_up(self.pairs as f64 / attempts as f64 * 100.0).min(100.0);
        let avg_hold_time = self.hold_ms_total as f64 / attempts as f64 / 1000.0;
        Some(RoundOutcome {
            game: GameId::Memory,
            score,
            attempts,
            metrics: GameMetrics::Memory { avg_hold_time },
        })
    }
}
