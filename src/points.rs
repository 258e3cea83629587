//! Points awarded for a finished round.

use crate::metrics::{DerivedMetrics, round_half_up};

/// Breakdown of a points award, kept for the round summary overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsAward {
    pub base_points: u64,
    pub bonus: u64,
    pub earned_points: u64,
}

/// `max(1, round(score / 12))` plus a bonus of up to 5 points from the
/// concentration, accuracy and reaction metrics (missing ones count as 0).
/// Huge scores saturate at `u64::MAX` instead of wrapping.
pub fn award(score: f64, derived: &DerivedMetrics) -> PointsAward {
    let base = round_half_up(score / 12.0).max(1.0) as u64;
    let bonus = round_half_up(derived.bonus_sum() as f64 / 300.0 * 5.0) as u64;
    PointsAward {
        base_points: base,
        bonus,
        earned_points: base.saturating_add(bonus),
    }
}
