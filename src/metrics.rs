//! Raw per-game metrics and the derived-metrics calculator.
//!
//! Games report a closed [`GameMetrics`] value. It is flattened into a
//! [`RawMetrics`] bag for storage (camelCase keys, absent values omitted) and
//! the calculator normalises the bag into bounded 0–100 [`DerivedMetrics`].

use serde::{Deserialize, Serialize};

/// Typed metrics emitted by each mini-game at the end of a round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameMetrics {
    /// Mean seconds a first card was held open before the second flip.
    Memory { avg_hold_time: f64 },
    /// Number of cells dug before the treasure turned up.
    Digging { persistence: f64 },
    /// Percentage of colour picks that were right.
    Boots { accuracy: f64 },
    /// Tap reaction score, and an optional focus score from the host.
    Airplanes {
        reaction_score: Option<f64>,
        concentration: Option<f64>,
    },
    /// Round ended without any game-specific measurement.
    Empty,
}

/// Flat metrics bag as persisted in a game result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_hold_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistence: Option<f64>,
}

impl RawMetrics {
    pub fn is_empty(&self) -> bool {
        *self == RawMetrics::default()
    }

    /// Name of the first reported value that is NaN or infinite.
    pub fn non_finite(&self) -> Option<&'static str> {
        [
            ("avgHoldTime", self.avg_hold_time),
            ("concentration", self.concentration),
            ("accuracy", self.accuracy),
            ("reactionScore", self.reaction_score),
            ("persistence", self.persistence),
        ]
        .into_iter()
        .find(|(_, v)| v.is_some_and(|v| !v.is_finite()))
        .map(|(name, _)| name)
    }
}

impl From<GameMetrics> for RawMetrics {
    fn from(m: GameMetrics) -> Self {
        match m {
            GameMetrics::Memory { avg_hold_time } => RawMetrics {
                avg_hold_time: Some(avg_hold_time),
                ..Default::default()
            },
            GameMetrics::Digging { persistence } => RawMetrics {
                persistence: Some(persistence),
                ..Default::default()
            },
            GameMetrics::Boots { accuracy } => RawMetrics {
                accuracy: Some(accuracy),
                ..Default::default()
            },
            GameMetrics::Airplanes {
                reaction_score,
                concentration,
            } => RawMetrics {
                reaction_score,
                concentration,
                ..Default::default()
            },
            GameMetrics::Empty => RawMetrics::default(),
        }
    }
}

/// Normalised 0–100 skill values. `accuracy` and `reaction_score` always have a
/// fallback; `concentration` and `persistence` are only present when the round
/// measured them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concentration: Option<u32>,
    pub accuracy: u32,
    pub reaction_score: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistence: Option<u32>,
}

impl DerivedMetrics {
    /// First matching rule wins for each metric.
    pub fn derive(raw: &RawMetrics, score: f64, attempts: u32) -> Self {
        let concentration = match (raw.avg_hold_time, raw.concentration) {
            (Some(hold), _) => Some(percent(hold / 3.0 * 100.0)),
            (None, Some(c)) => Some(percent(c)),
            (None, None) => None,
        };
        let accuracy = match raw.accuracy {
            Some(a) => percent(a),
            None => {
                let attempts = attempts.max(1) as f64;
                percent(score / 100.0 * 100.0 * (1.0 / attempts) * 1.5)
            }
        };
        let reaction_score = match raw.reaction_score {
            Some(r) => percent(r),
            None => percent(score * 0.9),
        };
        let persistence = raw.persistence.map(|p| percent(100.0 - (p - 1.0) * 12.0));
        Self {
            concentration,
            accuracy,
            reaction_score,
            persistence,
        }
    }

    /// Present metrics keyed by their profile name.
    pub fn entries(&self) -> Vec<(&'static str, u32)> {
        let mut out = Vec::with_capacity(4);
        if let Some(c) = self.concentration {
            out.push(("concentration", c));
        }
        out.push(("accuracy", self.accuracy));
        out.push(("reactionScore", self.reaction_score));
        if let Some(p) = self.persistence {
            out.push(("persistence", p));
        }
        out
    }

    /// Sum used by the points bonus. Persistence is deliberately left out.
    pub fn bonus_sum(&self) -> u32 {
        self.concentration.unwrap_or(0) + self.accuracy + self.reaction_score
    }
}

/// Browser-style `Math.round`: halves round toward +∞.
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

fn percent(x: f64) -> u32 {
    // NaN saturates to 0 on the cast.
    round_half_up(x).clamp(0.0, 100.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_metrics_uses_score_fallbacks() {
        let d = DerivedMetrics::derive(&RawMetrics::default(), 80.0, 5);
        assert_eq!(d.accuracy, 24);
        assert_eq!(d.reaction_score, 72);
        assert_eq!(d.concentration, None);
        assert_eq!(d.persistence, None);
    }

    #[test]
    fn test_fallbacks_across_scores_and_attempts() {
        for score in [0.0, 12.5, 33.0, 50.0, 99.0, 100.0, 130.0] {
            for attempts in [0u32, 1, 2, 3, 7] {
                let d = DerivedMetrics::derive(&RawMetrics::default(), score, attempts);
                let acc = (score / 100.0 * 100.0 * (1.0 / attempts.max(1) as f64) * 1.5 + 0.5)
                    .floor()
                    .min(100.0) as u32;
                let react = (score * 0.9 + 0.5).floor().min(100.0) as u32;
                assert_eq!(d.accuracy, acc, "score={score} attempts={attempts}");
                assert_eq!(d.reaction_score, react, "score={score}");
            }
        }
    }

    #[test]
    fn test_hold_time_beats_concentration_source() {
        let raw = RawMetrics {
            avg_hold_time: Some(2.1),
            concentration: Some(10.0),
            ..Default::default()
        };
        assert_eq!(DerivedMetrics::derive(&raw, 80.0, 5).concentration, Some(70));

        let raw = RawMetrics {
            concentration: Some(42.4),
            ..Default::default()
        };
        assert_eq!(DerivedMetrics::derive(&raw, 80.0, 5).concentration, Some(42));
    }

    #[test]
    fn test_long_hold_caps_at_100() {
        let raw: RawMetrics = GameMetrics::Memory { avg_hold_time: 9.0 }.into();
        assert_eq!(DerivedMetrics::derive(&raw, 10.0, 1).concentration, Some(100));
    }

    #[test]
    fn test_persistence_curve() {
        let p = |n: f64| {
            let raw: RawMetrics = GameMetrics::Digging { persistence: n }.into();
            DerivedMetrics::derive(&raw, 50.0, 1).persistence
        };
        assert_eq!(p(1.0), Some(100));
        assert_eq!(p(2.0), Some(88));
        assert_eq!(p(5.0), Some(52));
        assert_eq!(p(9.0), Some(4));
        assert_eq!(p(20.0), Some(0));
    }

    #[test]
    fn test_reported_values_are_clamped() {
        let raw = RawMetrics {
            accuracy: Some(140.0),
            reaction_score: Some(-3.0),
            ..Default::default()
        };
        let d = DerivedMetrics::derive(&raw, 50.0, 1);
        assert_eq!(d.accuracy, 100);
        assert_eq!(d.reaction_score, 0);
    }

    #[test]
    fn test_half_rounds_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(6.4), 6.0);
    }

    #[test]
    fn test_raw_bag_json_shape() {
        let raw: RawMetrics = GameMetrics::Memory { avg_hold_time: 2.1 }.into();
        assert_eq!(serde_json::to_string(&raw).unwrap(), r#"{"avgHoldTime":2.1}"#);
        let parsed: RawMetrics = serde_json::from_str(r#"{"reactionScore":55}"#).unwrap();
        assert_eq!(parsed.reaction_score, Some(55.0));
        assert!(RawMetrics::from(GameMetrics::Empty).is_empty());
    }

    #[test]
    fn test_non_finite_values_are_named() {
        assert_eq!(RawMetrics::default().non_finite(), None);
        let raw = RawMetrics {
            accuracy: Some(50.0),
            reaction_score: Some(f64::INFINITY),
            persistence: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(raw.non_finite(), Some("reactionScore"));
    }
}
