//! Player profile, round history and the points ledger.
//!
//! All mutation goes through [`PlayerProfile::record_game`] and
//! [`PlayerProfile::redeem`]. Each computes its values up front and then
//! applies them, so callers never see a half-recorded round.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::{GameId, Goals};
use crate::metrics::{DerivedMetrics, RawMetrics};
use crate::points::{self, PointsAward};

/// One finished round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameResult {
    pub game_id: GameId,
    pub score: f64,
    pub attempts: u32,
    pub timestamp: u64,
    #[serde(default)]
    pub goals: Goals,
    #[serde(default)]
    pub metrics: RawMetrics,
}

/// Points ledger line. Negative deltas are redemptions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsEntry {
    pub timestamp: u64,
    pub delta: i64,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub name: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub points: u64,
    #[serde(default)]
    pub learning_profile: BTreeMap<String, f64>,
    #[serde(default)]
    pub game_results: Vec<GameResult>,
    #[serde(default)]
    pub points_history: Vec<PointsEntry>,
    #[serde(default)]
    pub inventory: Vec<String>,
}

/// What a recorded round produced, for the summary overlay.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub game_id: GameId,
    pub score: f64,
    pub derived: DerivedMetrics,
    pub award: PointsAward,
    pub total_points: u64,
}

pub const REDEEM_PREFIX: &str = "redeem:";

impl PlayerProfile {
    pub fn new(name: impl Into<String>, age: Option<u32>) -> Self {
        Self {
            name: name.into(),
            age,
            ..Default::default()
        }
    }

    /// Empty profile for the same player.
    pub fn reset(&mut self) {
        *self = PlayerProfile::new(std::mem::take(&mut self.name), self.age);
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        self.points >= cost
    }

    /// Append a round, credit goal tags and derived metrics to the skill
    /// profile, and pay out points.
    pub fn record_game(&mut self, result: GameResult) -> RoundSummary {
        let derived = DerivedMetrics::derive(&result.metrics, result.score, result.attempts);
        let award = points::award(result.score, &derived);

        let mut credits: Vec<(String, f64)> = result
            .goals
            .tags()
            .map(|tag| (tag.to_string(), result.score))
            .collect();
        credits.extend(derived.entries().into_iter().map(|(k, v)| (k.to_string(), v as f64)));
        let entry = PointsEntry {
            timestamp: result.timestamp,
            delta: i64::try_from(award.earned_points).unwrap_or(i64::MAX),
            reason: result.game_id.as_str().to_string(),
        };
        let summary = RoundSummary {
            game_id: result.game_id,
            score: result.score,
            derived,
            award,
            total_points: self.points.saturating_add(award.earned_points),
        };

        self.game_results.push(result);
        for (tag, amount) in credits {
            *self.learning_profile.entry(tag).or_insert(0.0) += amount;
        }
        self.points_history.push(entry);
        self.points = summary.total_points;
        summary
    }

    /// Spend points on a prize. Does not check affordability; the balance
    /// clamps at zero.
    pub fn redeem(&mut self, cost: u64, label: &str, timestamp: u64) {
        self.points = self.points.saturating_sub(cost);
        self.inventory.push(label.to_string());
        self.points_history.push(PointsEntry {
            timestamp,
            delta: i64::try_from(cost).map_or(-i64::MAX, |c| -c),
            reason: format!("{REDEEM_PREFIX}{label}"),
        });
    }

    /// Highest-scoring skill tags, best first.
    pub fn top_skills(&self, n: usize) -> Vec<(&str, f64)> {
        let mut skills: Vec<(&str, f64)> = self
            .learning_profile
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        skills.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        skills.truncate(n);
        skills
    }

    pub fn rounds_played(&self, game: GameId) -> usize {
        self.game_results.iter().filter(|r| r.game_id == game).count()
    }
}
