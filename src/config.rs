//! Runtime configuration, passed as optional JSON to `arcade_start`.

use serde::{Deserialize, Serialize};

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArcadeConfig {
    /// Prepended to every storage key.
    pub storage_prefix: String,
    /// How long before a seen tutorial is shown again.
    pub tutorial_cooldown_ms: u64,
    /// Delay before a mismatched memory pair turns back over.
    pub mismatch_hide_ms: u32,
    pub sound_enabled: bool,
    pub music_enabled: bool,
    /// `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    pub memory_pairs: u32,
    pub dig_width: u8,
    pub dig_height: u8,
    pub boots_prompts: u32,
    pub airplanes_total: u32,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            storage_prefix: "kidsArcade:".to_string(),
            tutorial_cooldown_ms: 7 * DAY_MS,
            mismatch_hide_ms: 900,
            sound_enabled: true,
            music_enabled: true,
            log_level: "info".to_string(),
            memory_pairs: 6,
            dig_width: 4,
            dig_height: 4,
            boots_prompts: 5,
            airplanes_total: 10,
        }
    }
}

impl ArcadeConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn log_level(&self) -> log::Level {
        self.log_level.parse().unwrap_or(log::Level::Info)
    }
}
