//! Kids Arcade core crate.
//!
//! Four tap/click mini-games (memory, digging, boots, airplanes) feed a
//! points economy and a per-player skill profile kept in `localStorage`.
//! A parent-set screen-time countdown gates starting new rounds. Rendering
//! lives in the host page; this crate owns the rules and the state, and
//! exposes them to JS from [`web`].

use wasm_bindgen::prelude::*;

pub mod audio;
pub mod catalog;
pub mod config;
pub mod error;
pub mod games;
pub mod metrics;
pub mod points;
pub mod profile;
pub mod screen_time;
pub mod session;
pub mod storage;
pub mod web;

pub use catalog::{GameId, Goals, PRIZES, Prize};
pub use config::ArcadeConfig;
pub use error::{AudioError, SessionError, StorageError};
pub use games::{ActiveRound, RoundOutcome};
pub use metrics::{DerivedMetrics, GameMetrics, RawMetrics};
pub use points::PointsAward;
pub use profile::{GameResult, PlayerProfile, PointsEntry, RoundSummary};
pub use screen_time::{ScreenTime, Tick};
pub use session::{ArcadeSession, SessionEvent};
pub use storage::{MemoryStorage, ProfileStore, Storage};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
