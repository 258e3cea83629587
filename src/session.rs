//! Session controller.
//!
//! `ArcadeSession` owns everything that would otherwise be page-global: the
//! active profile, the screen-time countdown, the storage and audio handles
//! and the event listeners. The host drives it with plain method calls and
//! receives [`SessionEvent`]s through subscribed callbacks.

use serde::Serialize;

use crate::audio::{AudioSink, MusicTrack, SoundCue};
use crate::catalog::{self, GameId, Goals};
use crate::config::ArcadeConfig;
use crate::error::SessionError;
use crate::games::{ActiveRound, RoundOutcome};
use crate::metrics::RawMetrics;
use crate::profile::{GameResult, PlayerProfile, RoundSummary};
use crate::screen_time::{ScreenTime, Tick};
use crate::storage::{ProfileStore, Storage};

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    PlayerChanged { name: String, returning: bool },
    PointsEarned { game: GameId, points: u64, total: u64 },
    PrizeRedeemed { label: String, cost: u64, total: u64 },
    ScreenTimeExpired,
    ShopRequested,
    /// Text for the page's screen-reader live region.
    Announce { text: String },
}

pub type Listener = Box<dyn FnMut(&SessionEvent)>;

pub struct ArcadeSession<S: Storage, A: AudioSink> {
    config: ArcadeConfig,
    store: ProfileStore<S>,
    audio: A,
    profile: Option<PlayerProfile>,
    screen_time: ScreenTime,
    round: Option<ActiveRound>,
    running: bool,
    listeners: Vec<Listener>,
}

impl<S: Storage, A: AudioSink> ArcadeSession<S, A> {
    pub fn new(config: ArcadeConfig, backend: S, audio: A) -> Self {
        let store = ProfileStore::new(backend, config.storage_prefix.clone(), config.tutorial_cooldown_ms);
        Self {
            config,
            store,
            audio,
            profile: None,
            screen_time: ScreenTime::default(),
            round: None,
            running: false,
            listeners: Vec::new(),
        }
    }

    // --- Lifecycle ------------------------------------------------------------

    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.music(MusicTrack::Lobby);
        log::info!("arcade session started");
    }

    /// Silence audio and drop any round in progress.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.audio.stop_music();
        self.round = None;
        log::info!("arcade session stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.listeners.push(listener);
    }

    // --- Accessors ------------------------------------------------------------

    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    pub fn profile(&self) -> Option<&PlayerProfile> {
        self.profile.as_ref()
    }

    pub fn store(&self) -> &ProfileStore<S> {
        &self.store
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn screen_time(&self) -> &ScreenTime {
        &self.screen_time
    }

    pub fn round(&self) -> Option<&ActiveRound> {
        self.round.as_ref()
    }

    pub fn round_mut(&mut self) -> Option<&mut ActiveRound> {
        self.round.as_mut()
    }

    // --- Players --------------------------------------------------------------

    /// Name to greet with "welcome back", if someone played before.
    pub fn welcome_back(&self) -> Option<String> {
        self.store.last_player()
    }

    /// Switch to `name`. The stored profile is resumed when it belongs to the
    /// same name; otherwise a fresh profile replaces it.
    pub fn start_player(&mut self, name: &str, age: Option<u32>) -> &PlayerProfile {
        let name = name.trim();
        let stored = self.store.load_profile().filter(|p| p.name == name);
        let returning = stored.is_some();
        let mut profile = stored.unwrap_or_else(|| PlayerProfile::new(name, age));
        if age.is_some() {
            profile.age = age;
        }
        log::info!("player '{}' selected (returning: {returning})", profile.name);
        self.round = None;
        self.store.set_last_player(&profile.name);
        self.store.save_profile(&profile);
        let text = if returning {
            format!("Welcome back, {}!", profile.name)
        } else {
            format!("Hello, {}!", profile.name)
        };
        self.emit(SessionEvent::PlayerChanged {
            name: profile.name.clone(),
            returning,
        });
        self.emit(SessionEvent::Announce { text });
        self.profile.insert(profile)
    }

    /// "Not me" on the welcome-back prompt: drop the stored player entirely.
    pub fn forget_player(&mut self) {
        self.store.forget_player();
        self.profile = None;
        self.round = None;
        log::info!("stored player forgotten");
    }

    /// Wipe progress but keep the player's name and age.
    pub fn reset_profile(&mut self) -> Result<(), SessionError> {
        let profile = self.profile.as_mut().ok_or(SessionError::NoPlayer)?;
        profile.reset();
        log::info!("profile for '{}' reset", profile.name);
        self.persist();
        Ok(())
    }

    // --- Rounds ---------------------------------------------------------------

    pub fn can_play(&self) -> bool {
        self.screen_time.can_play()
    }

    /// Start a new round. Refused once screen time has run out.
    pub fn begin_round(&mut self, game: GameId, seed: u64) -> Result<&mut ActiveRound, SessionError> {
        if self.profile.is_none() {
            return Err(SessionError::NoPlayer);
        }
        if !self.can_play() {
            self.play(SoundCue::Failure);
            return Err(SessionError::ScreenTimeExpired);
        }
        log::debug!("round of {game} started");
        self.play(SoundCue::Tap);
        self.music(MusicTrack::Playful);
        Ok(self.round.insert(ActiveRound::new(game, &self.config, seed)))
    }

    /// Record the active round if it has finished. Not gated by screen time:
    /// a round that was already running may always finish.
    pub fn finish_round(&mut self, now_ms: u64) -> Result<Option<RoundSummary>, SessionError> {
        let Some(outcome) = self.round.as_ref().and_then(ActiveRound::outcome) else {
            return Ok(None);
        };
        let summary = self.complete_round(outcome, now_ms)?;
        self.round = None;
        Ok(Some(summary))
    }

    pub fn complete_round(&mut self, outcome: RoundOutcome, now_ms: u64) -> Result<RoundSummary, SessionError> {
        self.record_result(outcome.game, outcome.score, outcome.attempts, outcome.metrics.into(), now_ms)
    }

    /// Credit a finished round reported by the host. NaN or infinite values
    /// are refused, since they cannot be stored and read back.
    pub fn record_result(
        &mut self,
        game: GameId,
        score: f64,
        attempts: u32,
        metrics: RawMetrics,
        now_ms: u64,
    ) -> Result<RoundSummary, SessionError> {
        let profile = self.profile.as_mut().ok_or(SessionError::NoPlayer)?;
        if !score.is_finite() {
            return Err(SessionError::NonFinite("score"));
        }
        if let Some(field) = metrics.non_finite() {
            return Err(SessionError::NonFinite(field));
        }
        let result = GameResult {
            game_id: game,
            score,
            attempts: attempts.max(1),
            timestamp: now_ms,
            goals: Goals::from(&game.entry().goals),
            metrics,
        };
        let summary = profile.record_game(result);
        log::info!(
            "{game}: score {score}, +{} points (total {})",
            summary.award.earned_points,
            summary.total_points
        );
        if self.round.as_ref().is_some_and(|r| r.game() == game && r.outcome().is_some()) {
            self.round = None;
            self.music(MusicTrack::Lobby);
        }
        self.persist();
        self.play(SoundCue::Success);
        self.emit(SessionEvent::PointsEarned {
            game,
            points: summary.award.earned_points,
            total: summary.total_points,
        });
        self.emit(SessionEvent::Announce {
            text: format!(
                "{} done! You earned {} stars.",
                game.entry().title,
                summary.award.earned_points
            ),
        });
        Ok(summary)
    }

    // --- Prize shop -----------------------------------------------------------

    pub fn open_shop(&mut self) {
        self.emit(SessionEvent::ShopRequested);
    }

    pub fn can_afford(&self, prize_id: &str) -> Result<bool, SessionError> {
        let prize = catalog::find_prize(prize_id)?;
        let profile = self.profile.as_ref().ok_or(SessionError::NoPlayer)?;
        Ok(profile.can_afford(prize.cost))
    }

    /// Buy a catalog prize, refusing when the player cannot afford it.
    pub fn redeem_prize(&mut self, prize_id: &str, now_ms: u64) -> Result<u64, SessionError> {
        let prize = catalog::find_prize(prize_id)?;
        let profile = self.profile.as_ref().ok_or(SessionError::NoPlayer)?;
        if !profile.can_afford(prize.cost) {
            return Err(SessionError::InsufficientPoints {
                needed: prize.cost,
                available: profile.points,
            });
        }
        self.redeem(prize.cost, prize.label, now_ms)
    }

    /// Spend points without an affordability check; the balance clamps at 0.
    pub fn redeem(&mut self, cost: u64, label: &str, now_ms: u64) -> Result<u64, SessionError> {
        let profile = self.profile.as_mut().ok_or(SessionError::NoPlayer)?;
        profile.redeem(cost, label, now_ms);
        let total = profile.points;
        log::info!("redeemed '{label}' for {cost} (left {total})");
        self.persist();
        self.play(SoundCue::Reward);
        self.emit(SessionEvent::PrizeRedeemed {
            label: label.to_string(),
            cost,
            total,
        });
        self.emit(SessionEvent::Announce {
            text: format!("You got a {label}!"),
        });
        Ok(total)
    }

    // --- Screen time ----------------------------------------------------------

    pub fn set_screen_time(&mut self, minutes: Option<i64>) {
        self.screen_time.set_limit(minutes);
        match self.screen_time.limit_minutes {
            Some(m) => log::info!("screen time limit set to {m} min"),
            None => log::info!("screen time limit cleared"),
        }
    }

    /// One-second countdown step, driven by the host's interval timer.
    pub fn tick(&mut self) -> Tick {
        let tick = self.screen_time.tick();
        if tick == Tick::Expired {
            log::info!("screen time expired");
            self.play(SoundCue::Failure);
            self.emit(SessionEvent::ScreenTimeExpired);
            self.emit(SessionEvent::Announce {
                text: "Time is up! Let's take a break.".to_string(),
            });
        }
        tick
    }

    // --- Tutorials ------------------------------------------------------------

    pub fn should_show_tutorial(&self, game: GameId, now_ms: u64) -> bool {
        self.store.should_show_tutorial(game, now_ms)
    }

    pub fn mark_tutorial_seen(&mut self, game: GameId, now_ms: u64) {
        self.store.mark_tutorial_seen(game, now_ms);
    }

    /// Play a one-off cue for in-round feedback (a dig, a caught plane).
    pub fn cue(&mut self, cue: SoundCue) {
        self.play(cue);
    }

    // --- Internals ------------------------------------------------------------

    fn persist(&mut self) {
        if let Some(profile) = &self.profile {
            self.store.save_profile(profile);
        }
    }

    fn play(&mut self, cue: SoundCue) {
        if !self.config.sound_enabled {
            return;
        }
        if let Err(e) = self.audio.play(cue) {
            log::debug!("sound skipped: {e}");
        }
    }

    fn music(&mut self, track: MusicTrack) {
        if !self.running || !self.config.music_enabled {
            return;
        }
        if let Err(e) = self.audio.start_music(track) {
            log::debug!("music unavailable: {e}");
        }
    }

    fn emit(&mut self, event: SessionEvent) {
        for listener in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}
