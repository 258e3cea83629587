//! Browser bridge.
//!
//! Holds the single [`ArcadeSession`] for the page in a `thread_local!`,
//! exposes it to JS through `#[wasm_bindgen]` functions, and owns the
//! browser resources: the `localStorage` handle, audio elements, the
//! one-second screen-time interval and the JS event callbacks.
//!
//! Session events are queued while the session is borrowed and delivered to
//! JS afterwards, so a callback may call straight back into these exports.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlAudioElement, window};

use crate::audio::{AudioSink, MusicTrack, SoundCue};
use crate::catalog::{GameId, PRIZES};
use crate::config::ArcadeConfig;
use crate::error::{AudioError, SessionError, StorageError};
use crate::games::{ActiveRound, BootColor, DigResult, FlipResult, TapResult};
use crate::metrics::RawMetrics;
use crate::session::{ArcadeSession, SessionEvent};
use crate::storage::{MemoryStorage, Storage};

// --- Storage ------------------------------------------------------------------

/// `window.localStorage`.
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let win = window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let inner = win
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
        Ok(Self { inner })
    }
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .set_item(key, value)
            .map_err(|e| StorageError::Quota(format!("{e:?}")))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner
            .remove_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}

/// `localStorage` when the browser allows it, otherwise memory for this visit.
pub enum PageStorage {
    Local(LocalStorage),
    Memory(MemoryStorage),
}

impl PageStorage {
    pub fn open() -> Self {
        match LocalStorage::open() {
            Ok(local) => PageStorage::Local(local),
            Err(e) => {
                log::warn!("{e}; progress will not survive a reload");
                PageStorage::Memory(MemoryStorage::default())
            }
        }
    }
}

impl Storage for PageStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            PageStorage::Local(s) => s.get(key),
            PageStorage::Memory(s) => s.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            PageStorage::Local(s) => s.set(key, value),
            PageStorage::Memory(s) => s.set(key, value),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match self {
            PageStorage::Local(s) => s.remove(key),
            PageStorage::Memory(s) => s.remove(key),
        }
    }
}

// --- Audio --------------------------------------------------------------------

#[derive(Default)]
pub struct WebAudio {
    music: Option<HtmlAudioElement>,
}

/// Start playback. A missing file or blocked autoplay rejects the returned
/// promise later on; that rejection is logged and dropped.
fn start_playback(el: &HtmlAudioElement, path: &'static str) -> Result<(), AudioError> {
    let promise = el.play().map_err(|_| AudioError::Load(path.into()))?;
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
            log::debug!("{}: {e:?}", AudioError::Load(path.into()));
        }
    });
    Ok(())
}

impl AudioSink for WebAudio {
    fn play(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        let el = HtmlAudioElement::new_with_src(cue.path()).map_err(|_| AudioError::Load(cue.path().into()))?;
        start_playback(&el, cue.path())
    }

    fn start_music(&mut self, track: MusicTrack) -> Result<(), AudioError> {
        self.stop_music();
        let el = HtmlAudioElement::new_with_src(track.path()).map_err(|_| AudioError::Load(track.path().into()))?;
        el.set_loop(true);
        el.set_volume(0.35);
        start_playback(&el, track.path())?;
        self.music = Some(el);
        Ok(())
    }

    fn stop_music(&mut self) {
        if let Some(el) = self.music.take() {
            el.pause().ok();
        }
    }
}

// --- Session handle -----------------------------------------------------------

type WebSession = ArcadeSession<PageStorage, WebAudio>;

struct Bridge {
    session: WebSession,
    interval_id: i32,
    // Kept alive for as long as the interval is registered.
    _ticker: Closure<dyn FnMut()>,
}

thread_local! {
    static BRIDGE: RefCell<Option<Bridge>> = const { RefCell::new(None) };
    static PENDING: RefCell<Vec<SessionEvent>> = const { RefCell::new(Vec::new()) };
    static JS_LISTENERS: RefCell<Vec<js_sys::Function>> = const { RefCell::new(Vec::new()) };
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(feature = "rng")]
fn round_seed() -> u64 {
    let mut buf = [0u8; 8];
    match getrandom::getrandom(&mut buf) {
        Ok(()) => u64::from_le_bytes(buf),
        Err(_) => now_ms(),
    }
}

#[cfg(not(feature = "rng"))]
fn round_seed() -> u64 {
    let perf = window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0);
    now_ms() ^ perf.to_bits()
}

/// Run `f` against the session, then deliver any events it raised.
fn with_session<R>(f: impl FnOnce(&mut WebSession) -> Result<R, JsValue>) -> Result<R, JsValue> {
    let out = BRIDGE.with(|cell| match cell.borrow_mut().as_mut() {
        Some(bridge) => f(&mut bridge.session),
        None => Err(JsValue::from_str("arcade not started")),
    });
    flush_events();
    out
}

fn flush_events() {
    let events: Vec<SessionEvent> = PENDING.with(|p| p.borrow_mut().drain(..).collect());
    if events.is_empty() {
        return;
    }
    let listeners: Vec<js_sys::Function> = JS_LISTENERS.with(|l| l.borrow().clone());
    for event in events {
        let payload = match serde_json::to_string(&event) {
            Ok(json) => js_sys::JSON::parse(&json).unwrap_or(JsValue::NULL),
            Err(e) => {
                log::warn!("event not serialisable: {e}");
                continue;
            }
        };
        for f in &listeners {
            if let Err(e) = f.call1(&JsValue::NULL, &payload) {
                log::warn!("event listener threw: {e:?}");
            }
        }
    }
}

fn parse_game(game: &str) -> Result<GameId, JsValue> {
    game.parse::<GameId>().map_err(js_err)
}

fn no_round(game: GameId) -> JsValue {
    JsValue::from_str(&format!("no {game} round in progress"))
}

/// Record the active round if the last input finished it.
fn settle(session: &mut WebSession) -> Result<(), JsValue> {
    session.finish_round(now_ms()).map(|_| ()).map_err(js_err)
}

// --- Lifecycle exports --------------------------------------------------------

/// Create the session and start the one-second screen-time ticker.
/// `config_json` may override any [`ArcadeConfig`] field.
#[wasm_bindgen]
pub fn arcade_start(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) if !json.trim().is_empty() => ArcadeConfig::from_json(json).map_err(js_err)?,
        _ => ArcadeConfig::default(),
    };
    let level = config.log_level();
    if console_log::init_with_level(level).is_err() {
        log::set_max_level(level.to_level_filter());
    }
    arcade_stop();

    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let mut session = ArcadeSession::new(config, PageStorage::open(), WebAudio::default());
    session.subscribe(Box::new(|e: &SessionEvent| PENDING.with(|p| p.borrow_mut().push(e.clone()))));
    session.start();

    let ticker = Closure::wrap(Box::new(|| {
        let _ = with_session(|s| {
            s.tick();
            Ok(())
        });
    }) as Box<dyn FnMut()>);
    let interval_id =
        win.set_interval_with_callback_and_timeout_and_arguments_0(ticker.as_ref().unchecked_ref(), 1000)?;

    BRIDGE.with(|cell| {
        *cell.borrow_mut() = Some(Bridge {
            session,
            interval_id,
            _ticker: ticker,
        });
    });
    flush_events();
    Ok(())
}

/// Clear the ticker, silence audio and drop the session.
#[wasm_bindgen]
pub fn arcade_stop() {
    let Some(mut bridge) = BRIDGE.with(|cell| cell.borrow_mut().take()) else {
        return;
    };
    if let Some(w) = window() {
        w.clear_interval_with_handle(bridge.interval_id);
    }
    bridge.session.stop();
    flush_events();
}

/// Register a JS callback receiving every session event as a plain object.
#[wasm_bindgen]
pub fn on_event(callback: js_sys::Function) {
    JS_LISTENERS.with(|l| l.borrow_mut().push(callback));
}

// --- Player exports -----------------------------------------------------------

#[wasm_bindgen]
pub fn set_player(name: &str, age: Option<u32>) -> Result<String, JsValue> {
    with_session(|s| {
        let profile = s.start_player(name, age);
        serde_json::to_string(profile).map_err(js_err)
    })
}

#[wasm_bindgen]
pub fn welcome_back() -> Option<String> {
    with_session(|s| Ok(s.welcome_back())).ok().flatten()
}

#[wasm_bindgen]
pub fn profile_json() -> Option<String> {
    with_session(|s| Ok(s.profile().and_then(|p| serde_json::to_string(p).ok())))
        .ok()
        .flatten()
}

/// Forget the stored player ("not me" on the welcome-back prompt).
#[wasm_bindgen]
pub fn forget_player() -> Result<(), JsValue> {
    with_session(|s| {
        s.forget_player();
        Ok(())
    })
}

#[wasm_bindgen]
pub fn rounds_played(game: &str) -> Result<u32, JsValue> {
    let game = parse_game(game)?;
    with_session(|s| Ok(s.profile().map_or(0, |p| p.rounds_played(game) as u32)))
}

#[wasm_bindgen]
pub fn reset_profile() -> Result<(), JsValue> {
    with_session(|s| s.reset_profile().map_err(js_err))
}

// --- Round exports ------------------------------------------------------------

#[wasm_bindgen]
pub fn begin_round(game: &str) -> Result<(), JsValue> {
    let game = parse_game(game)?;
    with_session(|s| s.begin_round(game, round_seed()).map(|_| ()).map_err(js_err))
}

/// Flip a memory card. Returns `ignored`, `revealed`, `matched`, `mismatch`
/// or `finished`; a mismatch turns back over after `mismatchHideMs`.
#[wasm_bindgen]
pub fn memory_flip(index: usize) -> Result<String, JsValue> {
    let (result, hide_ms) = with_session(|s| {
        let hide_ms = s.config().mismatch_hide_ms;
        let result = match s.round_mut() {
            Some(ActiveRound::Memory(m)) => m.flip(index, now_ms()),
            _ => return Err(no_round(GameId::Memory)),
        };
        settle(s)?;
        Ok((result, hide_ms))
    })?;
    if result == FlipResult::Mismatch {
        schedule_mismatch_hide(hide_ms)?;
    }
    Ok(format!("{result:?}").to_lowercase())
}

fn schedule_mismatch_hide(ms: u32) -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let hide = Closure::once_into_js(|| {
        let _ = with_session(|s| {
            if let Some(ActiveRound::Memory(m)) = s.round_mut() {
                m.hide_mismatch();
            }
            Ok(())
        });
    });
    win.set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), ms as i32)?;
    Ok(())
}

#[wasm_bindgen]
pub fn memory_card_count() -> u32 {
    with_session(|s| match s.round() {
        Some(ActiveRound::Memory(m)) => Ok(m.card_count() as u32),
        _ => Ok(0),
    })
    .unwrap_or(0)
}

#[wasm_bindgen]
pub fn memory_visible_face(index: usize) -> Option<u8> {
    with_session(|s| match s.round() {
        Some(ActiveRound::Memory(m)) => Ok(m.visible_face(index)),
        _ => Ok(None),
    })
    .ok()
    .flatten()
}

#[wasm_bindgen]
pub fn dig(x: u8, y: u8) -> Result<String, JsValue> {
    with_session(|s| {
        let result = match s.round_mut() {
            Some(ActiveRound::Digging(d)) => d.dig(x, y),
            _ => return Err(no_round(GameId::Digging)),
        };
        if result != DigResult::Ignored {
            s.cue(SoundCue::Dig);
        }
        settle(s)?;
        Ok(format!("{result:?}").to_lowercase())
    })
}

/// Whether a cell has already been dug, for drawing the sand.
#[wasm_bindgen]
pub fn dug(x: u8, y: u8) -> bool {
    with_session(|s| match s.round() {
        Some(ActiveRound::Digging(d)) => Ok(d.is_dug(x, y)),
        _ => Ok(false),
    })
    .unwrap_or(false)
}

#[wasm_bindgen]
pub fn boots_target() -> Option<String> {
    with_session(|s| match s.round() {
        Some(ActiveRound::Boots(b)) => Ok(b.target().and_then(|c| serde_json::to_value(c).ok())),
        _ => Ok(None),
    })
    .ok()
    .flatten()
    .and_then(|v| v.as_str().map(str::to_string))
}

#[wasm_bindgen]
pub fn boots_pick(color: &str) -> Result<String, JsValue> {
    let color: BootColor = serde_json::from_value(serde_json::Value::String(color.to_string())).map_err(js_err)?;
    with_session(|s| {
        let result = match s.round_mut() {
            Some(ActiveRound::Boots(b)) => b.pick(color),
            _ => return Err(no_round(GameId::Boots)),
        };
        settle(s)?;
        Ok(format!("{result:?}").to_lowercase())
    })
}

#[wasm_bindgen]
pub fn plane_spawn() -> Option<u32> {
    with_session(|s| match s.round_mut() {
        Some(ActiveRound::Airplanes(a)) => Ok(a.spawn(now_ms())),
        _ => Ok(None),
    })
    .ok()
    .flatten()
}

#[wasm_bindgen]
pub fn plane_tap(plane: Option<u32>) -> Result<String, JsValue> {
    with_session(|s| {
        let result = match s.round_mut() {
            Some(ActiveRound::Airplanes(a)) => a.tap(plane, now_ms()),
            _ => return Err(no_round(GameId::Airplanes)),
        };
        if matches!(result, TapResult::Hit | TapResult::Finished) {
            s.cue(SoundCue::Whoosh);
        }
        settle(s)?;
        Ok(format!("{result:?}").to_lowercase())
    })
}

/// Ids of the planes still in the air.
#[wasm_bindgen]
pub fn live_planes() -> Vec<u32> {
    with_session(|s| match s.round() {
        Some(ActiveRound::Airplanes(a)) => Ok(a.live_planes().collect()),
        _ => Ok(Vec::new()),
    })
    .unwrap_or_default()
}

#[wasm_bindgen]
pub fn plane_expire(plane: u32) -> Result<(), JsValue> {
    with_session(|s| {
        match s.round_mut() {
            Some(ActiveRound::Airplanes(a)) => {
                a.expire(plane);
            }
            _ => return Err(no_round(GameId::Airplanes)),
        }
        settle(s)
    })
}

/// Credit a round played entirely on the JS side. `metrics_json` is the raw
/// metrics object (e.g. `{"avgHoldTime":2.1}`). Returns the round summary.
#[wasm_bindgen]
pub fn complete_round(game: &str, score: f64, attempts: u32, metrics_json: Option<String>) -> Result<String, JsValue> {
    let game = parse_game(game)?;
    let metrics: RawMetrics = match metrics_json.as_deref() {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(json)
            .map_err(SessionError::from)
            .map_err(js_err)?,
        _ => RawMetrics::default(),
    };
    with_session(|s| {
        let summary = s
            .record_result(game, score, attempts, metrics, now_ms())
            .map_err(js_err)?;
        serde_json::to_string(&summary).map_err(js_err)
    })
}

/// The four games with their titles and emoji, for the lobby.
#[wasm_bindgen]
pub fn game_catalog_json() -> String {
    let games: Vec<serde_json::Value> = GameId::ALL
        .iter()
        .map(|g| {
            let e = g.entry();
            serde_json::json!({ "id": e.id, "title": e.title, "emoji": e.emoji })
        })
        .collect();
    serde_json::Value::Array(games).to_string()
}

// --- Shop exports -------------------------------------------------------------

#[wasm_bindgen]
pub fn prize_catalog_json() -> String {
    let prizes: Vec<serde_json::Value> = PRIZES
        .iter()
        .map(|p| serde_json::json!({ "id": p.id, "label": p.label, "cost": p.cost }))
        .collect();
    serde_json::Value::Array(prizes).to_string()
}

#[wasm_bindgen]
pub fn open_shop() -> Result<(), JsValue> {
    with_session(|s| {
        s.open_shop();
        Ok(())
    })
}

#[wasm_bindgen]
pub fn can_afford(prize_id: &str) -> Result<bool, JsValue> {
    with_session(|s| s.can_afford(prize_id).map_err(js_err))
}

/// Returns the remaining balance.
#[wasm_bindgen]
pub fn redeem_prize(prize_id: &str) -> Result<f64, JsValue> {
    with_session(|s| s.redeem_prize(prize_id, now_ms()).map(|p| p as f64).map_err(js_err))
}

// --- Screen time & tutorials --------------------------------------------------

/// Minutes of play allowed; `None` or `<= 0` removes the limit.
#[wasm_bindgen]
pub fn set_screen_time(minutes: Option<i32>) -> Result<(), JsValue> {
    with_session(|s| {
        s.set_screen_time(minutes.map(i64::from));
        Ok(())
    })
}

#[wasm_bindgen]
pub fn can_play() -> bool {
    with_session(|s| Ok(s.can_play())).unwrap_or(false)
}

#[wasm_bindgen]
pub fn screen_time_label() -> String {
    with_session(|s| Ok(s.screen_time().remaining_label())).unwrap_or_default()
}

#[wasm_bindgen]
pub fn should_show_tutorial(game: &str) -> Result<bool, JsValue> {
    let game = parse_game(game)?;
    with_session(|s| Ok(s.should_show_tutorial(game, now_ms())))
}

#[wasm_bindgen]
pub fn mark_tutorial_seen(game: &str) -> Result<(), JsValue> {
    let game = parse_game(game)?;
    with_session(|s| {
        s.mark_tutorial_seen(game, now_ms());
        Ok(())
    })
}

#[wasm_bindgen]
pub fn tutorial_text(game: &str) -> Result<String, JsValue> {
    Ok(parse_game(game)?.entry().tutorial.to_string())
}
