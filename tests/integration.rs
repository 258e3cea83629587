// Arcade scenarios played end to end against in-memory storage and a silent
// audio sink, so they need no browser.

use kids_arcade::audio::NullAudio;
use kids_arcade::games::{ActiveRound, BootColor, FlipResult, PickResult};
use kids_arcade::{
    ArcadeConfig, ArcadeSession, GameId, GameResult, Goals, MemoryStorage, PlayerProfile, RawMetrics, Storage,
};

fn session_on(backend: MemoryStorage) -> ArcadeSession<MemoryStorage, NullAudio> {
    ArcadeSession::new(ArcadeConfig::default(), backend, NullAudio::default())
}

// New player Ava finishes a memory round: score 80 in 5 attempts, 2.1 s hold.
#[test]
fn ava_memory_round_end_to_end() {
    let mut profile = PlayerProfile::new("Ava", None);
    let summary = profile.record_game(GameResult {
        game_id: GameId::Memory,
        score: 80.0,
        attempts: 5,
        timestamp: 1_700_000_000_000,
        goals: Goals {
            intelligences: vec!["Visual-Spatial".into(), "Logical-Mathematical".into()],
            ..Default::default()
        },
        metrics: RawMetrics {
            avg_hold_time: Some(2.1),
            ..Default::default()
        },
    });

    assert_eq!(summary.derived.concentration, Some(70));
    assert_eq!(summary.derived.accuracy, 24);
    assert_eq!(summary.derived.reaction_score, 72);
    assert_eq!(summary.derived.persistence, None);
    assert_eq!(summary.award.base_points, 7);
    assert_eq!(summary.award.bonus, 3);
    assert_eq!(summary.award.earned_points, 10);
    assert_eq!(profile.points, 10);
    assert_eq!(profile.learning_profile["Visual-Spatial"], 80.0);
    assert_eq!(profile.learning_profile["Logical-Mathematical"], 80.0);
    assert_eq!(profile.learning_profile["concentration"], 70.0);
    assert_eq!(profile.points_history[0].reason, "memory");
}

#[test]
fn lollipop_redemption() {
    let mut profile = PlayerProfile::new("Ava", None);
    profile.points = 10;
    profile.redeem(5, "🍭 Lollipop", 1);
    assert_eq!(profile.points, 5);
    assert_eq!(profile.inventory, vec!["🍭 Lollipop"]);
    let last = profile.points_history.last().unwrap();
    assert_eq!(last.delta, -5);
    assert_eq!(last.reason, "redeem:🍭 Lollipop");
}

#[test]
fn ledger_pairs_with_results() {
    let mut s = session_on(MemoryStorage::default());
    s.start_player("Mia", Some(5));
    for (i, g) in GameId::ALL.into_iter().enumerate() {
        s.record_result(g, 40.0 + i as f64 * 10.0, 2, RawMetrics::default(), i as u64)
            .unwrap();
    }
    let p = s.profile().unwrap();
    assert_eq!(p.game_results.len(), 4);
    let earned: Vec<_> = p.points_history.iter().filter(|e| e.delta > 0).collect();
    assert_eq!(earned.len(), p.game_results.len());
    for (entry, result) in earned.iter().zip(&p.game_results) {
        assert_eq!(entry.reason, result.game_id.as_str());
        assert_eq!(entry.timestamp, result.timestamp);
    }
    let total: i64 = p.points_history.iter().map(|e| e.delta).sum();
    assert_eq!(total, p.points as i64);
}

#[test]
fn profile_survives_reload() {
    let mut s = session_on(MemoryStorage::default());
    s.start_player("Ava", Some(4));
    s.record_result(GameId::Digging, 70.0, 4, RawMetrics { persistence: Some(4.0), ..Default::default() }, 3)
        .unwrap();
    let saved = s.profile().unwrap().clone();
    let backend = s.store().backend().clone();

    let mut reloaded = session_on(backend);
    assert_eq!(reloaded.welcome_back().as_deref(), Some("Ava"));
    let resumed = reloaded.start_player("Ava", None).clone();
    assert_eq!(resumed, saved);
    assert_eq!(resumed.learning_profile["persistence"], 64.0);
}

#[test]
fn stored_blob_is_camel_case_json() {
    let mut s = session_on(MemoryStorage::default());
    s.start_player("Ava", None);
    s.record_result(GameId::Airplanes, 90.0, 3, RawMetrics { reaction_score: Some(81.0), ..Default::default() }, 1)
        .unwrap();
    let key = format!("{}profile", ArcadeConfig::default().storage_prefix);
    let raw = s.store().backend().get(&key).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["name"], "Ava");
    assert_eq!(json["gameResults"][0]["gameId"], "airplanes");
    assert_eq!(json["gameResults"][0]["metrics"]["reactionScore"], 81.0);
    assert!(json["learningProfile"]["Bodily-Kinesthetic"].is_number());
}

#[test]
fn full_quota_keeps_memory_state() {
    let mut s = session_on(MemoryStorage::with_quota(64));
    s.start_player("Ava", None);
    s.record_result(GameId::Boots, 100.0, 1, RawMetrics::default(), 0).unwrap();
    assert!(s.profile().unwrap().points > 0);
    assert!(s.store().load_profile().is_none());
}

#[test]
fn boots_round_through_session() {
    let mut s = session_on(MemoryStorage::default());
    s.start_player("Leo", None);
    s.begin_round(GameId::Boots, 12).unwrap();
    loop {
        let Some(ActiveRound::Boots(round)) = s.round_mut() else {
            panic!("boots round missing");
        };
        let target = round.target().unwrap();
        let wrong = BootColor::ALL.into_iter().find(|c| *c != target).unwrap();
        assert_eq!(round.pick(wrong), PickResult::Wrong);
        if round.pick(target) == PickResult::Finished {
            break;
        }
    }
    let summary = s.finish_round(50).unwrap().unwrap();
    assert_eq!(summary.score, 50.0);
    assert_eq!(summary.derived.accuracy, 50);
    assert!(s.round().is_none());
}

#[test]
fn memory_round_through_session() {
    let config = ArcadeConfig {
        memory_pairs: 2,
        ..Default::default()
    };
    let mut s = ArcadeSession::new(config, MemoryStorage::default(), NullAudio::default());
    s.start_player("Zoe", None);
    s.begin_round(GameId::Memory, 4).unwrap();
    let Some(ActiveRound::Memory(round)) = s.round_mut() else {
        panic!("memory round missing");
    };
    // Flip every card against every other until all pairs are found.
    let n = round.card_count();
    let mut now = 0;
    'outer: for i in 0..n {
        for j in (i + 1)..n {
            if round.visible_face(i).is_some() || round.visible_face(j).is_some() {
                continue;
            }
            round.flip(i, now);
            now += 1_000;
            match round.flip(j, now) {
                FlipResult::Finished => break 'outer,
                FlipResult::Mismatch => round.hide_mismatch(),
                _ => {}
            }
        }
    }
    assert!(round.is_finished());
    let summary = s.finish_round(now).unwrap().unwrap();
    assert_eq!(summary.game_id, GameId::Memory);
    assert_eq!(summary.derived.concentration, Some(33));
    assert!(s.profile().unwrap().points >= 1);
}

// A host that divides by zero must not cost the player their saved progress.
#[test]
fn rejected_nan_score_keeps_saved_profile_loadable() {
    let backend = MemoryStorage::default();
    let mut s = session_on(backend);
    s.start_player("Ava", None);
    s.record_result(GameId::Boots, 100.0, 1, RawMetrics::default(), 1).unwrap();
    assert!(s.record_result(GameId::Memory, f64::NAN, 1, RawMetrics::default(), 2).is_err());

    let mut reloaded = session_on(s.store().backend().clone());
    let p = reloaded.start_player("Ava", None);
    assert_eq!(p.points, 11);
    assert_eq!(p.game_results.len(), 1);
}
