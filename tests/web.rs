// Browser tests for the localStorage backend and the exported bridge.
// Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use kids_arcade::Storage;
use kids_arcade::web::{self, LocalStorage};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn local_storage_round_trip() {
    let mut store = LocalStorage::open().unwrap();
    store.set("kidsArcadeTest:key", "value").unwrap();
    assert_eq!(store.get("kidsArcadeTest:key").unwrap().as_deref(), Some("value"));
    store.remove("kidsArcadeTest:key").unwrap();
    assert_eq!(store.get("kidsArcadeTest:key").unwrap(), None);
}

#[wasm_bindgen_test]
fn bridge_records_a_round() {
    web::arcade_start(Some(r#"{"storagePrefix":"kidsArcadeTest:","soundEnabled":false,"musicEnabled":false}"#.into()))
        .unwrap();
    web::set_player("Ava", Some(5)).unwrap();
    web::reset_profile().unwrap();
    let summary = web::complete_round("memory", 80.0, 5, Some(r#"{"avgHoldTime":2.1}"#.into())).unwrap();
    let summary: serde_json::Value = serde_json::from_str(&summary).unwrap();
    assert_eq!(summary["award"]["earnedPoints"], 10);
    assert!(web::can_afford("lollipop").unwrap());
    assert_eq!(web::redeem_prize("lollipop").unwrap(), 5.0);

    web::set_screen_time(Some(0)).unwrap();
    assert!(web::can_play());
    assert_eq!(web::screen_time_label(), "");
    web::arcade_stop();
    assert!(web::profile_json().is_none());
}

#[wasm_bindgen_test]
fn bridge_exposes_round_state_for_drawing() {
    web::arcade_start(Some(
        r#"{"storagePrefix":"kidsArcadeTest:","soundEnabled":false,"musicEnabled":false,"digWidth":3,"digHeight":1}"#
            .into(),
    ))
    .unwrap();
    web::set_player("Ava", None).unwrap();
    let games: serde_json::Value = serde_json::from_str(&web::game_catalog_json()).unwrap();
    assert_eq!(games[0]["emoji"], "🃏");

    // Retry until the first cell is plain sand; a find ends the round.
    let empty = (0..20).any(|_| {
        web::begin_round("digging").unwrap();
        assert!(!web::dug(0, 0));
        web::dig(0, 0).unwrap() == "empty"
    });
    assert!(empty);
    assert!(web::dug(0, 0));

    web::begin_round("airplanes").unwrap();
    let id = web::plane_spawn().unwrap();
    assert_eq!(web::live_planes(), vec![id]);

    web::forget_player().unwrap();
    assert_eq!(web::welcome_back(), None);
    web::arcade_stop();
}
