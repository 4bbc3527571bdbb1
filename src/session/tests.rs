use super::*;
use crate::error::PersistenceError;
use crate::library::Track;
use crate::player::LoopMode;

fn sample_session() -> PlaybackSession {
    PlaybackSession {
        playlist: vec![
            Track::from_path("Originals/a.mp3", "Original").with_album("First"),
            Track::from_path("Rare/b.flac", "Rare"),
            Track::from_path("Originals/a.mp3", "Original").with_album("First"),
        ],
        current_index: 2,
        current_time: 42.5,
        is_shuffle: true,
        loop_mode: LoopMode::LoopOne,
        volume: 0.3,
    }
}

#[test]
fn canonical_empty_session() {
    let s = PlaybackSession::default();
    assert!(s.playlist.is_empty());
    assert_eq!(s.current_index, 0);
    assert_eq!(s.current_time, 0.0);
    assert!(!s.is_shuffle);
    assert_eq!(s.loop_mode, LoopMode::NoLoop);
    assert_eq!(s.volume, 1.0);
    assert!(s.current_track().is_none());
}

#[test]
fn encoded_schema_uses_camel_case_keys_and_omits_loop_all() {
    let mut s = sample_session();
    s.loop_mode = LoopMode::LoopAll;
    let v: serde_json::Value = serde_json::from_str(&encode_session(&s).unwrap()).unwrap();

    let mut keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["currentIndex", "currentTime", "isLoop", "isShuffle", "playlist", "volume"]
    );
    assert_eq!(v["isLoop"], false);
    assert_eq!(v["playlist"][1]["type"], "flac");
}

#[test]
fn memory_store_round_trips() {
    let mut store = MemorySessionStore::new();
    let s = sample_session();
    store.save(&s).unwrap();
    assert_eq!(store.load(), s);
    assert_eq!(store.writes(), 1);
}

#[test]
fn memory_store_round_trips_arbitrary_times_and_volumes() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    let mut rng = StdRng::seed_from_u64(0x5e55);
    let mut store = MemorySessionStore::new();
    let mut s = sample_session();
    for _ in 0..5_000 {
        s.current_time = rng.gen_range(0.0..300.0);
        s.volume = rng.r#gen::<f32>();
        store.save(&s).unwrap();
        let loaded = store.try_load().unwrap().unwrap();
        assert_eq!(loaded.current_time.to_bits(), s.current_time.to_bits());
        assert_eq!(loaded.volume.to_bits(), s.volume.to_bits());
    }
}

#[test]
fn file_store_round_trips_and_replaces_atomically() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileSessionStore::new(dir.path().join("state"), "playback-session");
    assert_eq!(
        store.path(),
        dir.path().join("state").join("playback-session.json")
    );

    let mut s = sample_session();
    store.save(&s).unwrap();
    assert_eq!(store.load(), s);

    s.current_index = 0;
    s.current_time = 1.0;
    store.save(&s).unwrap();
    assert_eq!(store.try_load().unwrap(), Some(s));
    assert!(!store.path().with_extension("json.tmp").exists());
}

#[test]
fn loop_all_is_not_persisted() {
    let mut store = MemorySessionStore::new();
    let mut s = sample_session();
    s.loop_mode = LoopMode::LoopAll;
    store.save(&s).unwrap();

    let loaded = store.load();
    assert_eq!(loaded.loop_mode, LoopMode::NoLoop);
    assert_eq!(loaded.playlist, s.playlist);
}

#[test]
fn missing_key_loads_empty_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path(), "playback-session");
    assert!(store.try_load().unwrap().is_none());
    assert_eq!(store.load(), PlaybackSession::default());
    assert_eq!(MemorySessionStore::new().load(), PlaybackSession::default());
}

#[test]
fn corrupt_storage_loads_empty_session() {
    let store = MemorySessionStore::with_raw("{not json");
    assert!(matches!(store.try_load(), Err(PersistenceError::Json(_))));
    assert_eq!(store.load(), PlaybackSession::default());

    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("playback-session.json"), "{not json").unwrap();
    let store = FileSessionStore::new(dir.path(), "playback-session");
    assert_eq!(store.load(), PlaybackSession::default());
}

#[test]
fn wrong_shape_loads_empty_session() {
    for raw in [
        r#"[]"#,
        r#"{"playlist": "nope", "currentIndex": 0, "currentTime": 0, "isShuffle": false, "isLoop": false, "volume": 1}"#,
        r#"{"playlist": [], "currentIndex": -1, "currentTime": 0, "isShuffle": false, "isLoop": false, "volume": 1}"#,
        r#"{"playlist": [], "currentTime": 0, "isShuffle": false, "isLoop": false, "volume": 1}"#,
        r#"{"playlist": [{"name": "a", "path": "a.mp3", "type": "mp3", "category": "Original"}], "currentIndex": 1, "currentTime": 0, "isShuffle": false, "isLoop": false, "volume": 1}"#,
    ] {
        let store = MemorySessionStore::with_raw(raw);
        assert!(store.try_load().is_err(), "accepted {raw}");
        assert_eq!(store.load(), PlaybackSession::default());
    }
}

#[test]
fn out_of_range_values_are_clamped() {
    let raw = r#"{"playlist": [{"name": "a", "path": "a.mp3", "type": "mp3", "category": "Original"}],
                  "currentIndex": 0, "currentTime": -4.0, "isShuffle": false, "isLoop": true, "volume": 7.5}"#;
    let s = MemorySessionStore::with_raw(raw).load();
    assert_eq!(s.current_time, 0.0);
    assert_eq!(s.volume, 1.0);
    assert_eq!(s.loop_mode, LoopMode::LoopOne);
    assert_eq!(s.playlist[0].thumbnail, None);
}

#[test]
fn quota_rejects_large_writes_and_keeps_previous_value() {
    let mut store = MemorySessionStore::new().with_quota(200);
    store.save(&PlaybackSession::default()).unwrap();
    let before = store.raw().map(str::to_owned);

    let err = store.save(&sample_session()).unwrap_err();
    assert!(matches!(err, PersistenceError::Io(_)));
    assert_eq!(store.raw().map(str::to_owned), before);
    assert_eq!(store.writes(), 1);
}

#[test]
fn file_store_write_failure_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"a file, not a directory").unwrap();

    let mut store = FileSessionStore::new(&blocker, "playback-session");
    assert!(store.save(&sample_session()).is_err());
}
