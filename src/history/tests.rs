use super::*;
use crate::library::Track;

fn track(path: &str) -> Track {
    Track::from_path(path, "Original")
}

#[test]
fn entry_takes_identity_from_track() {
    let t = Track::from_path("Rare/b-side.mp3", "Rare");
    let e = HistoryEntry::new(&t, PlaySource::Single);
    assert_eq!(e.track_identity, "Rare/b-side.mp3");
    assert_eq!(e.display_name, "b-side");
    assert_eq!(e.category, "Rare");
}

#[test]
fn play_source_is_tagged_by_kind() {
    let v = serde_json::to_value(PlaySource::Advance {
        from: 2,
        to: 0,
        shuffle: false,
        trigger: AdvanceTrigger::Ended,
        wrapped: true,
    })
    .unwrap();
    assert_eq!(v["kind"], "advance");
    assert_eq!(v["trigger"], "ended");
    assert_eq!(v["wrapped"], true);

    let v = serde_json::to_value(PlaySource::LoopRestart { position: 1 }).unwrap();
    assert_eq!(v["kind"], "loop-restart");

    let e = HistoryEntry::new(&track("a.mp3"), PlaySource::Queue { position: 0, length: 3 });
    let v = serde_json::to_value(&e).unwrap();
    assert_eq!(v["trackIdentity"], "a.mp3");
    assert_eq!(v["displayName"], "a");
    assert_eq!(v["source"]["kind"], "queue");
    assert_eq!(v["source"]["length"], 3);
}

#[test]
fn jsonl_recorder_appends_one_line_per_notification() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("history.jsonl");
    let mut recorder = JsonlHistoryRecorder::new(&path);

    recorder.notify(HistoryEntry::new(&track("a.mp3"), PlaySource::Single));
    recorder.notify(HistoryEntry::new(
        &track("b.mp3"),
        PlaySource::Previous { from: 1, to: 0 },
    ));

    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw.lines().count(), 2);
    assert!(raw.lines().all(|l| l.contains("\"playedAt\"")));

    let records = recorder.read_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].entry.track_identity, "a.mp3");
    assert_eq!(records[1].entry.source, PlaySource::Previous { from: 1, to: 0 });
    assert!(records[0].played_at <= records[1].played_at);
}

#[test]
fn read_all_tolerates_missing_file_and_garbage_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");
    let mut recorder = JsonlHistoryRecorder::new(&path);
    assert!(recorder.read_all().unwrap().is_empty());

    recorder.notify(HistoryEntry::new(&track("a.mp3"), PlaySource::Single));
    let mut raw = std::fs::read_to_string(&path).unwrap();
    raw.push_str("{not json\n\n");
    std::fs::write(&path, raw).unwrap();

    assert_eq!(recorder.read_all().unwrap().len(), 1);
}

#[test]
fn unwritable_history_is_swallowed() {
    let dir = tempfile::tempdir().unwrap();
    // The history path is a directory, so opening it for append fails.
    let mut recorder = JsonlHistoryRecorder::new(dir.path());
    recorder.notify(HistoryEntry::new(&track("a.mp3"), PlaySource::Single));
}
