use std::path::{Path, PathBuf};

use super::*;
use crate::error::PlaybackStartError;

#[test]
fn from_path_derives_name_and_lowercase_type() {
    let t = Track::from_path("Live/Encore Medley.FLAC", "LIVE REMIX");
    assert_eq!(t.name, "Encore Medley");
    assert_eq!(t.kind, "flac");
    assert_eq!(t.category, "LIVE REMIX");
    assert_eq!(t.path, "Live/Encore Medley.FLAC");
    assert!(t.thumbnail.is_none());
    assert!(t.album.is_none());
}

#[test]
fn from_path_without_extension_has_empty_type() {
    let t = Track::from_path("demos/untitled", "Rare");
    assert_eq!(t.name, "untitled");
    assert_eq!(t.kind, "");
}

#[test]
fn track_serializes_type_key_and_skips_missing_optionals() {
    let t = Track::from_path("a/b.mp3", "Original").with_album("First");
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["type"], "mp3");
    assert_eq!(v["album"], "First");
    assert!(v.get("thumbnail").is_none());
    assert!(v.get("kind").is_none());
}

#[test]
fn media_url_encodes_path_as_query_parameter() {
    let url = media_url("/media", "Rare/Song & Dance #2.mp3");
    assert_eq!(url, "/media?file=Rare%2FSong+%26+Dance+%232.mp3");
    assert_eq!(
        Track::from_path("x y.ogg", "Original").media_url("/stream"),
        "/stream?file=x+y.ogg"
    );
}

#[test]
fn media_file_param_decodes_what_media_url_encodes() {
    let path = "Rare/Song & Dance #2 (ライブ).mp3";
    let url = media_url("/media", path);
    assert_eq!(media_file_param(&url).as_deref(), Some(path));
    assert_eq!(media_file_param("/media"), None);
    assert_eq!(media_file_param("/media?other=1"), None);
}

#[test]
fn resolve_media_path_joins_under_root() {
    let root = Path::new("/srv/music");
    let p = resolve_media_path(root, &media_url("/media", "./Originals/a.mp3")).unwrap();
    assert_eq!(p, PathBuf::from("/srv/music/Originals/a.mp3"));
}

#[test]
fn resolve_media_path_rejects_escapes_and_empty_paths() {
    let root = Path::new("/srv/music");
    for bad in ["../etc/passwd", "/etc/passwd", "a/../../b.mp3", "", "."] {
        let err = resolve_media_path(root, &media_url("/media", bad)).unwrap_err();
        assert!(matches!(err, PlaybackStartError::Locator(_)), "accepted {bad:?}");
    }
    assert!(resolve_media_path(root, "/media?nofile=1").is_err());
}
