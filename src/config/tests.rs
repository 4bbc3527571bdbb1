use super::load::{default_config_path, default_data_dir, resolve_config_path};
use super::schema::*;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_encore_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", "/tmp/encore-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        PathBuf::from("/tmp/encore-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/xdg-config-home")
            .join("encore")
            .join("config.toml")
    );
}

#[test]
fn default_paths_fall_back_to_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::remove("XDG_DATA_HOME");
    let _g3 = EnvGuard::set("HOME", "/tmp/home-dir");

    assert_eq!(
        default_config_path().unwrap(),
        PathBuf::from("/tmp/home-dir/.config/encore/config.toml")
    );
    assert_eq!(
        default_data_dir().unwrap(),
        PathBuf::from("/tmp/home-dir/.local/share/encore")
    );
}

#[test]
fn defaults_match_documented_values() {
    let s = Settings::default();
    assert_eq!(s.playback.restart_threshold_secs, 3.0);
    assert_eq!(s.playback.time_flush_interval_secs, 5.0);
    assert_eq!(s.session.key, "playback-session");
    assert!(s.history.enabled);
    assert!(!s.history.notify_on_previous);
    assert!(!s.history.notify_on_loop_restart);
    assert_eq!(s.media.endpoint, "/media");
    assert!(s.validate().is_ok());
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
restart_threshold_secs = 5.5
time_flush_interval_secs = 2.0

[session]
dir = "/tmp/encore-sessions"
key = "fan-player"

[history]
enabled = false
path = "/tmp/encore-history.jsonl"
notify_on_previous = true
notify_on_loop_restart = true

[media]
root = "/srv/music"
endpoint = "/stream"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::remove("ENCORE__PLAYBACK__RESTART_THRESHOLD_SECS");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.restart_threshold_secs, 5.5);
    assert_eq!(s.playback.time_flush_interval_secs, 2.0);
    assert_eq!(s.session_dir(), PathBuf::from("/tmp/encore-sessions"));
    assert_eq!(s.session.key, "fan-player");
    assert!(!s.history.enabled);
    assert_eq!(s.history_path(), PathBuf::from("/tmp/encore-history.jsonl"));
    let policy = s.history.policy();
    assert!(policy.notify_on_previous);
    assert!(policy.notify_on_loop_restart);
    assert_eq!(s.media.root, PathBuf::from("/srv/music"));
    assert_eq!(s.media.endpoint, "/stream");
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[playback]
restart_threshold_secs = 3.0
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("ENCORE_CONFIG_PATH", cfg_path.to_str().unwrap());
    let _g2 = EnvGuard::set("ENCORE__PLAYBACK__RESTART_THRESHOLD_SECS", "10");

    let s = Settings::load().unwrap();
    assert_eq!(s.playback.restart_threshold_secs, 10.0);
}

#[test]
fn history_path_defaults_next_to_session() {
    let mut s = Settings::default();
    s.session.dir = Some(PathBuf::from("/tmp/encore-data"));
    assert_eq!(
        s.history_path(),
        PathBuf::from("/tmp/encore-data/history.jsonl")
    );
}

#[test]
fn validate_rejects_bad_values() {
    let mut s = Settings::default();
    s.playback.restart_threshold_secs = -1.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.playback.time_flush_interval_secs = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.session.key = "  ".to_string();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.media.endpoint = "media".to_string();
    assert!(s.validate().is_err());
}

#[test]
fn effective_settings_render_as_toml() {
    let rendered = Settings::default().to_toml().unwrap();
    assert!(rendered.contains("[playback]"));
    assert!(rendered.contains("restart_threshold_secs = 3.0"));
    assert!(rendered.contains("key = \"playback-session\""));
    assert!(!rendered.contains("dir ="));
}
