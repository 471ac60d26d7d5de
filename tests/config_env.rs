// tests/config_env.rs
//
// ServiceConfig::load resolution: file selection and environment overrides.
// Env is process-global, so every test here runs serially.

use std::env;
use std::fs;
use std::path::PathBuf;

use serial_test::serial;

use emotion_detector::config::service::{DEFAULT_API_URL, ENV_CONFIG_PATH};
use emotion_detector::ServiceConfig;

const OVERRIDES: [&str; 7] = [
    "EMOTION_API_URL",
    "EMOTION_MODEL_ID",
    "EMOTION_TIMEOUT_SECS",
    "EMOTION_CONNECT_TIMEOUT_SECS",
    "HOST",
    "PORT",
    "METRICS_ENABLED",
];

fn clear_env() {
    env::remove_var(ENV_CONFIG_PATH);
    for key in OVERRIDES {
        env::remove_var(key);
    }
}

fn write_temp(name: &str, content: &str) -> PathBuf {
    let p = env::temp_dir().join(format!("emotion_detector_{}_{name}", std::process::id()));
    fs::write(&p, content).expect("write temp config");
    p
}

#[test]
#[serial]
fn repo_default_config_matches_builtin_defaults() {
    clear_env();
    let cfg = ServiceConfig::load().expect("load");
    assert_eq!(cfg, ServiceConfig::default());
    assert_eq!(cfg.bind_addr(), "0.0.0.0:5000");
}

#[test]
#[serial]
fn explicit_path_is_used() {
    clear_env();
    let p = write_temp(
        "explicit.toml",
        r#"
        port = 7000
        metrics_enabled = true
        [emotion_api]
        url = "http://localhost:9999/predict"
        "#,
    );
    env::set_var(ENV_CONFIG_PATH, &p);

    let cfg = ServiceConfig::load().expect("load");
    assert_eq!(cfg.port, 7000);
    assert!(cfg.metrics_enabled);
    assert_eq!(cfg.emotion_api.url, "http://localhost:9999/predict");

    clear_env();
    let _ = fs::remove_file(p);
}

#[test]
#[serial]
fn missing_explicit_path_is_an_error() {
    clear_env();
    env::set_var(ENV_CONFIG_PATH, "/definitely/not/here/emotion.toml");
    let err = ServiceConfig::load().unwrap_err();
    assert!(err.to_string().contains(ENV_CONFIG_PATH), "{err}");
    clear_env();
}

#[test]
#[serial]
fn env_overrides_win_over_file() {
    clear_env();
    env::set_var("EMOTION_API_URL", "http://127.0.0.1:1234/emotion");
    env::set_var("EMOTION_MODEL_ID", "custom-model");
    env::set_var("EMOTION_TIMEOUT_SECS", "3");
    env::set_var("HOST", "127.0.0.1");
    env::set_var("PORT", "8081");
    env::set_var("METRICS_ENABLED", "TRUE");

    let cfg = ServiceConfig::load().expect("load");
    assert_eq!(cfg.emotion_api.url, "http://127.0.0.1:1234/emotion");
    assert_eq!(cfg.emotion_api.model_id, "custom-model");
    assert_eq!(cfg.emotion_api.timeout_secs, 3);
    assert_eq!(cfg.emotion_api.connect_timeout_secs, 4);
    assert_eq!(cfg.bind_addr(), "127.0.0.1:8081");
    assert!(cfg.metrics_enabled);

    clear_env();
}

#[test]
#[serial]
fn blank_override_is_ignored() {
    clear_env();
    env::set_var("EMOTION_API_URL", "   ");
    let cfg = ServiceConfig::load().expect("load");
    assert_eq!(cfg.emotion_api.url, DEFAULT_API_URL);
    clear_env();
}

#[test]
#[serial]
fn unparseable_port_is_an_error() {
    clear_env();
    env::set_var("PORT", "five-thousand");
    let err = ServiceConfig::load().unwrap_err();
    assert!(format!("{err:#}").contains("PORT"), "{err:#}");
    clear_env();
}
