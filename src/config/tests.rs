use super::validation::api_key_from_dotfile;
use super::{AppConfig, FileConfig};
use clap::Parser;
use std::env;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn config_in(dir: &TempDir, name: &str) -> std::path::PathBuf {
    dir.path().join(name)
}

fn parse_with_config(dir: &TempDir, extra: &[&str]) -> AppConfig {
    let config = config_in(dir, "config.yaml");
    let mut args = vec![
        "dictate".to_string(),
        "--config".to_string(),
        config.to_string_lossy().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    AppConfig::parse_from(args)
}

#[test]
fn missing_config_file_yields_defaults_and_creates_it() {
    let dir = TempDir::new().unwrap();
    let cfg = parse_with_config(&dir, &[]);
    let settings = cfg.resolve().expect("defaults should resolve");

    assert_eq!(settings.session.sample_rate, 16_000);
    assert!(settings.session.vad_enabled);
    assert!((settings.session.silence_threshold - 0.1).abs() < f32::EPSILON);
    assert_eq!(settings.session.silence_duration, Duration::from_secs(5));
    assert_eq!(settings.session.min_recording_time, Duration::from_secs(3));
    assert_eq!(settings.backend.model, "whisper-1");
    assert!(config_in(&dir, "config.yaml").exists());
}

#[test]
fn cli_flags_override_file_values() {
    let dir = TempDir::new().unwrap();
    let cfg = parse_with_config(
        &dir,
        &[
            "--threshold",
            "0.05",
            "--duration",
            "2.0",
            "--min-recording-time",
            "1.0",
            "--sample-rate",
            "48000",
        ],
    );
    let settings = cfg.resolve().unwrap();

    assert!((settings.session.silence_threshold - 0.05).abs() < f32::EPSILON);
    assert_eq!(settings.session.silence_duration, Duration::from_secs(2));
    assert_eq!(settings.session.min_recording_time, Duration::from_secs(1));
    assert_eq!(settings.session.sample_rate, 48_000);
}

#[test]
fn fixed_time_disables_vad() {
    let dir = TempDir::new().unwrap();
    let cfg = parse_with_config(&dir, &["--time", "5"]);
    let settings = cfg.resolve().unwrap();
    assert!(!settings.session.vad_enabled);
    assert_eq!(settings.session.time_limit, Some(Duration::from_secs(5)));
}

#[test]
fn no_vad_flag_disables_vad() {
    let dir = TempDir::new().unwrap();
    let cfg = parse_with_config(&dir, &["--no-vad"]);
    let settings = cfg.resolve().unwrap();
    assert!(!settings.session.vad_enabled);
    assert_eq!(settings.session.time_limit, None);
}

#[test]
fn rejects_threshold_out_of_range() {
    let dir = TempDir::new().unwrap();
    let cfg = parse_with_config(&dir, &["--threshold", "1.5"]);
    assert!(cfg.resolve().is_err());
}

#[test]
fn rejects_nonpositive_silence_duration() {
    let dir = TempDir::new().unwrap();
    let cfg = parse_with_config(&dir, &["--duration", "0"]);
    assert!(cfg.resolve().is_err());
}

#[test]
fn rejects_sample_rate_out_of_range() {
    let dir = TempDir::new().unwrap();
    let cfg = parse_with_config(&dir, &["--sample-rate", "4000"]);
    assert!(cfg.resolve().is_err());
}

#[test]
fn rejects_nonpositive_time() {
    let dir = TempDir::new().unwrap();
    let cfg = parse_with_config(&dir, &["--time", "0"]);
    assert!(cfg.resolve().is_err());
}

#[test]
fn loads_values_from_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "config.yaml");
    fs::write(
        &path,
        "recorder:\n  silence_threshold: 0.2\n  silence_duration: 3.0\nbackend:\n  model: gpt-4o-transcribe\n",
    )
    .unwrap();
    let cfg = parse_with_config(&dir, &[]);
    let settings = cfg.resolve().unwrap();

    assert!((settings.session.silence_threshold - 0.2).abs() < f32::EPSILON);
    assert_eq!(settings.session.silence_duration, Duration::from_secs(3));
    assert_eq!(settings.backend.model, "gpt-4o-transcribe");
}

#[test]
fn loads_values_from_json_file() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "config.json");
    fs::write(&path, r#"{"recorder": {"vad_enabled": false}}"#).unwrap();
    let mut cfg = parse_with_config(&dir, &[]);
    cfg.config = Some(path);
    let settings = cfg.resolve().unwrap();
    assert!(!settings.session.vad_enabled);
}

#[test]
fn malformed_config_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "config.yaml");
    fs::write(&path, "recorder: [not, a, mapping]\n").unwrap();
    let cfg = parse_with_config(&dir, &[]);
    let settings = cfg.resolve().unwrap();
    assert!((settings.session.silence_threshold - 0.1).abs() < f32::EPSILON);
}

#[test]
fn config_file_api_key_wins_over_everything() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, "config.yaml");
    fs::write(&path, "backend:\n  api_key: from-file\n").unwrap();
    let cfg = parse_with_config(&dir, &[]);
    let settings = cfg.resolve().unwrap();
    assert_eq!(settings.backend.api_key, "from-file");
}

#[test]
fn dotfile_supplies_api_key_when_nothing_else_does() {
    let dir = TempDir::new().unwrap();
    let env_file = config_in(&dir, ".env");
    fs::write(&env_file, "# creds\nOPENAI_API_KEY=sk-from-dotfile\n").unwrap();

    env::remove_var("OPENAI_API_KEY");
    let mut cfg = parse_with_config(&dir, &[]);
    cfg.env_file = env_file;
    let settings = cfg.resolve().unwrap();
    assert_eq!(settings.backend.api_key, "sk-from-dotfile");
}

#[test]
fn dotfile_parser_handles_quotes_and_comments() {
    let dir = TempDir::new().unwrap();
    let path = config_in(&dir, ".env");
    fs::write(
        &path,
        "# comment\nOTHER=1\nOPENAI_API_KEY=\"sk-quoted\"\n",
    )
    .unwrap();
    assert_eq!(api_key_from_dotfile(&path).as_deref(), Some("sk-quoted"));
}

#[test]
fn dotfile_parser_returns_none_when_absent() {
    let dir = TempDir::new().unwrap();
    assert_eq!(api_key_from_dotfile(&config_in(&dir, ".env")), None);
}

#[test]
fn default_file_round_trips_through_yaml() {
    let rendered = serde_yaml::to_string(&FileConfig::default()).unwrap();
    let parsed: FileConfig = serde_yaml::from_str(&rendered).unwrap();
    assert_eq!(parsed, FileConfig::default());
}
