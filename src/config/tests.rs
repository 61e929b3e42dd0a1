use std::fs;

use super::*;

fn raw_with_system() -> RawSettings {
    RawSettings {
        system_id: Some("exmpl".to_string()),
        ..Default::default()
    }
}

#[test]
fn defaults_match_the_historical_deployment() {
    let settings = Settings::from_raw(raw_with_system(), None).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 8080);
    assert_eq!(settings.database.url, "mongodb://localhost:27017");
    assert_eq!(settings.database.name, "blog");
    assert_eq!(settings.database.collection, "posts");
    assert_eq!(settings.cache.ttl, Duration::from_secs(300));
    assert_eq!(settings.cache.purge_interval, Duration::from_secs(600));
    assert!(settings.cache.read_through);
    assert_eq!(
        settings.identity.base_url.as_str(),
        "https://api.pluralkit.me/v2/"
    );
    assert_eq!(settings.modded_message, DEFAULT_MODDED_MESSAGE);
}

#[test]
fn missing_system_id_is_rejected() {
    let err = Settings::from_raw(RawSettings::default(), None).unwrap_err();
    assert!(matches!(err, LoadError::Invalid { key: "SystemID", .. }));

    let blank = RawSettings {
        system_id: Some("   ".to_string()),
        ..Default::default()
    };
    assert!(Settings::from_raw(blank, None).is_err());
}

#[test]
fn system_id_accepts_the_legacy_key() {
    let raw: RawSettings =
        serde_json::from_str(r#"{ "SystemID": "abcde" }"#).expect("legacy config parses");
    assert_eq!(raw.system_id.as_deref(), Some("abcde"));

    let raw: RawSettings =
        serde_json::from_str(r#"{ "system_id": "fghij" }"#).expect("snake case parses");
    assert_eq!(raw.system_id.as_deref(), Some("fghij"));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = raw_with_system();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        port: Some(4321),
        log_level: Some("debug".to_string()),
        database_url: Some("mongodb://db.internal:27017".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw, None).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.database.url, "mongodb://db.internal:27017");
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = raw_with_system();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw, None).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn zero_durations_are_rejected() {
    let mut raw = raw_with_system();
    raw.cache.ttl_seconds = Some(0);
    assert!(matches!(
        Settings::from_raw(raw, None),
        Err(LoadError::Invalid {
            key: "cache.ttl_seconds",
            ..
        })
    ));

    let mut raw = raw_with_system();
    raw.cache.purge_interval_seconds = Some(0);
    assert!(Settings::from_raw(raw, None).is_err());
}

#[test]
fn non_mongodb_url_is_rejected() {
    let mut raw = raw_with_system();
    raw.database.url = Some("postgres://localhost".to_string());
    assert!(matches!(
        Settings::from_raw(raw, None),
        Err(LoadError::Invalid {
            key: "database.url",
            ..
        })
    ));
}

#[test]
fn base_url_gains_a_trailing_slash() {
    let mut raw = raw_with_system();
    raw.identity.base_url = Some("http://127.0.0.1:9999/v2".to_string());
    let settings = Settings::from_raw(raw, None).expect("valid settings");

    assert_eq!(settings.identity.base_url.as_str(), "http://127.0.0.1:9999/v2/");
}

#[test]
fn blank_token_is_treated_as_absent_and_never_printed() {
    let settings =
        Settings::from_raw(raw_with_system(), Some("  ".to_string())).expect("valid settings");
    assert!(settings.identity.token.is_none());

    let settings = Settings::from_raw(raw_with_system(), Some("secret-token".to_string()))
        .expect("valid settings");
    let rendered = format!("{:?}", settings.identity);
    assert!(!rendered.contains("secret-token"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn parse_cli_defaults() {
    let args = CliArgs::parse_from(["pkblog"]);
    assert_eq!(args.config_file, std::path::Path::new("config.json"));
    assert_eq!(args.env_file, std::path::Path::new(".env"));
    assert!(args.overrides.port.is_none());
}

#[test]
fn parse_cli_overrides() {
    let args = CliArgs::parse_from([
        "pkblog",
        "--config-file",
        "/etc/pkblog/config.json",
        "--port",
        "9090",
        "--log-json",
        "true",
    ]);

    assert_eq!(
        args.config_file,
        std::path::Path::new("/etc/pkblog/config.json")
    );
    assert_eq!(args.overrides.port, Some(9090));
    assert_eq!(args.overrides.log_json, Some(true));
}

#[test]
fn load_reads_config_and_env_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("config.json");
    let env_path = dir.path().join(".env");
    fs::write(
        &config_path,
        r#"{ "SystemID": "exmpl", "cache": { "ttl_seconds": 30 } }"#,
    )
    .expect("write config");
    fs::write(&env_path, "pluralkit_auth=test-token\n").expect("write env");

    let args = CliArgs::parse_from([
        "pkblog",
        "--config-file",
        config_path.to_str().expect("utf-8 path"),
        "--env-file",
        env_path.to_str().expect("utf-8 path"),
    ]);

    let settings = load(&args).expect("settings load");
    assert_eq!(settings.identity.system_id, "exmpl");
    assert_eq!(settings.identity.token.as_deref(), Some("test-token"));
    assert_eq!(settings.cache.ttl, Duration::from_secs(30));
}

#[test]
fn load_fails_without_env_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("config.json");
    fs::write(&config_path, r#"{ "SystemID": "exmpl" }"#).expect("write config");

    let args = CliArgs::parse_from([
        "pkblog",
        "--config-file",
        config_path.to_str().expect("utf-8 path"),
        "--env-file",
        dir.path().join("missing.env").to_str().expect("utf-8 path"),
    ]);

    assert!(matches!(load(&args), Err(LoadError::EnvFile { .. })));
}

#[test]
fn load_fails_without_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let env_path = dir.path().join(".env");
    fs::write(&env_path, "UNRELATED=1\n").expect("write env");

    let args = CliArgs::parse_from([
        "pkblog",
        "--config-file",
        dir.path().join("missing.json").to_str().expect("utf-8 path"),
        "--env-file",
        env_path.to_str().expect("utf-8 path"),
    ]);

    assert!(matches!(load(&args), Err(LoadError::Build(_))));
}
