use std::io::Write;

use super::*;

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn defaults_apply_without_file_or_env() {
    let dir = tempfile::tempdir().expect("tempdir");
    let settings = load_settings_from(&dir.path().join("missing.toml"), no_env);
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.pool_capacity, DEFAULT_POOL_CAPACITY);
    assert_eq!(settings.failure_policy, FailurePolicy::Abort);
}

#[test]
fn file_values_override_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(
        file,
        "pooling_enabled = false\npool_capacity = 8\nfailure_policy = \"continue\"\nlog_filter = \"dispatch_core=trace\""
    )
    .expect("write config");

    let settings = load_settings_from(file.path(), no_env);
    assert!(!settings.pooling_enabled);
    assert_eq!(settings.pool_capacity, 8);
    assert_eq!(settings.failure_policy, FailurePolicy::Continue);
    assert_eq!(settings.log_filter, "dispatch_core=trace");
}

#[test]
fn env_overrides_file_and_app_prefix_wins_last() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "pool_capacity = 8").expect("write config");

    let settings = load_settings_from(file.path(), |key| match key {
        "DISPATCH_POOL_CAPACITY" => Some("16".into()),
        "APP__POOL_CAPACITY" => Some("32".into()),
        "DISPATCH_FAILURE_POLICY" => Some("Continue".into()),
        _ => None,
    });
    assert_eq!(settings.pool_capacity, 32);
    assert_eq!(settings.failure_policy, FailurePolicy::Continue);
}

#[test]
fn invalid_entries_are_skipped() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "pool_capacity = \"lots\"\nunknown_key = \"x\"\npooling_enabled = \"no\"")
        .expect("write config");

    let settings = load_settings_from(file.path(), |key| {
        (key == "DISPATCH_FAILURE_POLICY").then(|| "retry".to_string())
    });
    assert_eq!(settings.pool_capacity, DEFAULT_POOL_CAPACITY);
    assert!(!settings.pooling_enabled);
    assert_eq!(settings.failure_policy, FailurePolicy::Abort);
}

#[test]
fn unparsable_file_falls_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "this is not toml").expect("write config");

    assert!(matches!(
        read_settings_file(file.path()),
        Err(DispatchError::Config { .. })
    ));
    assert_eq!(load_settings_from(file.path(), no_env), Settings::default());
}

#[test]
fn apply_rejects_bad_values_without_changing_settings() {
    let mut settings = Settings::default();
    let error = settings
        .apply("pool_capacity", "-1")
        .expect_err("negative capacity");
    assert_eq!(
        error.to_string(),
        "invalid value '-1' for setting 'pool_capacity'"
    );
    assert!(settings.apply("log_filter", "  ").is_err());
    assert!(settings.apply("nonsense", "1").is_err());
    assert_eq!(settings, Settings::default());
}

#[test]
fn failure_policy_parses_case_insensitively() {
    assert_eq!("ABORT".parse::<FailurePolicy>().expect("abort"), FailurePolicy::Abort);
    assert_eq!(
        " continue ".parse::<FailurePolicy>().expect("continue"),
        FailurePolicy::Continue
    );
    assert!("sometimes".parse::<FailurePolicy>().is_err());
}
