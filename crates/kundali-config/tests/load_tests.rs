use kundali_config::{load_kundali_settings_from, CHAT_API_KEY_ENV};
use std::io::Write;

#[test]
fn test_load_settings_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[geocoder]
cache_capacity = 16
timeout_secs = 3

[ephemeris]
ayanamsa = "raman"

[chat]
model = "gpt-4o"
max_tokens = 1200
"#
    )
    .unwrap();

    let settings = load_kundali_settings_from(file.path()).unwrap();
    assert_eq!(settings.geocoder.cache_capacity, 16);
    assert_eq!(settings.geocoder.timeout_secs, 3);
    assert_eq!(settings.ephemeris.ayanamsa, "raman");
    assert_eq!(settings.chat.model, "gpt-4o");
    assert_eq!(settings.chat.max_tokens, 1200);
    assert_eq!(settings.chat.presence_penalty, 0.2);
}

#[test]
fn test_env_key_overrides_file_key() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[chat]\napi_key = \"from-file\"\n").unwrap();

    std::env::set_var(CHAT_API_KEY_ENV, "from-env");
    let settings = load_kundali_settings_from(file.path()).unwrap();
    std::env::remove_var(CHAT_API_KEY_ENV);

    assert_eq!(settings.chat.api_key.as_deref(), Some("from-env"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_kundali_settings_from(&dir.path().join("absent.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read"));
}
