use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const GEOCODER_API_KEY_ENV: &str = "OPENCAGE_API_KEY";
pub const CHAT_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const EPHEMERIS_PATH_ENV: &str = "SWISS_EPHEMERIS_PATH";

pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://api.opencagedata.com/geocode/v1/json";
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Settings for the place-name lookup collaborator and its cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocoderSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    /// OpenCage-compatible forward geocoding URL.
    #[serde(default = "default_geocoder_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_geocoder_endpoint(),
            cache_capacity: default_cache_capacity(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl GeocoderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisSettings {
    /// Directory holding the Swiss Ephemeris data files.
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_ayanamsa")]
    pub ayanamsa: String,
    #[serde(default = "default_lookup_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for EphemerisSettings {
    fn default() -> Self {
        Self {
            path: None,
            ayanamsa: default_ayanamsa(),
            timeout_secs: default_lookup_timeout_secs(),
        }
    }
}

impl EphemerisSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Sampling parameters and credentials for the conversational backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    /// OpenAI-compatible chat completions URL.
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_frequency_penalty")]
    pub frequency_penalty: f32,
    #[serde(default = "default_presence_penalty")]
    pub presence_penalty: f32,
    #[serde(default = "default_chat_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_chat_endpoint(),
            model: default_chat_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            frequency_penalty: default_frequency_penalty(),
            presence_penalty: default_presence_penalty(),
            timeout_secs: default_chat_timeout_secs(),
        }
    }
}

impl ChatSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Root of `configs/kundali.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KundaliSettings {
    #[serde(default)]
    pub geocoder: GeocoderSettings,
    #[serde(default)]
    pub ephemeris: EphemerisSettings,
    #[serde(default)]
    pub chat: ChatSettings,
}

fn default_geocoder_endpoint() -> String {
    DEFAULT_GEOCODER_ENDPOINT.to_string()
}

fn default_chat_endpoint() -> String {
    DEFAULT_CHAT_ENDPOINT.to_string()
}

fn default_cache_capacity() -> usize {
    128
}

fn default_lookup_timeout_secs() -> u64 {
    10
}

fn default_ayanamsa() -> String {
    "lahiri".to_string()
}

fn default_chat_model() -> String {
    "gpt-4".to_string()
}

fn default_temperature() -> f32 {
    0.8
}

fn default_max_tokens() -> u32 {
    2400
}

fn default_top_p() -> f32 {
    1.0
}

fn default_frequency_penalty() -> f32 {
    0.1
}

fn default_presence_penalty() -> f32 {
    0.2
}

fn default_chat_timeout_secs() -> u64 {
    60
}

/// Try the common relative locations of `configs/kundali.toml`.
pub fn read_kundali_toml_text() -> anyhow::Result<String> {
    let paths = ["configs/kundali.toml", "../../configs/kundali.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load kundali.toml from {:?}", paths);
}

/// Parse and validate settings text. Environment overrides are not applied here.
pub fn parse_kundali_settings(text: &str) -> anyhow::Result<KundaliSettings> {
    let settings: KundaliSettings = toml::from_str(text)
        .map_err(|e| anyhow::anyhow!("Failed to parse kundali.toml: {e}"))?;
    validate_settings(&settings)?;
    Ok(settings)
}

pub fn validate_settings(settings: &KundaliSettings) -> anyhow::Result<()> {
    if settings.geocoder.cache_capacity == 0 {
        anyhow::bail!("geocoder.cache_capacity must be at least 1");
    }
    if settings.geocoder.endpoint.trim().is_empty() {
        anyhow::bail!("geocoder.endpoint must not be empty");
    }
    if settings.geocoder.timeout_secs == 0 {
        anyhow::bail!("geocoder.timeout_secs must be greater than zero");
    }
    if settings.ephemeris.timeout_secs == 0 {
        anyhow::bail!("ephemeris.timeout_secs must be greater than zero");
    }
    if settings.ephemeris.ayanamsa.trim().is_empty() {
        anyhow::bail!("ephemeris.ayanamsa must not be empty");
    }
    let chat = &settings.chat;
    if chat.timeout_secs == 0 {
        anyhow::bail!("chat.timeout_secs must be greater than zero");
    }
    if !(0.0..=2.0).contains(&chat.temperature) {
        anyhow::bail!("chat.temperature must be within [0, 2], got {}", chat.temperature);
    }
    if !(chat.top_p > 0.0 && chat.top_p <= 1.0) {
        anyhow::bail!("chat.top_p must be within (0, 1], got {}", chat.top_p);
    }
    if chat.endpoint.trim().is_empty() {
        anyhow::bail!("chat.endpoint must not be empty");
    }
    if chat.model.trim().is_empty() {
        anyhow::bail!("chat.model must not be empty");
    }
    Ok(())
}

/// Fill credentials and the ephemeris path from the environment when set.
pub fn apply_env_overrides(settings: &mut KundaliSettings) {
    if let Some(key) = non_empty_env(GEOCODER_API_KEY_ENV) {
        settings.geocoder.api_key = Some(key);
    }
    if let Some(key) = non_empty_env(CHAT_API_KEY_ENV) {
        settings.chat.api_key = Some(key);
    }
    if let Some(path) = non_empty_env(EPHEMERIS_PATH_ENV) {
        settings.ephemeris.path = Some(PathBuf::from(path));
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

pub fn load_kundali_settings_from(path: &Path) -> anyhow::Result<KundaliSettings> {
    let text = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
    let mut settings = parse_kundali_settings(&text)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

pub fn load_kundali_settings() -> anyhow::Result<KundaliSettings> {
    let text = read_kundali_toml_text()?;
    let mut settings = parse_kundali_settings(&text)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_defaults() {
        let settings = parse_kundali_settings("").unwrap();
        assert_eq!(settings, KundaliSettings::default());
        assert_eq!(settings.geocoder.cache_capacity, 128);
        assert_eq!(settings.chat.max_tokens, 2400);
        assert_eq!(settings.ephemeris.ayanamsa, "lahiri");
        assert_eq!(settings.geocoder.endpoint, DEFAULT_GEOCODER_ENDPOINT);
        assert_eq!(settings.chat.endpoint, DEFAULT_CHAT_ENDPOINT);
    }

    #[test]
    fn rejects_blank_endpoint() {
        let err = parse_kundali_settings("[chat]\nendpoint = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("chat.endpoint"));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let settings = parse_kundali_settings(
            r#"
            [chat]
            model = "gpt-4o"
            temperature = 0.5
            "#,
        )
        .unwrap();
        assert_eq!(settings.chat.model, "gpt-4o");
        assert_eq!(settings.chat.temperature, 0.5);
        assert_eq!(settings.chat.top_p, 1.0);
        assert_eq!(settings.geocoder.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn rejects_zero_capacity() {
        let err = parse_kundali_settings("[geocoder]\ncache_capacity = 0\n").unwrap_err();
        assert!(err.to_string().contains("cache_capacity"));
    }

    #[test]
    fn rejects_out_of_range_sampling() {
        assert!(parse_kundali_settings("[chat]\ntemperature = 3.0\n").is_err());
        assert!(parse_kundali_settings("[chat]\ntop_p = 0.0\n").is_err());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_kundali_settings("[chat\nmodel = 1").unwrap_err();
        assert!(err.to_string().contains("Failed to parse kundali.toml"));
    }
}
