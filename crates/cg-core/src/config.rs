//! Configuration management for the neongecko dashboard
//!
//! Settings live in a JSON file (`~/.config/neongecko/config.json` by default).
//! A missing file is created with defaults on first load. `.env` files and the
//! `NEONGECKO_*` environment variables are honoured on top of the file.

use crate::duration::parse_duration;
use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "NEONGECKO_CONFIG";

/// Overrides the provider base URL (mirrors, tests)
pub const BASE_URL_ENV: &str = "NEONGECKO_BASE_URL";

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
  /// Colors and day/night selection
  pub theme: ThemeConfig,

  /// Provider access settings
  pub api: ApiConfig,

  /// Presentation settings
  pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ThemeConfig {
  /// `"day"`, `"night"`, or empty for time-of-day selection
  pub force_theme: String,
  pub custom_colors: CustomColors,
}

/// Hex colors (`#RRGGBB`)
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CustomColors {
  pub day_bg: String,
  pub night_bg: String,
  pub accent: String,
}

impl Default for CustomColors {
  fn default() -> Self {
    Self {
      day_bg: "#F5DEB3".to_string(),
      night_bg: "#191970".to_string(),
      accent: "#98FB98".to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
  /// Cache TTL as a duration string, e.g. `"5m"`
  pub cache_ttl: String,

  /// Request timeout as a duration string, e.g. `"10s"`
  pub timeout: String,

  /// Requests per minute. Advisory only: nothing throttles on it.
  pub rate_limit: u32,

  /// Provider base URL
  pub base_url: String,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      cache_ttl: "5m".to_string(),
      timeout: "10s".to_string(),
      rate_limit: crate::DEFAULT_RATE_LIMIT,
      base_url: crate::COINGECKO_BASE_URL.to_string(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
  /// Preferred currency. Extraction is always USD.
  pub currency: String,
  pub decimal_places: u32,
  pub show_help: bool,
  /// Favorite coin ids
  pub favorites: Vec<String>,
}

impl Default for DisplayConfig {
  fn default() -> Self {
    Self {
      currency: "usd".to_string(),
      decimal_places: 2,
      show_help: false,
      favorites: vec!["bitcoin".to_string(), "ethereum".to_string()],
    }
  }
}

impl Config {
  /// Default location of the config file
  pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir()
      .ok_or_else(|| Error::Config("failed to get home directory".to_string()))?;
    Ok(home.join(".config").join("neongecko").join("config.json"))
  }

  /// Resolve the config path: explicit argument, then `NEONGECKO_CONFIG`, then the default.
  pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
      return Ok(path.to_path_buf());
    }
    match env::var(CONFIG_PATH_ENV) {
      Ok(path) if !path.is_empty() => Ok(PathBuf::from(path)),
      _ => Self::default_path(),
    }
  }

  /// Load configuration, creating the file with defaults when it does not exist.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    dotenv().ok();

    let path = Self::resolve_path(explicit)?;
    let mut config = Self::load_or_init(&path)?;
    config.apply_env_overrides();
    Ok(config)
  }

  /// Read the config at `path`, writing defaults there first if it is missing.
  pub fn load_or_init(path: &Path) -> Result<Self> {
    if !path.exists() {
      debug!("No config at {}, writing defaults", path.display());
      let config = Self::default();
      config.save_to(path)?;
      return Ok(config);
    }

    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data)
      .map_err(|e| Error::Config(format!("failed to parse config file {}: {}", path.display(), e)))
  }

  /// Write the config as pretty-printed JSON, creating parent directories.
  pub fn save_to(&self, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
      fs::create_dir_all(dir)?;
    }
    let data = serde_json::to_string_pretty(self)
      .map_err(|e| Error::Config(format!("failed to marshal config: {}", e)))?;
    fs::write(path, data)?;
    Ok(())
  }

  /// Apply `NEONGECKO_*` environment overrides
  pub fn apply_env_overrides(&mut self) {
    if let Ok(url) = env::var(BASE_URL_ENV) {
      if !url.is_empty() {
        self.api.base_url = url;
      }
    }
  }

  /// Cache TTL, falling back to the default when the string is invalid
  pub fn cache_ttl(&self) -> Duration {
    parse_duration(&self.api.cache_ttl).unwrap_or_else(|e| {
      warn!("{}; using default cache TTL", e);
      crate::DEFAULT_CACHE_TTL
    })
  }

  /// Request timeout, falling back to the default when the string is invalid
  /// or zero. A zero timeout would fail every request.
  pub fn timeout(&self) -> Duration {
    match parse_duration(&self.api.timeout) {
      Ok(timeout) if !timeout.is_zero() => timeout,
      Ok(_) => {
        warn!("timeout '{}' is zero; using default timeout", self.api.timeout);
        crate::DEFAULT_TIMEOUT
      }
      Err(e) => {
        warn!("{}; using default timeout", e);
        crate::DEFAULT_TIMEOUT
      }
    }
  }

  pub fn is_favorite(&self, coin_id: &str) -> bool {
    self.display.favorites.iter().any(|fav| fav == coin_id)
  }

  pub fn add_favorite(&mut self, coin_id: &str) {
    if !self.is_favorite(coin_id) {
      self.display.favorites.push(coin_id.to_string());
    }
  }

  pub fn remove_favorite(&mut self, coin_id: &str) {
    if let Some(pos) = self.display.favorites.iter().position(|fav| fav == coin_id) {
      self.display.favorites.remove(pos);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use tempfile::tempdir;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.cache_ttl, "5m");
    assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    assert_eq!(config.timeout(), Duration::from_secs(10));
    assert_eq!(config.api.rate_limit, 30);
    assert_eq!(config.api.base_url, crate::COINGECKO_BASE_URL);
    assert_eq!(config.display.currency, "usd");
    assert_eq!(config.theme.custom_colors.night_bg, "#191970");
  }

  #[test]
  fn test_load_or_init_writes_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("config.json");

    let config = Config::load_or_init(&path).unwrap();
    assert_eq!(config, Config::default());
    assert!(path.exists());
  }

  #[test]
  fn test_save_and_reload() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.api.cache_ttl = "90s".to_string();
    config.theme.force_theme = "night".to_string();
    config.save_to(&path).unwrap();

    let loaded = Config::load_or_init(&path).unwrap();
    assert_eq!(loaded.cache_ttl(), Duration::from_secs(90));
    assert_eq!(loaded.theme.force_theme, "night");
  }

  #[test]
  fn test_partial_file_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{"api": {"timeout": "3s"}}"#).unwrap();

    let config = Config::load_or_init(&path).unwrap();
    assert_eq!(config.timeout(), Duration::from_secs(3));
    assert_eq!(config.cache_ttl(), Duration::from_secs(300));
    assert_eq!(config.display.favorites, vec!["bitcoin", "ethereum"]);
  }

  #[test]
  fn test_malformed_file_is_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, "{not json").unwrap();

    match Config::load_or_init(&path) {
      Err(Error::Config(msg)) => assert!(msg.contains("failed to parse config file")),
      other => panic!("Expected Config error, got {:?}", other),
    }
  }

  #[test]
  fn test_invalid_durations_fall_back() {
    let mut config = Config::default();
    config.api.cache_ttl = "soon".to_string();
    config.api.timeout = "".to_string();
    assert_eq!(config.cache_ttl(), crate::DEFAULT_CACHE_TTL);
    assert_eq!(config.timeout(), crate::DEFAULT_TIMEOUT);
  }

  #[test]
  fn test_zero_timeout_falls_back() {
    let mut config = Config::default();
    for zero in ["0", "0s", "0ms", "0h0m"] {
      config.api.timeout = zero.to_string();
      assert_eq!(config.timeout(), crate::DEFAULT_TIMEOUT, "timeout {:?}", zero);
    }
    config.api.timeout = "250ms".to_string();
    assert_eq!(config.timeout(), Duration::from_millis(250));
  }

  #[test]
  fn test_favorites() {
    let mut config = Config::default();
    assert!(config.is_favorite("bitcoin"));
    assert!(!config.is_favorite("solana"));

    config.add_favorite("solana");
    config.add_favorite("solana");
    assert_eq!(config.display.favorites.iter().filter(|f| *f == "solana").count(), 1);

    config.remove_favorite("bitcoin");
    assert!(!config.is_favorite("bitcoin"));
    config.remove_favorite("not-there");
    assert_eq!(config.display.favorites, vec!["ethereum", "solana"]);
  }

  #[test]
  #[serial]
  fn test_env_overrides() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");

    env::set_var(BASE_URL_ENV, "http://127.0.0.1:9999");
    let config = Config::load(Some(&path)).unwrap();
    env::remove_var(BASE_URL_ENV);

    assert_eq!(config.api.base_url, "http://127.0.0.1:9999");
  }

  #[test]
  #[serial]
  fn test_resolve_path_from_env() {
    env::set_var(CONFIG_PATH_ENV, "/tmp/neongecko-test.json");
    let path = Config::resolve_path(None).unwrap();
    env::remove_var(CONFIG_PATH_ENV);

    assert_eq!(path, PathBuf::from("/tmp/neongecko-test.json"));
    let explicit = Config::resolve_path(Some(Path::new("/x/y.json"))).unwrap();
    assert_eq!(explicit, PathBuf::from("/x/y.json"));
  }
}
