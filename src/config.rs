use chrono::TimeDelta;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub adzuna: AdzunaConfig,
  #[serde(default)]
  pub places: PlacesConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  /// Custom title for header (defaults to "comfortzone")
  pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdzunaConfig {
  pub app_id: String,
  /// Two-letter country code used in the API path
  #[serde(default = "default_country")]
  pub country: String,
  #[serde(default = "default_adzuna_url")]
  pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlacesConfig {
  /// Photon-compatible geocoding endpoint
  #[serde(default = "default_places_url")]
  pub base_url: String,
  #[serde(default = "default_radius_km")]
  pub radius_km: f64,
  #[serde(default = "default_places_limit")]
  pub limit: u32,
}

impl Default for PlacesConfig {
  fn default() -> Self {
    Self {
      base_url: default_places_url(),
      radius_km: default_radius_km(),
      limit: default_places_limit(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// Disable to always hit the network
  #[serde(default = "default_true")]
  pub enabled: bool,
  /// Keep the cache on disk between runs; otherwise it lives in memory
  #[serde(default = "default_true")]
  pub persist: bool,
  /// How long the unfiltered home listing stays valid
  #[serde(default = "default_home_ttl")]
  pub home_ttl_minutes: i64,
  /// Override the cache database location
  pub path: Option<PathBuf>,
}

/// One year
const MAX_HOME_TTL_MINUTES: i64 = 60 * 24 * 365;

impl CacheConfig {
  /// `home_ttl_minutes` as a duration
  pub fn home_ttl(&self) -> Result<TimeDelta> {
    TimeDelta::try_minutes(self.home_ttl_minutes)
      .ok_or_else(|| eyre!("cache.home_ttl_minutes is out of range: {}", self.home_ttl_minutes))
  }
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      enabled: true,
      persist: true,
      home_ttl_minutes: default_home_ttl(),
      path: None,
    }
  }
}

fn default_country() -> String {
  "us".to_string()
}

fn default_adzuna_url() -> String {
  "https://api.adzuna.com/v1/api".to_string()
}

fn default_places_url() -> String {
  "https://photon.komoot.io".to_string()
}

fn default_radius_km() -> f64 {
  5.0
}

fn default_places_limit() -> u32 {
  30
}

fn default_home_ttl() -> i64 {
  60
}

fn default_true() -> bool {
  true
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./comfortzone.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/comfortzone/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/comfortzone/config.yaml\n\
                 with at least:\n\n  adzuna:\n    app_id: <your app id>"
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("comfortzone.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("comfortzone").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents).map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;
    let ttl = config.cache.home_ttl_minutes;
    if ttl <= 0 {
      return Err(eyre!("cache.home_ttl_minutes must be positive"));
    }
    if ttl > MAX_HOME_TTL_MINUTES {
      return Err(eyre!(
        "cache.home_ttl_minutes must be at most {} (one year), got {}",
        MAX_HOME_TTL_MINUTES,
        ttl
      ));
    }
    Ok(config)
  }

  /// Get the Adzuna application key from environment variables.
  ///
  /// Checks COMFORTZONE_ADZUNA_KEY first, then ADZUNA_APP_KEY as fallback.
  pub fn get_app_key() -> Result<String> {
    std::env::var("COMFORTZONE_ADZUNA_KEY")
      .or_else(|_| std::env::var("ADZUNA_APP_KEY"))
      .map_err(|_| {
        eyre!(
          "Adzuna app key not found. Set COMFORTZONE_ADZUNA_KEY or ADZUNA_APP_KEY environment variable."
        )
      })
  }

  /// Header title
  pub fn title(&self) -> &str {
    self.title.as_deref().unwrap_or("comfortzone")
  }
}
