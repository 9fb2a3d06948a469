use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GuideError, Result};
use crate::geo::DEFAULT_MARKER_RADIUS;
use crate::schedule::DisplayLocale;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

const ENV_API_URL: &str = "TOURNAMENT_GUIDE_API_URL";
const ENV_STORAGE: &str = "TOURNAMENT_GUIDE_STORAGE";
const ENV_TIMEOUT_SECS: &str = "TOURNAMENT_GUIDE_TIMEOUT_SECS";
const ENV_LOCALE: &str = "TOURNAMENT_GUIDE_LOCALE";

/// Runtime settings for a [`Tournament`](crate::Tournament).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuideConfig {
    /// Root of the REST API; collection paths are appended to it.
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub timeout_secs: Option<u64>,
    /// Local storage file for preferences and cached lists.
    pub storage_path: Option<PathBuf>,
    pub locale: DisplayLocale,
    /// Jitter radius for hotel and restaurant markers, in degrees.
    pub marker_radius: f64,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: Some(15),
            storage_path: None,
            locale: DisplayLocale::default(),
            marker_radius: DEFAULT_MARKER_RADIUS,
        }
    }
}

impl GuideConfig {
    /// Read and validate a JSON config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| GuideError::Storage {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| GuideError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `TOURNAMENT_GUIDE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_API_URL) {
            self.base_url = url;
        }
        if let Some(path) = lookup(ENV_STORAGE) {
            self.storage_path = Some(PathBuf::from(path));
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs = raw
                .trim()
                .parse()
                .map_err(|_| GuideError::Config(format!("{ENV_TIMEOUT_SECS}={raw} is not a number")))?;
            self.timeout_secs = Some(secs);
        }
        if let Some(raw) = lookup(ENV_LOCALE) {
            self.locale = DisplayLocale::from_str(raw.trim())
                .map_err(|_| GuideError::Config(format!("{ENV_LOCALE}={raw} is not a known locale")))?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(GuideError::Config(format!("base_url {url:?} must be http(s)")));
        }
        if !self.marker_radius.is_finite() || self.marker_radius < 0.0 {
            return Err(GuideError::Config("marker_radius must be a non-negative number".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
