use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use linguapedia_core::{HeadingIds, PollPolicy, RenderOptions, DEFAULT_MAX_TRANSLATIONS};
use linguapedia_engine::BackendSettings;
use linguapedia_logging::{lp_debug, lp_info};
use serde::{Deserialize, Serialize};

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILENAME: &str = "linguapedia.ron";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogDestination {
    /// `./linguapedia.log` in the working directory.
    File,
    Terminal,
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub log_level: String,
    pub log_destination: LogDestination,
    pub success_delay_ms: u64,
    pub failure_delay_ms: u64,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub output_dir: PathBuf,
    pub slug_heading_ids: bool,
    pub default_language: String,
    pub max_translations: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let policy = PollPolicy::default();
        let backend = BackendSettings::default();
        Self {
            base_url: backend.base_url,
            log_level: "info".to_string(),
            log_destination: LogDestination::File,
            success_delay_ms: duration_ms(policy.success_delay),
            failure_delay_ms: duration_ms(policy.failure_delay),
            connect_timeout_secs: backend.connect_timeout.as_secs(),
            request_timeout_secs: backend.request_timeout.as_secs(),
            output_dir: PathBuf::from("output"),
            slug_heading_ids: false,
            default_language: "en".to_string(),
            max_translations: u32::from(DEFAULT_MAX_TRANSLATIONS),
        }
    }
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// An explicit path must exist. Without one, `linguapedia.ron` in the
    /// working directory is used if present, otherwise the defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if path.is_file() {
                    Self::from_file(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config = Self::from_ron(&content)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        lp_info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    pub fn to_ron(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::new();
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    pub fn backend_settings(&self) -> BackendSettings {
        BackendSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            success_delay: Duration::from_millis(self.success_delay_ms),
            failure_delay: Duration::from_millis(self.failure_delay_ms),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        let heading_ids = if self.slug_heading_ids {
            HeadingIds::Slugged
        } else {
            HeadingIds::Literal
        };
        lp_debug!("Heading ids: {:?}", heading_ids);
        RenderOptions { heading_ids }
    }
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
