//! Configuration management for feedwatch.
//!
//! Configuration is read from `~/.config/feedwatch/config.toml` unless a path
//! is given on the command line. If the default file doesn't exist, a
//! commented default configuration is created first.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::FeedwatchError;

pub const DEFAULT_EMAIL_SERVER: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_USER_AGENT: &str = concat!("feedwatch/", env!("CARGO_PKG_VERSION"));

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cache: CacheConfig,
    pub fetch: FetchConfig,
    pub email: EmailConfig,
    pub feeds: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding one snapshot per feed. Must exist when set.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    /// SMTP relay, reached over STARTTLS
    pub server: String,
    pub port: u16,
    pub timeout_secs: u64,
    /// Sender address, also used as the SMTP user name
    pub sender: Option<String>,
    /// Defaults to the sender
    pub recipient: Option<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_EMAIL_SERVER.to_string(),
            port: DEFAULT_SMTP_PORT,
            timeout_secs: 30,
            sender: None,
            recipient: None,
        }
    }
}

impl EmailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// One `[[feeds]]` table.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    pub url: String,
    pub selector: String,
    /// Message template, `{title}` is replaced by the feed title
    pub message: String,
}

impl Config {
    /// Load configuration from `path`, or from the default path.
    ///
    /// Only the default path is created when missing; an explicitly given
    /// file has to exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::default_config_path()?;
                if !path.exists() {
                    Self::create_default_config(&path)?;
                    tracing::info!("Created default configuration at {}", path.display());
                }
                Self::load_from(&path)
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/feedwatch/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("feedwatch").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# feedwatch configuration
#
# Every [[feeds]] table registers one watched page. The first element
# matching `selector` is compared with the copy cached on the previous run;
# when it differs, an email is sent with `message` followed by the element.
# `{title}` in the message is replaced by the feed title.

[cache]
# Directory for cached fragments. Must exist when set.
# Defaults to ./.feed_cache (created on demand).
# dir = "/var/lib/feedwatch"

[fetch]
# Per-request timeout in seconds
timeout_secs = 30

[email]
# SMTP relay, STARTTLS on the given port
server = "smtp.gmail.com"
port = 587
timeout_secs = 30

# Sender address and SMTP user. The password is read from FEED_PASSWORD.
# sender = "me@example.com"

# Defaults to the sender
# recipient = "me@example.com"

[[feeds]]
title = "Clean Code Blog"
url = "https://blog.cleancoder.com/"
selector = "aside ul li:first-child a"
message = "A new blog post of {title} is available!"
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl From<ConfigError> for FeedwatchError {
    fn from(e: ConfigError) -> Self {
        FeedwatchError::Config(e.to_string())
    }
}
