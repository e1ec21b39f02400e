//! Autocomplete and search bar configuration
//!
//! Loaded from TOML. Every field has a default so a missing or partial file
//! still yields a usable config.
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CHATSEARCH_CONFIG` | Config file path | `~/.config/chatsearch/config.toml` |

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Icon style used when rendering emoji candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojiPack {
    #[default]
    Mutant,
    Twemoji,
    Noto,
    Openmoji,
}

impl EmojiPack {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmojiPack::Mutant => "mutant",
            EmojiPack::Twemoji => "twemoji",
            EmojiPack::Noto => "noto",
            EmojiPack::Openmoji => "openmoji",
        }
    }
}

/// Session configuration shared by the composer and the search bar
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum candidates offered at once
    pub max_results: usize,
    /// How long a rejected-query notice stays visible
    pub notice_duration_ms: u64,
    /// Account hidden from user suggestions (e.g. the platform bot)
    pub system_user_id: Option<String>,
    /// Emoji icon style
    pub emoji_pack: EmojiPack,
    /// Base URL for emoji assets
    pub emoji_asset_base: String,
    /// Recent searches kept for Up/Down recall
    pub history_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_results: 5,
            notice_duration_ms: 3000,
            system_user_id: None,
            emoji_pack: EmojiPack::default(),
            emoji_asset_base: "https://static.example.chat/emoji".to_string(),
            history_size: 50,
        }
    }
}

impl Config {
    pub fn notice_duration(&self) -> Duration {
        Duration::from_millis(self.notice_duration_ms)
    }

    /// Load config from a TOML file, falling back to defaults if absent
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!("config not found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let config = Self::from_toml(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        tracing::info!(
            max_results = config.max_results,
            emoji_pack = config.emoji_pack.as_str(),
            "loaded config from {}",
            path.display()
        );

        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        if config.max_results == 0 {
            tracing::warn!("max_results = 0 would hide every suggestion, using 1");
            config.max_results = 1;
        }
        Ok(config)
    }
}

/// Get the config file path
///
/// Priority: `CHATSEARCH_CONFIG` > `XDG_CONFIG_HOME` > `~/.config`
pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("CHATSEARCH_CONFIG") {
        return PathBuf::from(path);
    }

    let dir = if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("chatsearch")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/chatsearch")
    } else {
        PathBuf::from(".")
    };

    dir.join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_results, 5);
        assert_eq!(config.notice_duration(), Duration::from_secs(3));
        assert_eq!(config.emoji_pack, EmojiPack::Mutant);
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml(
            r#"
            emoji_pack = "twemoji"
            system_user_id = "00000000000000000000000000"
            "#,
        )
        .unwrap();
        assert_eq!(config.emoji_pack, EmojiPack::Twemoji);
        assert_eq!(config.system_user_id.as_deref(), Some("00000000000000000000000000"));
        assert_eq!(config.max_results, 5);
    }

    #[test]
    fn test_zero_max_results_clamped() {
        let config = Config::from_toml("max_results = 0").unwrap();
        assert_eq!(config.max_results, 1);
    }

    #[test]
    fn test_bad_pack_rejected() {
        assert!(Config::from_toml(r#"emoji_pack = "comic""#).is_err());
    }

    #[test]
    fn test_config_path_env_override() {
        std::env::set_var("CHATSEARCH_CONFIG", "/tmp/chatsearch-test.toml");
        assert_eq!(config_path(), PathBuf::from("/tmp/chatsearch-test.toml"));
        std::env::remove_var("CHATSEARCH_CONFIG");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/chatsearch/config.toml").unwrap();
        assert_eq!(config.history_size, 50);
    }
}
