use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_questions_per_session")]
    pub questions_per_session: usize,
    #[serde(default = "default_session_minutes")]
    pub session_minutes: u64,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_questions_per_session() -> usize {
    8
}
fn default_session_minutes() -> u64 {
    75
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            questions_per_session: default_questions_per_session(),
            session_minutes: default_session_minutes(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    #[allow(dead_code)]
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr")
            .join("config.toml")
    }

    pub fn session_limit(&self) -> Duration {
        Duration::from_secs(self.session_minutes * 60)
    }

    /// Clamp hand-edited values into usable ranges. Call after
    /// deserialization.
    pub fn normalize(&mut self) {
        self.questions_per_session = self.questions_per_session.clamp(1, 50);
        self.session_minutes = self.session_minutes.clamp(1, 240);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.questions_per_session, 8);
        assert_eq!(config.session_minutes, 75);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: Config = toml::from_str("questions_per_session = 12").unwrap();
        assert_eq!(config.questions_per_session, 12);
        assert_eq!(config.session_minutes, 75);
    }

    #[test]
    fn test_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.questions_per_session, deserialized.questions_per_session);
        assert_eq!(config.session_minutes, deserialized.session_minutes);
    }

    #[test]
    fn test_normalize_clamps_out_of_range_values() {
        let mut config = Config {
            theme: "  ".to_string(),
            questions_per_session: 0,
            session_minutes: 10_000,
        };
        config.normalize();
        assert_eq!(config.questions_per_session, 1);
        assert_eq!(config.session_minutes, 240);
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn test_session_limit_in_seconds() {
        let config = Config::default();
        assert_eq!(config.session_limit(), Duration::from_secs(75 * 60));
    }
}
