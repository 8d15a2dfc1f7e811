//! Configuration loading and management

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::assistant::speech::SpeechConfig;

/// Default auto-advance period for the carousel
const DEFAULT_ADVANCE_MS: u64 = 6000;

/// Default backend request timeout
const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Unix domain socket for the UI bridge
    pub socket_path: PathBuf,

    /// Directory for runtime data
    pub data_dir: PathBuf,

    /// Voice assistant backend endpoint
    pub endpoint: String,

    /// Labels for the featured-recipe slides, in display order
    pub slides: Vec<String>,

    /// Carousel auto-advance period
    pub advance_interval: Duration,

    /// Backend request timeout
    pub request_timeout: Duration,

    /// Whether the platform offers speech recognition
    pub speech_supported: bool,

    /// Speech synthesis parameters
    pub speech: SpeechConfig,
}

impl Config {
    /// Load configuration from environment and defaults
    pub fn load() -> Result<Self> {
        let home = std::env::var("HOME")?;
        let data_dir = PathBuf::from(&home)
            .join(".local")
            .join("share")
            .join("cookbook-ui");

        let socket_path = data_dir.join("ui.sock");

        let endpoint = std::env::var("COOKBOOK_UI_ENDPOINT")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/api/voice-assistant/".to_string());

        let slides = std::env::var("COOKBOOK_UI_SLIDES")
            .unwrap_or_else(|_| "spring-soups,weeknight-pasta,market-salads".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let advance_interval = Duration::from_millis(env_ms("COOKBOOK_UI_ADVANCE_MS", DEFAULT_ADVANCE_MS));
        let request_timeout =
            Duration::from_millis(env_ms("COOKBOOK_UI_REQUEST_TIMEOUT_MS", DEFAULT_REQUEST_TIMEOUT_MS));

        let speech_supported = std::env::var("COOKBOOK_UI_SPEECH")
            .map(|v| v != "off")
            .unwrap_or(true);

        Ok(Self {
            socket_path,
            data_dir,
            endpoint,
            slides,
            advance_interval,
            request_timeout,
            speech_supported,
            speech: SpeechConfig::default(),
        })
    }

    /// Ensure data directory exists
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }
}

/// Read a millisecond duration from the environment, falling back on
/// unset or unparseable values.
fn env_ms(var: &str, default: u64) -> u64 {
    std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load() {
        let config = Config::load().unwrap();
        assert!(config.socket_path.to_string_lossy().contains("cookbook-ui"));
        assert_eq!(config.advance_interval, Duration::from_millis(6000));
        assert!(!config.slides.is_empty());
    }

    #[test]
    fn test_env_ms_fallback() {
        assert_eq!(env_ms("COOKBOOK_UI_UNSET_VAR", 42), 42);
    }
}
