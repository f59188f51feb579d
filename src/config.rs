/// Extension settings read from chrome.storage.local
use crate::preview::DEFAULT_PREVIEW_LINES;
use serde::{Deserialize, Serialize};

/// Storage key holding user overrides
pub const SETTINGS_KEY: &str = "yt_insight_settings";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_WATCH_HOST: &str = "youtube.com";
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 5000;
pub const DEFAULT_COPY_FEEDBACK_MS: u32 = 2000;

const MIN_POLL_INTERVAL_MS: u32 = 1000;
const MAX_POLL_INTERVAL_MS: u32 = 10 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub api_base_url: String,
    pub watch_host: String,
    pub poll_interval_ms: u32,
    pub preview_lines: usize,
    pub copy_feedback_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            watch_host: DEFAULT_WATCH_HOST.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            preview_lines: DEFAULT_PREVIEW_LINES,
            copy_feedback_ms: DEFAULT_COPY_FEEDBACK_MS,
        }
    }
}

impl Settings {
    /// Build settings from whatever was stored, falling back to defaults
    pub fn from_stored(stored: Option<serde_json::Value>) -> Settings {
        let settings = match stored {
            None | Some(serde_json::Value::Null) => Settings::default(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
                log::warn!("Ignoring malformed settings: {}", e);
                Settings::default()
            }),
        };

        settings.clamped()
    }

    fn clamped(mut self) -> Settings {
        self.preview_lines = self.preview_lines.max(1);
        self.poll_interval_ms = self
            .poll_interval_ms
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        if self.api_base_url.trim().is_empty() {
            self.api_base_url = DEFAULT_API_BASE_URL.to_string();
        }
        if self.watch_host.trim().is_empty() {
            self.watch_host = DEFAULT_WATCH_HOST.to_string();
        }
        self
    }

    /// Timer period in the form `setInterval` takes
    pub fn poll_interval_millis(&self) -> i32 {
        i32::try_from(self.poll_interval_ms).unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let settings = Settings::from_stored(None);

        assert_eq!(settings.api_base_url, "http://localhost:8000");
        assert_eq!(settings.watch_host, "youtube.com");
        assert_eq!(settings.poll_interval_ms, 5000);
        assert_eq!(settings.preview_lines, 3);
        assert_eq!(settings.copy_feedback_ms, 2000);
    }

    #[test]
    fn test_partial_override_keeps_other_defaults() {
        let settings = Settings::from_stored(Some(json!({"apiBaseUrl": "https://insight.example.com"})));

        assert_eq!(settings.api_base_url, "https://insight.example.com");
        assert_eq!(settings.poll_interval_ms, 5000);
    }

    #[test]
    fn test_malformed_settings_fall_back() {
        let settings = Settings::from_stored(Some(json!({"pollIntervalMs": "often"})));

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let settings = Settings::from_stored(Some(json!({
            "previewLines": 0,
            "pollIntervalMs": 10,
            "apiBaseUrl": "  "
        })));

        assert_eq!(settings.preview_lines, 1);
        assert_eq!(settings.poll_interval_ms, 1000);
        assert_eq!(settings.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn test_huge_poll_interval_stays_a_positive_timer_period() {
        let settings = Settings::from_stored(Some(json!({"pollIntervalMs": 3_000_000_000u32})));

        assert_eq!(settings.poll_interval_ms, 600_000);
        assert_eq!(settings.poll_interval_millis(), 600_000);
        assert_eq!(Settings::default().poll_interval_millis(), 5000);
    }
}
