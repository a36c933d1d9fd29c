//! Runtime configuration.
//!
//! Values come from the process environment. On desktop a `.env` file is
//! loaded first; mobile and web builds fall back to the bundled
//! `assets/config.env`.

use std::env;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_NAMESPACE: &str = "default";

/// How the assessment form produces its verdict.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssessmentMode {
    /// Decide on the client without a network round-trip.
    Local,
    /// POST the form to `/assess` and show the server's answer.
    #[default]
    Remote,
}

impl AssessmentMode {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "local" | "mock" | "offline" => AssessmentMode::Local,
            _ => AssessmentMode::Remote,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub assessment_mode: AssessmentMode,
    pub storage_namespace: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            assessment_mode: AssessmentMode::default(),
            storage_namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let api_base_url = get("DLP_API_BASE")
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let assessment_mode = get("DLP_ASSESSMENT_MODE")
            .map(|mode| AssessmentMode::parse(&mode))
            .unwrap_or_default();
        let storage_namespace = get("DLP_STORAGE_NAMESPACE")
            .map(|ns| ns.trim().to_string())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

        Self {
            api_base_url,
            assessment_mode,
            storage_namespace,
        }
    }
}

/// Parse `KEY=VALUE` lines, skipping blanks and `#` comments.
pub fn parse_env_lines(source: &str) -> Vec<(String, String)> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

/// Apply bundled defaults without overriding anything already set.
pub fn apply_bundled_config(source: &str) {
    for (key, value) in parse_env_lines(source) {
        if env::var(&key).is_err() {
            // SAFETY: We're setting env vars at startup before any threads are spawned
            unsafe {
                env::set_var(&key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DLP_API_BASE", "https://dlp.example.com/api/"),
            ("DLP_ASSESSMENT_MODE", "Local"),
            ("DLP_STORAGE_NAMESPACE", "tenant-a"),
        ]));
        assert_eq!(config.api_base_url, "https://dlp.example.com/api");
        assert_eq!(config.assessment_mode, AssessmentMode::Local);
        assert_eq!(config.storage_namespace, "tenant-a");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DLP_API_BASE", "   "),
            ("DLP_ASSESSMENT_MODE", "bogus"),
        ]));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE);
        assert_eq!(config.assessment_mode, AssessmentMode::Remote);
    }

    #[test]
    fn test_parse_env_lines() {
        let parsed = parse_env_lines("# comment\n\nDLP_API_BASE = http://x/api\nbroken line\n=orphan\n");
        assert_eq!(
            parsed,
            vec![("DLP_API_BASE".to_string(), "http://x/api".to_string())]
        );
    }
}
