use serde::{Deserialize, Serialize};

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub(crate) const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;

/// Runtime configuration injected by the hosting page through `window.ENV`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct EnvConfig {
    pub api_url: String,
    pub log_level: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let env = web_sys::window()
            .and_then(|w| w.get("ENV"))
            .filter(|env| !env.is_undefined() && env.is_object());

        match env {
            Some(env) => Self::from_lookup(|key| {
                js_sys::Reflect::get(&env, &key.into())
                    .ok()
                    .and_then(|v| v.as_string())
            }),
            None => Self::from_lookup(|_| None),
        }
    }

    /// Build from a key lookup. Both `API_URL` and the lowercase `api_url` are accepted.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let pick = |keys: [&str; 2]| {
            keys.into_iter()
                .find_map(&lookup)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = pick(["API_URL", "api_url"])
            .map(|url| url.trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let log_level = pick(["LOG_LEVEL", "log_level"])
            .filter(|lvl| lvl.parse::<log::LevelFilter>().is_ok())
            .map(|lvl| lvl.to_ascii_lowercase())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string().to_ascii_lowercase());

        Self { api_url, log_level }
    }

    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}
