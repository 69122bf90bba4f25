use log::LevelFilter;
use shared::FlowConfig;

const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Frontend configuration, fixed at build time.
///
/// `API_URL` and `LOG_LEVEL` are read from the environment of the wasm
/// build (for example `API_URL=https://api.example.com trunk build`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_url: String,
    pub log_level: LevelFilter,
    pub flow: FlowConfig,
}

impl AppConfig {
    pub fn from_build_env() -> Self {
        Self::from_values(option_env!("API_URL"), option_env!("LOG_LEVEL"))
    }

    fn from_values(api_url: Option<&str>, log_level: Option<&str>) -> Self {
        let defaults = Self::default();
        Self {
            api_url: api_url
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_url),
            log_level: log_level
                .and_then(|level| level.parse().ok())
                .unwrap_or(defaults.log_level),
            flow: defaults.flow,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_level: LevelFilter::Info,
            flow: FlowConfig::default(),
        }
    }
}
