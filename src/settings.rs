use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_AUTO_ANIMATE_SRC: &str =
    "https://cdn.jsdelivr.net/npm/@formkit/auto-animate@0.8.2/index.mjs";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
    pub site_url: Url,
    pub base_path: String,
    pub catalog_path: Option<String>,
    pub timezone: String,
    pub auto_animate_src: String,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Load from environment variables with APP_ prefix
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("site_url", "https://amplifycreativelab.github.io")?
            .set_default("base_path", "/demo-gym-pulse-force")?
            .set_default("timezone", "Europe/London")?
            .set_default("auto_animate_src", DEFAULT_AUTO_ANIMATE_SRC)?
            .build()?;

        config.try_deserialize()
    }

    /// Base path with exactly one trailing slash, e.g. `/demo-gym-pulse-force/`.
    pub fn normalized_base(&self) -> String {
        normalize_base(&self.base_path)
    }

    pub fn tz(&self) -> Result<chrono_tz::Tz, ConfigError> {
        self.timezone
            .parse()
            .map_err(|_| ConfigError::Message(format!("unknown timezone '{}'", self.timezone)))
    }
}

pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    if trimmed.starts_with('/') || trimmed.is_empty() {
        format!("{trimmed}/")
    } else {
        format!("/{trimmed}/")
    }
}
