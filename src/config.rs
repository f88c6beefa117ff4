use anyhow::{Context, Result, bail};
use std::{env, path::PathBuf, str::FromStr, sync::OnceLock};
use uuid::Uuid;

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Whether the journal builds a new widget or updates a rendered one
    pub mode: Mode,

    /// Widget element id, also the target id of live messages
    pub map_id: String,

    /// First-render payload configuration
    pub widget: WidgetConfig,

    /// Centrifugo publish API configuration
    pub centrifugo: CentrifugoConfig,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Pending,
    Live,
}

impl FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "live" => Ok(Self::Live),
            other => bail!("failed to parse mode: expected pending or live, got {other:?}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct WidgetConfig {
    pub width: String,
    pub height: String,
    /// Payload file; stdout when unset
    pub output: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct CentrifugoConfig {
    pub url: String,
    pub api_key: String,
    pub channel: String,
}

impl AppConfig {
    /// Get or load the application configuration
    ///
    /// # Panics
    /// Panics if configuration loading fails. Nothing can be replayed without
    /// a valid configuration.
    pub fn get() -> &'static Self {
        static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();
        APP_CONFIG.get_or_init(|| {
            Self::load(|key| env::var(key).ok()).expect("failed to load application configuration")
        })
    }

    /// Load from a variable lookup, `std::env` in production.
    fn load(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mode = var("MAPBRIDGE_MODE")
            .map(|mode| mode.parse::<Mode>())
            .transpose()
            .context("failed to parse MAPBRIDGE_MODE")?
            .unwrap_or_default();

        let map_id = var("MAPBRIDGE_MAP_ID")
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("map-{}", Uuid::new_v4()));

        let widget = WidgetConfig::load(&var);
        let centrifugo = CentrifugoConfig::load(&var, &map_id);

        Ok(Self {
            mode,
            map_id,
            widget,
            centrifugo,
        })
    }
}

impl WidgetConfig {
    fn load(var: &impl Fn(&str) -> Option<String>) -> Self {
        Self {
            width: var("MAPBRIDGE_WIDTH").unwrap_or_else(|| "100%".to_string()),
            height: var("MAPBRIDGE_HEIGHT").unwrap_or_else(|| "400px".to_string()),
            output: var("MAPBRIDGE_OUTPUT")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        }
    }
}

impl CentrifugoConfig {
    fn load(var: &impl Fn(&str) -> Option<String>, map_id: &str) -> Self {
        Self {
            url: var("CENTRIFUGO_URL")
                .unwrap_or_else(|| "http://localhost:8000/api/publish".to_string()),
            api_key: var("CENTRIFUGO_API_KEY").unwrap_or_default(),
            channel: var("CENTRIFUGO_CHANNEL").unwrap_or_else(|| format!("map:{map_id}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::load(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_environment() {
        let config = load(&[]).unwrap();

        assert_eq!(config.mode, Mode::Pending);
        assert!(config.map_id.starts_with("map-"));
        assert_eq!(config.widget.width, "100%");
        assert_eq!(config.widget.height, "400px");
        assert_eq!(config.widget.output, None);
        assert_eq!(config.centrifugo.url, "http://localhost:8000/api/publish");
        assert_eq!(config.centrifugo.api_key, "");
        assert_eq!(config.centrifugo.channel, format!("map:{}", config.map_id));
    }

    #[test]
    fn channel_follows_map_id() {
        let config = load(&[("MAPBRIDGE_MODE", "Live"), ("MAPBRIDGE_MAP_ID", "map1")]).unwrap();

        assert_eq!(config.mode, Mode::Live);
        assert_eq!(config.centrifugo.channel, "map:map1");
    }

    #[test]
    fn invalid_mode_is_rejected() {
        let err = load(&[("MAPBRIDGE_MODE", "eager")]).unwrap_err();

        assert!(format!("{err:#}").contains("MAPBRIDGE_MODE"));
    }
}
