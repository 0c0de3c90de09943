use std::path::PathBuf;

use base64::Engine;
use saddlebag_client::SaddlebagClient;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("{name} must be a port number, got `{value}`")]
    InvalidPort { name: &'static str, value: String },
    #[error("COOKIE_KEY is not valid base64 {0}")]
    CookieKeyEncoding(#[from] base64::DecodeError),
    #[error("COOKIE_KEY must decode to at least 64 bytes, got {0}")]
    CookieKeyLength(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiscordSettings {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) redirect_url: String,
}

/// Everything read from the environment at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) port: u16,
    pub(crate) metrics_port: u16,
    pub(crate) api_url: String,
    /// Master key for the private cookie jar. A random key is used when unset, which
    /// signs everyone out on restart.
    pub(crate) cookie_key: Option<Vec<u8>>,
    pub(crate) discord: Option<DiscordSettings>,
    /// Only read in debug builds, release builds embed the static files
    pub(crate) static_dir: PathBuf,
}

impl Config {
    pub(crate) fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let port = |name: &'static str, default: u16| match var(name) {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort { name, value }),
            None => Ok(default),
        };
        let cookie_key = var("COOKIE_KEY")
            .map(|encoded| {
                let key = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
                if key.len() < 64 {
                    return Err(ConfigError::CookieKeyLength(key.len()));
                }
                Ok(key)
            })
            .transpose()?;
        let discord = match (
            var("DISCORD_CLIENT_ID"),
            var("DISCORD_CLIENT_SECRET"),
            var("DISCORD_REDIRECT_URL"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_url)) => Some(DiscordSettings {
                client_id,
                client_secret,
                redirect_url,
            }),
            _ => None,
        };
        Ok(Self {
            port: port("PORT", 8080)?,
            metrics_port: port("METRICS_PORT", 9091)?,
            api_url: var("SADDLEBAG_API_URL")
                .unwrap_or_else(|| SaddlebagClient::DEFAULT_BASE_URL.to_string()),
            cookie_key,
            discord,
            static_dir: var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./saddlebag/static")),
        })
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use base64::Engine;

    use super::{Config, ConfigError};

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.metrics_port, 9091);
        assert_eq!(config.api_url, "https://api.saddlebagexchange.com/api");
        assert!(config.cookie_key.is_none());
        assert!(config.discord.is_none());
    }

    #[test]
    fn discord_needs_all_three_variables() {
        let partial = config(&[
            ("DISCORD_CLIENT_ID", "123"),
            ("DISCORD_CLIENT_SECRET", "secret"),
        ])
        .unwrap();
        assert!(partial.discord.is_none());
        let full = config(&[
            ("DISCORD_CLIENT_ID", "123"),
            ("DISCORD_CLIENT_SECRET", "secret"),
            ("DISCORD_REDIRECT_URL", "http://localhost:8080/discord/callback"),
        ])
        .unwrap();
        assert_eq!(full.discord.unwrap().client_id, "123");
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidPort { name: "PORT", .. })
        ));
        let short = base64::engine::general_purpose::STANDARD.encode([7u8; 16]);
        assert!(matches!(
            config(&[("COOKIE_KEY", short.as_str())]),
            Err(ConfigError::CookieKeyLength(16))
        ));
        let key = base64::engine::general_purpose::STANDARD.encode([7u8; 64]);
        assert_eq!(config(&[("COOKIE_KEY", key.as_str())]).unwrap().cookie_key.unwrap().len(), 64);
    }
}
