//! Service configuration from environment variables.
//!
//! A `.env` file in the working directory is loaded first when present.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Errors raised while reading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format for the subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Decimal places used when margins are rounded for display
    pub margin_places: u32,
    pub cors_allow_any: bool,
    pub log_format: LogFormat,
}

const MAX_MARGIN_PLACES: u32 = 10;

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            margin_places: 2,
            cors_allow_any: true,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load from the process environment (after `.env`).
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using an arbitrary variable lookup. Unset or blank variables keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = match get("HOST") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|e| invalid("HOST", &raw, e.to_string()))?,
            None => defaults.host,
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| invalid("PORT", &raw, e.to_string()))?,
            None => defaults.port,
        };

        let margin_places = match get("PRICING_MARGIN_PLACES") {
            Some(raw) => {
                let places = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| invalid("PRICING_MARGIN_PLACES", &raw, e.to_string()))?;
                if places > MAX_MARGIN_PLACES {
                    return Err(invalid(
                        "PRICING_MARGIN_PLACES",
                        &raw,
                        format!("must be at most {}", MAX_MARGIN_PLACES),
                    ));
                }
                places
            }
            None => defaults.margin_places,
        };

        let cors_allow_any = match get("CORS_ALLOW_ANY") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                invalid("CORS_ALLOW_ANY", &raw, "expected true or false".to_string())
            })?,
            None => defaults.cors_allow_any,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                _ => {
                    return Err(invalid(
                        "LOG_FORMAT",
                        &raw,
                        "expected json or pretty".to_string(),
                    ))
                }
            },
            None => defaults.log_format,
        };

        Ok(Self {
            host,
            port,
            margin_places,
            cors_allow_any,
            log_format,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(name: &'static str, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "3000"),
            ("PRICING_MARGIN_PLACES", "1"),
            ("CORS_ALLOW_ANY", "false"),
            ("LOG_FORMAT", "JSON"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.margin_places, 1);
        assert!(!config.cors_allow_any);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_blank_values_keep_defaults() {
        let config = Config::from_lookup(lookup(&[("PORT", "  "), ("HOST", "")])).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = Config::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        let err = Config::from_lookup(lookup(&[("PRICING_MARGIN_PLACES", "40")])).unwrap_err();
        assert!(err.to_string().contains("PRICING_MARGIN_PLACES"));

        let err = Config::from_lookup(lookup(&[("CORS_ALLOW_ANY", "maybe")])).unwrap_err();
        assert!(err.to_string().contains("CORS_ALLOW_ANY"));
    }
}
