use crate::i18n::{default_preload_locales, Locale};
use anyhow::{Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Resolver cache
    pub preload_locales: Vec<Locale>,

    // Timeouts
    pub render_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            // Server
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: match std::env::var("PORT") {
                Ok(v) => v.parse().context("PORT must be a valid port number")?,
                Err(_) => 8080,
            },

            // Resolver cache - empty value disables preloading
            preload_locales: match std::env::var("PRELOAD_LOCALES") {
                Ok(v) => parse_locale_list(&v).context("Invalid PRELOAD_LOCALES")?,
                Err(_) => default_preload_locales(),
            },

            // Timeouts
            render_timeout: optional_duration("RENDER_TIMEOUT_MS", Duration::from_millis)?,
            request_timeout: optional_duration("REQUEST_TIMEOUT_SECS", Duration::from_secs)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_locale_list(raw: &str) -> Result<Vec<Locale>> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(Locale::parse)
        .collect()
}

fn optional_duration(name: &str, unit: fn(u64) -> Duration) -> Result<Option<Duration>> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => {
            let amount: u64 = v
                .trim()
                .parse()
                .with_context(|| format!("{} must be a non-negative integer", name))?;
            Ok(Some(unit(amount)))
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    const VARS: [&str; 5] = [
        "HOST",
        "PORT",
        "PRELOAD_LOCALES",
        "RENDER_TIMEOUT_MS",
        "REQUEST_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    // ==================== Default Tests ====================

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = Config::from_env().expect("Should load defaults");

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        assert_eq!(config.preload_locales, default_preload_locales());
        assert!(config.render_timeout.is_none());
        assert!(config.request_timeout.is_none());
    }

    // ==================== Override Tests ====================

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var("HOST", "127.0.0.1");
        env::set_var("PORT", "9090");
        env::set_var("PRELOAD_LOCALES", "fr-BE, nl");
        env::set_var("RENDER_TIMEOUT_MS", "250");
        env::set_var("REQUEST_TIMEOUT_SECS", "30");

        let config = Config::from_env().expect("Should load overrides");
        clear_env();

        assert_eq!(config.bind_address(), "127.0.0.1:9090");
        assert_eq!(
            config.preload_locales,
            vec![Locale::parse("fr-BE").unwrap(), Locale::parse("nl").unwrap()]
        );
        assert_eq!(config.render_timeout, Some(Duration::from_millis(250)));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    #[serial]
    fn test_empty_preload_disables_preloading() {
        clear_env();
        env::set_var("PRELOAD_LOCALES", "");
        let config = Config::from_env().expect("Should load");
        clear_env();

        assert!(config.preload_locales.is_empty());
    }

    // ==================== Error Tests ====================

    #[test]
    #[serial]
    fn test_invalid_port() {
        clear_env();
        env::set_var("PORT", "not-a-port");
        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("PORT"));
    }

    #[test]
    #[serial]
    fn test_invalid_preload_locale() {
        clear_env();
        env::set_var("PRELOAD_LOCALES", "en,???");
        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_invalid_timeout() {
        clear_env();
        env::set_var("RENDER_TIMEOUT_MS", "-5");
        let result = Config::from_env();
        clear_env();

        assert!(result.unwrap_err().to_string().contains("RENDER_TIMEOUT_MS"));
    }
}
