use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

fn default_port() -> u16 { 3000 }
fn default_scheme() -> String { "https".to_string() }

/// Settings for outbound page and stylesheet requests
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub user_agent: String,
    /// Scheme put in front of protocol-relative stylesheet hrefs
    pub stylesheet_scheme: String,
    /// No timeout when unset
    pub timeout: Option<Duration>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            stylesheet_scheme: default_scheme(),
            timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub scraper: ScraperConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            scraper: ScraperConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Read `PORT` and the `SCRAPER_*` variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let port = parse_var(&lookup, "PORT").unwrap_or(defaults.port);
        let user_agent = lookup("SCRAPER_USER_AGENT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.scraper.user_agent);
        let stylesheet_scheme = lookup("SCRAPER_STYLESHEET_SCHEME")
            .map(|v| v.trim().trim_end_matches(':').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.scraper.stylesheet_scheme);
        let timeout = parse_var::<u64, _>(&lookup, "SCRAPER_TIMEOUT_SECS").map(Duration::from_secs);

        Self {
            port,
            scraper: ScraperConfig {
                user_agent,
                stylesheet_scheme,
                timeout,
            },
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);

        assert_eq!(config.port, 3000);
        assert_eq!(config.scraper.stylesheet_scheme, "https");
        assert_eq!(config.scraper.user_agent, DEFAULT_USER_AGENT);
        assert!(config.scraper.timeout.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8080"),
            ("SCRAPER_STYLESHEET_SCHEME", "http:"),
            ("SCRAPER_TIMEOUT_SECS", "15"),
            ("SCRAPER_USER_AGENT", "style-bot/1.0"),
        ]);

        assert_eq!(config.port, 8080);
        assert_eq!(config.scraper.stylesheet_scheme, "http");
        assert_eq!(config.scraper.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.scraper.user_agent, "style-bot/1.0");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[("PORT", "eighty"), ("SCRAPER_TIMEOUT_SECS", "-1")]);

        assert_eq!(config.port, 3000);
        assert!(config.scraper.timeout.is_none());
    }
}
