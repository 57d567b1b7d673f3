//! Runtime configuration loaded from environment variables.

use crate::error::{OrderError, Result};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/order";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Order submission endpoint, receives a multipart POST
    pub endpoint: String,
    /// Upper bound on a single transfer; `None` leaves cancellation as the only limit
    pub request_timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let endpoint = lookup("ORDER_ENDPOINT").unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let request_timeout = match lookup("ORDER_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => None,
        };
        Ok(Config {
            endpoint,
            request_timeout,
        })
    }

    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if let Some(endpoint) = endpoint {
            self.endpoint = endpoint;
        }
        self
    }

    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        if let Some(secs) = secs {
            self.request_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        self
    }
}

fn parse_timeout(raw: &str) -> Result<Option<Duration>> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| OrderError::Config(format!("Invalid ORDER_TIMEOUT_SECS '{raw}'")))?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_values() {
        let config = Config::from_lookup(lookup(&[
            ("ORDER_ENDPOINT", "http://orders.test/api/order"),
            ("ORDER_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();
        assert_eq!(config.endpoint, "http://orders.test/api/order");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config = Config::from_lookup(lookup(&[("ORDER_TIMEOUT_SECS", "0")])).unwrap();
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_invalid_timeout() {
        let result = Config::from_lookup(lookup(&[("ORDER_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(OrderError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let config = Config::default()
            .with_endpoint(Some("http://other".to_string()))
            .with_timeout_secs(Some(5));
        assert_eq!(config.endpoint, "http://other");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(5)));

        let unchanged = config.clone().with_endpoint(None).with_timeout_secs(None);
        assert_eq!(unchanged, config);
    }
}
