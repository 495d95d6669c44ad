use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

/// Server settings read from `SKILLSWAP_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let db_path = lookup("SKILLSWAP_DB_PATH").unwrap_or_else(|| "skillswap.db".into());
        let host = lookup("SKILLSWAP_HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port = match lookup("SKILLSWAP_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("SKILLSWAP_PORT must be a port number, got '{raw}'"))?,
            None => 4000,
        };

        Ok(Self {
            db_path: PathBuf::from(db_path),
            host,
            port,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("skillswap.db"));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 4000);
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn overrides_are_applied() {
        let config = config(&[
            ("SKILLSWAP_DB_PATH", "/tmp/swaps.db"),
            ("SKILLSWAP_HOST", "0.0.0.0"),
            ("SKILLSWAP_PORT", "8080"),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/swaps.db"));
        assert_eq!(config.addr().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = config(&[("SKILLSWAP_PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("SKILLSWAP_PORT"));
    }
}
