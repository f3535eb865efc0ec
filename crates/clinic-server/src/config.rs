//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_DB_PATH: &str = "clinic.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// SQLite database file
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    /// Clinic whose details head every receipt; the built-in header when unset
    pub clinic_id: Option<i64>,
}

impl ServerConfig {
    /// Read `CLINIC_DB_PATH`, `CLINIC_BIND_ADDR` and `CLINIC_ID`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let db_path = lookup("CLINIC_DB_PATH")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        let bind_addr = lookup("CLINIC_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse()
            .with_context(|| format!("Invalid CLINIC_BIND_ADDR value: {bind_addr}"))?;

        let clinic_id = lookup("CLINIC_ID")
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .with_context(|| format!("Invalid CLINIC_ID value: {raw}"))
            })
            .transpose()?;

        Ok(Self {
            db_path: PathBuf::from(db_path),
            bind_addr,
            clinic_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("clinic.db"));
        assert_eq!(config.bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.clinic_id, None);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CLINIC_DB_PATH", "/var/lib/clinic/records.db"),
            ("CLINIC_BIND_ADDR", "0.0.0.0:9000"),
            ("CLINIC_ID", " 3 "),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/var/lib/clinic/records.db"));
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.clinic_id, Some(3));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(config_from(&[("CLINIC_BIND_ADDR", "localhost")]).is_err());
        assert!(config_from(&[("CLINIC_ID", "main")]).is_err());
    }
}
