// ⚙️ Portal configuration - environment variables (optionally from .env)

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct PortalConfig {
    /// Directory holding avisos.json, atividades.json, ...
    pub data_dir: PathBuf,

    /// Where the CLI keeps the logged-in user
    pub session_file: PathBuf,

    /// Contact form webhook; contact submissions fail when unset
    pub contact_webhook: Option<String>,

    /// Server listen address
    pub bind_addr: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            data_dir: PathBuf::from("./data"),
            session_file: PathBuf::from("./.session.json"),
            contact_webhook: None,
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

impl PortalConfig {
    /// Load `.env` if present, then read the environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a closure over a map).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = PortalConfig::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        PortalConfig {
            data_dir: non_empty("PORTAL_DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            session_file: non_empty("PORTAL_SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),
            contact_webhook: non_empty("PORTAL_CONTACT_WEBHOOK")
                .filter(|url| url.starts_with("http://") || url.starts_with("https://")),
            bind_addr: non_empty("PORTAL_BIND").unwrap_or(defaults.bind_addr),
        }
    }
}

/// Install the tracing subscriber (RUST_LOG, default "info").
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        let config = PortalConfig::from_lookup(|_| None);
        assert_eq!(config, PortalConfig::default());
    }

    #[test]
    fn test_values_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("PORTAL_DATA_DIR", "/srv/portal/data"),
            ("PORTAL_CONTACT_WEBHOOK", "https://hooks.example.org/contato"),
            ("PORTAL_BIND", "127.0.0.1:8080"),
            ("PORTAL_SESSION_FILE", "  "),
        ]
        .into_iter()
        .collect();

        let config = PortalConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.data_dir, PathBuf::from("/srv/portal/data"));
        assert_eq!(config.contact_webhook.as_deref(), Some("https://hooks.example.org/contato"));
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.session_file, PathBuf::from("./.session.json"));
    }

    #[test]
    fn test_webhook_must_be_http() {
        let config = PortalConfig::from_lookup(|key| {
            (key == "PORTAL_CONTACT_WEBHOOK").then(|| "ftp://nope".to_string())
        });
        assert!(config.contact_webhook.is_none());
    }
}
