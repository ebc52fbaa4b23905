//! Runtime configuration loaded from the environment (and `.env`).

use std::env;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_TEMPLATE_PATH: &str = "static/certificate.html";
pub const DEFAULT_CERTIFICATES_DIR: &str = "certificates";
pub const DEFAULT_FROM_NAME: &str = "Certificate Authority";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got '{0}'")]
    InvalidPort(String),
}

/// SMTP sender settings.
#[derive(Debug, Clone, Default)]
pub struct EmailConfig {
    pub user: Option<String>,
    pub pass: Option<String>,
    pub from: Option<String>,
    pub from_name: String,
}

impl EmailConfig {
    /// Sender address, falling back to the SMTP login.
    pub fn from_address(&self) -> Option<&str> {
        self.from.as_deref().or(self.user.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub skip_email: bool,
    pub template_path: PathBuf,
    pub certificates_dir: PathBuf,
    pub chrome_path: Option<PathBuf>,
    pub email: EmailConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match get("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            skip_email: get("SKIP_EMAIL").map(|v| parse_flag(&v)).unwrap_or(false),
            template_path: get("TEMPLATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATE_PATH)),
            certificates_dir: get("CERTIFICATES_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CERTIFICATES_DIR)),
            chrome_path: get("CHROME_PATH").map(PathBuf::from),
            email: EmailConfig {
                user: get("EMAIL_USER"),
                pass: get("EMAIL_PASS"),
                from: get("EMAIL_FROM"),
                from_name: get("EMAIL_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            },
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(!config.skip_email);
        assert_eq!(config.template_path, PathBuf::from("static/certificate.html"));
        assert_eq!(config.certificates_dir, PathBuf::from("certificates"));
        assert_eq!(config.email.from_name, "Certificate Authority");
        assert!(config.chrome_path.is_none());
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("eighty"));
    }

    #[test]
    fn test_skip_email_flag() {
        assert!(config_from(&[("SKIP_EMAIL", "true")]).unwrap().skip_email);
        assert!(config_from(&[("SKIP_EMAIL", "TRUE")]).unwrap().skip_email);
        assert!(!config_from(&[("SKIP_EMAIL", "false")]).unwrap().skip_email);
    }

    #[test]
    fn test_from_address_falls_back_to_user() {
        let config = config_from(&[("EMAIL_USER", "mailer@example.com")]).unwrap();
        assert_eq!(config.email.from_address(), Some("mailer@example.com"));

        let config = config_from(&[
            ("EMAIL_USER", "mailer@example.com"),
            ("EMAIL_FROM", "certs@example.com"),
        ])
        .unwrap();
        assert_eq!(config.email.from_address(), Some("certs@example.com"));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = config_from(&[("EMAIL_FROM", "   "), ("PORT", "")]).unwrap();
        assert!(config.email.from.is_none());
        assert_eq!(config.port, 3000);
    }
}
