//! # Unified Application Configuration
//!
//! This module consolidates the web server, OCR engine and observability
//! settings into a single configuration object loaded from environment
//! variables (optionally through a `.env` file) and validated at startup.

use std::env;
use std::net::SocketAddr;

use crate::errors::{AppError, AppResult};
use crate::observability_config::ObservabilityConfig;
use crate::ocr_config::OcrConfig;

/// Web server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Largest accepted upload request, all files included
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            max_upload_bytes: 200 * 1024 * 1024, // 200MB
        }
    }
}

impl ServerConfig {
    /// Validate server configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.port == 0 {
            return Err(AppError::Config("PORT cannot be 0".to_string()));
        }

        if self.max_upload_bytes == 0 {
            return Err(AppError::Config(
                "MAX_UPLOAD_MB must be greater than 0".to_string(),
            ));
        }

        self.socket_addr()?;
        Ok(())
    }

    /// Address the listener binds to
    pub fn socket_addr(&self) -> AppResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| {
                AppError::Config(format!(
                    "HOST '{}' and PORT {} do not form a valid socket address",
                    self.host, self.port
                ))
            })
    }
}

/// Unified application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// OCR processing configuration
    pub ocr: OcrConfig,
    /// Observability configuration
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::from_vars(|key| env::var(key).ok())?;
        config.observability = ObservabilityConfig::from_env();
        Ok(config)
    }

    /// Load the server section through an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(host) = lookup("HOST") {
            config.server.host = host;
        }
        config.server.port = lookup("PORT")
            .unwrap_or_else(|| "8501".to_string())
            .parse()
            .map_err(|_| AppError::Config("PORT must be a valid port number".to_string()))?;

        let max_upload_mb: usize = lookup("MAX_UPLOAD_MB")
            .unwrap_or_else(|| "200".to_string())
            .parse()
            .map_err(|_| AppError::Config("MAX_UPLOAD_MB must be a valid number".to_string()))?;
        config.server.max_upload_bytes = max_upload_mb.saturating_mul(1024 * 1024);

        if let Some(cmd) = lookup("TESSERACT_CMD") {
            config.ocr.tesseract_cmd = cmd.into();
        }

        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> AppResult<()> {
        self.server.validate()?;
        self.ocr.validate()?;
        self.observability
            .validate()
            .map_err(AppError::Config)?;
        Ok(())
    }

    /// Get a summary of the current configuration for logging
    pub fn summary(&self) -> String {
        format!(
            "Configuration: listen={}:{}, max_upload_mb={}, tesseract_cmd={}, ocr_languages={}, psm={}, oem={}, environment={}",
            self.server.host,
            self.server.port,
            self.server.max_upload_bytes / (1024 * 1024),
            self.ocr.tesseract_cmd.display(),
            self.ocr.languages,
            self.ocr.psm_mode.as_str(),
            self.ocr.engine_mode.as_str(),
            self.observability.environment
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_config_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.port, 8501);
        assert_eq!(config.server.max_upload_bytes, 200 * 1024 * 1024);
    }

    #[test]
    fn test_from_vars_overrides() {
        let env = vars(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("MAX_UPLOAD_MB", "5"),
            ("TESSERACT_CMD", "/opt/tesseract/bin/tesseract"),
        ]);
        let config = AppConfig::from_vars(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(
            config.ocr.tesseract_cmd,
            std::path::PathBuf::from("/opt/tesseract/bin/tesseract")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_vars_rejects_garbage() {
        let env = vars(&[("PORT", "eighty")]);
        assert!(AppConfig::from_vars(|k| env.get(k).cloned()).is_err());

        let env = vars(&[("MAX_UPLOAD_MB", "-1")]);
        assert!(AppConfig::from_vars(|k| env.get(k).cloned()).is_err());
    }

    #[test]
    fn test_server_config_validation() {
        let mut config = ServerConfig::default();
        assert!(config.validate().is_ok());

        config.port = 0;
        assert!(config.validate().is_err());
        config.port = 8501;

        config.max_upload_bytes = 0;
        assert!(config.validate().is_err());
        config.max_upload_bytes = 1024;

        config.host = "not a host".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_summary_mentions_engine() {
        let summary = AppConfig::default().summary();
        assert!(summary.contains("/usr/bin/tesseract"));
        assert!(summary.contains("psm=3"));
        assert!(summary.contains("oem=3"));
    }
}
