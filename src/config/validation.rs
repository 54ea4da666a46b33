//! Configuration validation.
//!
//! Extra headers and the origin list are already checked while parsing.
//! Everything here runs before the listener is bound.

use crate::config::schema::ServerConfig;
use crate::error::ConfigError;

/// Check that the document root and TLS material are usable.
pub fn validate_config(config: &ServerConfig) -> Result<(), ConfigError> {
    if !config.root.is_dir() {
        return Err(ConfigError::RootNotDirectory(config.root.clone()));
    }

    if let Some(tls) = &config.tls {
        for path in [&tls.cert_path, &tls.key_path] {
            std::fs::metadata(path).map_err(|source| ConfigError::TlsMaterial {
                path: path.clone(),
                source,
            })?;
        }
    }

    Ok(())
}
