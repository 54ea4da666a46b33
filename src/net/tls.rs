//! TLS configuration and certificate loading.

use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsConfig;
use crate::error::ConfigError;

/// ALPN protocol id for HTTP/1.1, the only protocol offered.
pub const HTTP_1_1_ALPN: &[u8] = b"http/1.1";

/// Load TLS configuration from certificate and key files.
///
/// The PEM material is checked up front so a bad cert or key is reported
/// before the listener is bound, not on the first handshake.
///
/// Only `http/1.1` is offered over ALPN.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, ConfigError> {
    let cert_pem = read_pem(&tls.cert_path).await?;
    let key_pem = read_pem(&tls.key_path).await?;

    check_certificates(&tls.cert_path, &cert_pem)?;
    check_private_key(&tls.key_path, &key_pem)?;

    let config = RustlsConfig::from_pem(cert_pem, key_pem)
        .await
        .map_err(|source| ConfigError::TlsMaterial {
            path: tls.cert_path.clone(),
            source,
        })?;

    let mut server_config = (*config.get_inner()).clone();
    server_config.alpn_protocols = vec![HTTP_1_1_ALPN.to_vec()];
    Ok(RustlsConfig::from_config(Arc::new(server_config)))
}

async fn read_pem(path: &Path) -> Result<Vec<u8>, ConfigError> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ConfigError::TlsMaterial {
            path: path.to_path_buf(),
            source,
        })
}

fn check_certificates(path: &Path, pem: &[u8]) -> Result<(), ConfigError> {
    let mut reader = BufReader::new(pem);
    let mut found = false;
    for cert in rustls_pemfile::certs(&mut reader) {
        cert.map_err(|source| ConfigError::TlsMaterial {
            path: path.to_path_buf(),
            source,
        })?;
        found = true;
    }

    if found {
        Ok(())
    } else {
        Err(ConfigError::MissingCertificate(path.to_path_buf()))
    }
}

fn check_private_key(path: &Path, pem: &[u8]) -> Result<(), ConfigError> {
    let mut reader = BufReader::new(pem);
    match rustls_pemfile::private_key(&mut reader) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(ConfigError::MissingPrivateKey(path.to_path_buf())),
        Err(source) => Err(ConfigError::TlsMaterial {
            path: path.to_path_buf(),
            source,
        }),
    }
}
