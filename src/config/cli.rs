//! Command-line surface.
//!
//! The parsed [`Cli`] is turned into a [`ServerConfig`] once at startup;
//! nothing reads the arguments after that.

use std::path::PathBuf;

use clap::Parser;

use crate::config::schema::{
    ExtraHeader, OriginPolicy, ServerConfig, TlsConfig, DEFAULT_ADDRESS, DEFAULT_PORT,
};
use crate::error::ConfigError;

/// Serve a directory over HTTPS and with custom headers.
#[derive(Parser, Debug, Clone)]
#[command(name = "cors-https-server")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Address of interface to bind to.
    #[arg(short, long, default_value = DEFAULT_ADDRESS, value_name = "IP")]
    pub address: String,

    /// Port to listen on.
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_PORT,
        value_name = "PORT",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub port: u16,

    /// "*" or a comma-separated whitelist of origins.
    #[arg(short = 'o', long, value_name = "ORIGINS", conflicts_with = "all_origins")]
    pub origins: Option<String>,

    /// Allow all origins, i.e. echo the Origin of the request.
    #[arg(short = 'O', long)]
    pub all_origins: bool,

    /// Add Access-Control-Allow-Credentials to CORS responses.
    ///
    /// Only meaningful together with --origins or --all-origins; ignored otherwise.
    #[arg(short = 'c', long)]
    pub cors_credentials: bool,

    /// Additional response headers.
    #[arg(short = 'H', long, value_name = "Header: Value", num_args = 0..)]
    pub headers: Vec<String>,

    /// PEM file containing the server certificate.
    #[arg(short = 'C', long, default_value = "./cert.pem", value_name = "FILE")]
    pub cert: PathBuf,

    /// PEM file containing the private key for the server certificate.
    #[arg(short = 'K', long, default_value = "./key.pem", value_name = "FILE")]
    pub key: PathBuf,

    /// Don't use TLS.
    #[arg(short = 'S', long)]
    pub no_ssl: bool,

    /// Directory to serve.
    #[arg(short = 'd', long, default_value = ".", value_name = "DIR")]
    pub directory: PathBuf,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    pub verbose: bool,
}

impl TryFrom<Cli> for ServerConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let extra_headers = cli
            .headers
            .iter()
            .map(|h| h.parse::<ExtraHeader>())
            .collect::<Result<Vec<_>, _>>()?;

        let tls = (!cli.no_ssl).then(|| TlsConfig {
            cert_path: cli.cert,
            key_path: cli.key,
        });

        Ok(ServerConfig {
            address: cli.address,
            port: cli.port,
            root: cli.directory,
            extra_headers,
            origins: OriginPolicy::from_args(cli.origins, cli.all_origins)?,
            allow_credentials: cli.cors_credentials,
            tls,
        })
    }
}
