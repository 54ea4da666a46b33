//! Logging setup.
//!
//! `RUST_LOG` overrides the default filter when set.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "cors_https_server=debug,tower_http=debug"
    } else {
        "cors_https_server=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
