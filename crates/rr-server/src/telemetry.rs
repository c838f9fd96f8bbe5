//! Log output via `tracing_subscriber`.
//!
//! The filter comes from `RUST_LOG` when set, e.g.
//!
//! ```bash
//! RUST_LOG=rr_server=debug,rr_spatial=debug,tower_http=debug
//! ```
//!
//! and falls back to `default_filter` otherwise.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Install the global subscriber.  Call once, early in `main`.
pub fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
