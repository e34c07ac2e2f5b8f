//! Tracing setup for hosts that do not install their own subscriber.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "totp_sync=info";

/// Install a fmt subscriber honoring `RUST_LOG`, if none is set yet.
///
/// Returns true if this call installed the subscriber.
pub fn init_tracing_once() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
