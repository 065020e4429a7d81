//! Tracing initialization.

use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize console tracing with a compact event format.
///
/// The filter comes from `RUST_LOG` when set; the fallback enables debug
/// logging for the gateway crates and `tower_http`.
pub fn init_telemetry() {
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "lectern_api=debug,lectern_db=debug,lectern_storage=debug,tower_http=debug".into()
        }))
        .with(console_fmt)
        .init();
}
