//! Tracing subscriber setup.
//!
//! Console output defaults to a compact human format; `LOG_FORMAT=json`
//! switches to newline-delimited JSON for log shippers. Filtering follows
//! `RUST_LOG` with a development-friendly default.

use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize the tracing subscriber for the whole process.
///
/// Must be called once, before any other code emits tracing events.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "linkfolio=debug,tower_http=debug".into());

    let json_output = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .init();
    }

    Ok(())
}
