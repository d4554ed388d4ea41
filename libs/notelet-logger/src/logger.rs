use std::io::{stderr, stdout};

use tracing::Level;
use tracing_subscriber::{prelude::*, EnvFilter};

#[inline]
pub fn init_logger() {
    let writer = stderr
        .with_max_level(Level::WARN)
        .or_else(stdout.with_max_level(if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        }));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cfg!(debug_assertions) { "debug" } else { "info" })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().map_writer(move |_| writer))
        .init();
}
