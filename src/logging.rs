//! Log setup for the CLI.
//!
//! Logs go to stderr so that transcripts and markup on stdout can be piped.
//! `RUST_LOG` wins over `-v` when it is set.
//!
//! | flag    | level |
//! |---------|-------|
//! | (none)  | warn  |
//! | `-v`    | info  |
//! | `-vv`   | debug |
//! | `-vvv`  | trace |

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

pub fn init_logging(verbosity: u8) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity).as_str().to_lowercase()));

    let layer = fmt::layer()
        .compact()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;
    Ok(())
}
