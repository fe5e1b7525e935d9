use tracing_error::ErrorLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::{GameError, GameResult};
use crate::formatter::FrameFormatter;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `default_directive` when it is set and valid.
///
/// # Errors
///
/// Fails if the directive does not parse or a global subscriber is already installed.
pub fn init(default_directive: &str) -> GameResult<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|error| GameError::InvalidState(format!("invalid log filter '{default_directive}': {error}")))?,
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(FrameFormatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .try_init()
        .map_err(|error| GameError::InvalidState(format!("failed to install log subscriber: {error}")))
}
