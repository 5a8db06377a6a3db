//! Structured logging

use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    error::{Error, Result},
};

/// Install the global JSON subscriber.
///
/// `service.log_level` is read as an `EnvFilter` directive; anything that
/// does not parse falls back to `info`. Fails if a subscriber is already set.
pub fn init_tracing(config: &Config) -> Result<()> {
    let log_level = config.service.log_level.clone();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init()
        .map_err(|e| Error::Internal(format!("Failed to initialize tracing: {}", e)))?;

    tracing::info!(
        environment = %config.service.environment,
        "Tracing initialized for service: {}",
        config.service.name
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_an_error() {
        let mut config = Config::default();
        config.service.log_level = "not a [valid directive".to_string();
        // Only one global subscriber can be installed per process.
        let _ = init_tracing(&config);
        assert!(init_tracing(&config).is_err());
    }
}
