use anyhow::Result;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LogFormat;

/// Initialize tracing and logging
///
/// `RUST_LOG` takes precedence over `log_level` when set. `Json` emits one
/// structured record per line, `Pretty` is meant for a console.
pub fn init_observability(
    service_name: &str,
    service_version: &str,
    log_level: &str,
    format: LogFormat,
) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json().with_filter(env_filter))
                .try_init()?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_line_number(true)
                        .with_filter(env_filter),
                )
                .try_init()?;
        }
    }

    tracing::info!(
        service.name = service_name,
        service.version = service_version,
        log.format = %format,
        "Observability initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_observability_only_once() {
        let first = init_observability("habitrack-test", "0.0.0", "debug", LogFormat::Pretty);
        let second = init_observability("habitrack-test", "0.0.0", "debug", LogFormat::Json);

        // a global subscriber can only be installed once per process
        assert!(first.is_ok());
        assert!(second.is_err());
    }
}
