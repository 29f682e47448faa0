// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Unified logging initialization.
//!
//! Console output is always on; the `file-logging` feature adds a daily
//! rotating file under `./logs`.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Keeps log writers alive for the lifetime of the process.
///
/// Hold on to this for as long as logging should flush; dropping it is part
/// of orderly teardown.
pub struct LoggingGuard {
    #[cfg(feature = "file-logging")]
    _file_guard: tracing_appender::non_blocking::WorkerGuard,
}

/// Initialize logging with console output.
///
/// `default_level` is the filter used when `RUST_LOG` is not set; the
/// environment always wins so operators can turn individual targets up or
/// down without a config change.
pub fn init_logging(default_level: &str) -> Result<LoggingGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let console_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(env_filter);

    #[cfg(feature = "file-logging")]
    {
        let file_appender = tracing_appender::rolling::daily("./logs", "imu_hub.log");
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true);

        Registry::default()
            .with(console_layer.boxed())
            .with(file_layer.boxed())
            .try_init()?;
        return Ok(LoggingGuard {
            _file_guard: file_guard,
        });
    }

    #[cfg(not(feature = "file-logging"))]
    {
        Registry::default().with(console_layer.boxed()).try_init()?;
        Ok(LoggingGuard {})
    }
}
