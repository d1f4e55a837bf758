// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "seller.log";
const LOG_ENV: &str = "SELLER_LOG";

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Route tracing output to a daily rolling file under `dir`. The terminal
/// belongs to the UI, so nothing is written to stderr.
pub fn init_logging(dir: &Path, level: &str) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create log directory {}", dir.display()))?;
    let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    let _ = LOG_GUARD.set(guard);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_ansi(false)
        .with_writer(non_blocking)
        .try_init()
        .map_err(|error| anyhow!("initialize logging: {error}"))
}

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level))
}

#[cfg(test)]
mod tests {
    use super::init_logging;
    use anyhow::Result;

    #[test]
    fn init_creates_log_directory_and_rejects_second_subscriber() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let dir = temp.path().join("nested").join("logs");
        let first = init_logging(&dir, "debug");
        assert!(dir.is_dir());
        if first.is_ok() {
            tracing::info!("logging initialized");
            let second = init_logging(&dir, "debug");
            assert!(second.is_err());
        }
        Ok(())
    }
}
