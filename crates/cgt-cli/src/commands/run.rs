//! `cgt run`: the stdin -> stdout processing loop.

use anyhow::{Context, Result};
use cgt_engine::LineProcessor;
use std::io;
use tracing::info;

use super::load_config;

pub fn run_stdin(config_paths: &[String]) -> Result<()> {
    let loaded = load_config(config_paths)?;
    let processor =
        LineProcessor::from_config(&loaded.config).context("failed to build line processor")?;

    info!(
        config_hash = %loaded.config_hash,
        streak_limit = loaded.config.account.error_streak_limit,
        "run start"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let summary = processor.run_lines(stdin.lock(), stdout.lock())?;

    info!(
        lines = summary.lines,
        payloads = summary.payloads,
        skipped = summary.skipped,
        "run end"
    );
    Ok(())
}
