use std::borrow::Cow;
use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use cgt_tax::TaxPolicy;
use tracing::{debug, warn};

use crate::framing::split_payloads;
use crate::processor::LineProcessor;

/// Counters for one [`LineProcessor::run_lines`] call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Non-blank lines read.
    pub lines: usize,
    /// Payloads processed and written.
    pub payloads: usize,
    /// Payloads skipped because they did not parse.
    pub skipped: usize,
}

impl<P: TaxPolicy> LineProcessor<P> {
    /// Read lines until EOF or the first blank line and write one compact
    /// JSON array per processed payload, each followed by `\n`.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD; the line is
    /// still processed.
    pub fn run_lines<R: BufRead, W: Write>(&self, mut reader: R, mut writer: W) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut buf = Vec::new();

        for n in 1.. {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("failed to read input line {n}"))?;
            if read == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            if let Cow::Owned(_) = line {
                warn!(line = n, "input line is not valid UTF-8; invalid bytes replaced");
            }
            let trimmed = line.trim_start_matches('\u{feff}').trim();
            if trimmed.is_empty() {
                break;
            }
            summary.lines += 1;

            let payloads = split_payloads(trimmed);
            debug!(line = n, payloads = payloads.len(), "line read");

            for payload in payloads {
                let Some(results) = self.process_or_skip(payload) else {
                    summary.skipped += 1;
                    continue;
                };
                serde_json::to_writer(&mut writer, &results).context("failed to encode results")?;
                writer.write_all(b"\n").context("failed to write output")?;
                summary.payloads += 1;
            }
            writer.flush().context("failed to flush output")?;
        }

        Ok(summary)
    }
}
