//! Replay: push recorded raw events through the normalizer.
//!
//! Input is JSON lines, one raw instrumentation payload per line. Output is
//! one [`NormalizedEvent`](tripwire_core::NormalizedEvent) JSON object per
//! input event, in the same order. Blank lines are skipped.

use std::io::{BufRead, Write};
use thiserror::Error;
use tripwire_core::{Normalizer, Notice, Notifier, RawEvent};

/// Why a replay stopped early.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("i/o error during replay: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: not a raw event object: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode normalized event: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Counts reported once a replay finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub events: usize,
    pub skipped: usize,
}

/// Normalize every event read from `input`, writing one JSON line each to `output`.
pub fn replay<R, W>(normalizer: &Normalizer, input: R, mut output: W) -> Result<ReplayStats, ReplayError>
where
    R: BufRead,
    W: Write,
{
    let mut stats = ReplayStats::default();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            stats.skipped += 1;
            continue;
        }

        let raw: RawEvent = serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
            line: index + 1,
            source,
        })?;
        let event = normalizer.normalize(&raw);

        serde_json::to_writer(&mut output, &event).map_err(ReplayError::Encode)?;
        output.write_all(b"\n")?;
        stats.events += 1;
    }

    output.flush()?;
    tracing::debug!(events = stats.events, skipped = stats.skipped, version = %normalizer.version(), "replay finished");
    Ok(stats)
}

/// Hand a failed replay to `notifier`, with the offending line as a param.
///
/// Delivery errors are logged; the caller still returns `err` itself.
pub fn report_failure<N: Notifier + ?Sized>(notifier: &N, err: &ReplayError) {
    let mut notice = Notice::new(err);
    notice.context.insert("component".into(), "replay".into());
    if let ReplayError::Parse { line, .. } = err {
        notice.params.insert("line".into(), (*line).into());
    }
    if let Err(delivery) = notifier.notify(&notice) {
        tracing::warn!(error = %delivery, "failed to deliver replay failure notice");
    }
}
