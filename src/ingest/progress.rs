use std::time::Duration;

use serde::Serialize;

/// Progress snapshot handed out at every batch boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub done: u64,
    pub total: u64,
    pub elapsed: Duration,
}

impl Progress {
    /// Entries per whole second, never dividing by zero.
    pub fn rate(&self) -> u64 {
        self.done / self.elapsed.as_secs().max(1)
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub messages: u64,
    pub lines: u64,
    pub networks_created: u64,
    pub buffers_created: u64,
    pub senders_created: u64,
    pub elapsed_ms: u64,
}

impl IngestSummary {
    pub fn rate(&self) -> u64 {
        self.messages * 1000 / self.elapsed_ms.max(1000)
    }
}

/// Number of lines in `input`, counting a final line without a line break.
pub fn count_lines(input: &str) -> u64 {
    input.lines().count() as u64
}
