//! Ingestion driver: decode lines, write messages, commit in timed batches.

/// Driver loop and configuration.
pub mod driver;
/// Log file reading and decoding.
pub mod input;
/// Progress snapshots and line counting.
pub mod progress;
