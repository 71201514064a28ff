//! In-memory identity cache and index helpers.

/// Identity cache over senders, buffers and networks.
pub mod cache;
/// Helper index aliases.
pub mod indices;
