//! Converts plain-text IRC channel logs into a normalized SQLite database.
//!
//! Senders, buffers and networks are deduplicated through an in-memory
//! [`core::cache::IdentityCache`] mirrored into the store; every decoded line
//! becomes one row in the `log` table.
//!
//! # Examples
//!
//! ```
//! use irclog::{
//!     ingest::driver::{IngestConfig, Ingestor},
//!     parse::timestamp::TimeZoneMode,
//!     persist::sqlite::SqliteLogStore,
//!     types::MessageType,
//! };
//!
//! let store = SqliteLogStore::open_in_memory().expect("open sqlite");
//! let cfg = IngestConfig {
//!     network: "Libera".to_string(),
//!     buffer: "#chat".to_string(),
//!     zone: TimeZoneMode::Utc,
//!     ..IngestConfig::default()
//! };
//! let mut ingestor = Ingestor::new(store, cfg).expect("load cache");
//! let summary = ingestor
//!     .run("2023-06-15T12:00:00  <alice> hello world\n")
//!     .expect("ingest");
//! assert_eq!(summary.messages, 1);
//!
//! let rows = ingestor.store().load_messages().expect("load");
//! assert_eq!(rows[0].kind, MessageType::PrivMsg);
//! assert_eq!(rows[0].text, "hello world");
//! ```

/// In-memory identity cache and index helpers.
pub mod core;
/// Networks, buffers, senders and messages.
pub mod entity;
/// Crate error types.
pub mod error;
/// Ingestion driver, progress and summary.
pub mod ingest;
/// Line cursor, timestamp reader and line decoder.
pub mod parse;
/// Storage abstraction and SQLite implementation.
pub mod persist;
/// Shared primitive types and enums.
pub mod types;

pub use error::{Error, ParseError, Result};
