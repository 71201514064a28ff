pub mod sqlite;

use thiserror::Error;

use crate::{
    entity::{Buffer, MessageDraft, Network, Sender, SenderDraft},
    types::{BufferId, MessageId, NetworkId, SenderId},
};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("{op} failed: {source}")]
    Operation {
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },
    #[error("{0} called with no open transaction")]
    NotInTransaction(&'static str),
    #[error("begin called while a transaction is already open")]
    AlreadyInTransaction,
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Attaches the name of the failing storage operation to a rusqlite error.
pub(crate) trait OpContext<T> {
    fn during(self, op: &'static str) -> PersistResult<T>;
}

impl<T> OpContext<T> for rusqlite::Result<T> {
    fn during(self, op: &'static str) -> PersistResult<T> {
        self.map_err(|source| PersistError::Operation { op, source })
    }
}

/// Relational store the ingestion core writes into.
///
/// Dimension rows are loaded once, ascending by id, to seed the identity cache.
/// Inserts return the id the store assigned.
pub trait LogStore {
    fn load_networks(&self) -> PersistResult<Vec<Network>>;
    fn load_buffers(&self) -> PersistResult<Vec<Buffer>>;
    fn load_senders(&self) -> PersistResult<Vec<Sender>>;

    fn insert_network(&mut self, name: &str) -> PersistResult<NetworkId>;
    fn insert_buffer(&mut self, networkid: NetworkId, name: &str) -> PersistResult<BufferId>;
    fn insert_sender(&mut self, sender: &SenderDraft) -> PersistResult<SenderId>;
    fn insert_message(&mut self, msg: &MessageDraft) -> PersistResult<MessageId>;

    fn begin(&mut self) -> PersistResult<()>;
    fn commit(&mut self) -> PersistResult<()>;
    fn in_transaction(&self) -> bool;
}
