//! SQLite-backed log store.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::{
    entity::{Buffer, Message, MessageDraft, Network, Sender, SenderDraft},
    types::{BufferId, MessageId, MessageType, NetworkId, SenderId},
};

use super::{LogStore, OpContext, PersistError, PersistResult};

const INSERT_NETWORK: &str = "INSERT INTO network (name) VALUES (?1)";
const INSERT_BUFFER: &str = "INSERT INTO buffer (networkid, name) VALUES (?1, ?2)";
const INSERT_SENDER: &str = "INSERT INTO sender (nick, user, host) VALUES (?1, ?2, ?3)";
const INSERT_MESSAGE: &str =
    "INSERT INTO log (timestamp, type, bufferid, senderid, message) VALUES (?1, ?2, ?3, ?4, ?5)";

/// SQLite implementation of [`crate::persist::LogStore`].
pub struct SqliteLogStore {
    conn: Connection,
}

impl SqliteLogStore {
    /// Opens or creates a log database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let conn = Connection::open(path).during("open database")?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory log database.
    pub fn open_in_memory() -> PersistResult<Self> {
        let conn = Connection::open_in_memory().during("open database")?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))
            .during("create schema")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Loads every stored message ordered by id.
    pub fn load_messages(&self) -> PersistResult<Vec<Message>> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, timestamp, type, bufferid, senderid, message FROM log ORDER BY id ASC",
            )
            .during("load messages")?;

        let rows = stmt
            .query_map([], |row| {
                let code: i64 = row.get(2)?;
                let kind = MessageType::from_code(code).ok_or_else(|| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Integer,
                        Box::new(std::io::Error::other(format!("unknown message type {code}"))),
                    )
                })?;
                Ok(Message {
                    id: row.get(0)?,
                    timestamp: row.get(1)?,
                    kind,
                    bufferid: row.get(3)?,
                    senderid: row.get(4)?,
                    text: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                })
            })
            .during("load messages")?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.during("load messages")?);
        }
        Ok(out)
    }

    /// Number of rows in the `log` table.
    pub fn message_count(&self) -> PersistResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM log", [], |row| row.get(0))
            .during("count messages")?;
        Ok(count as u64)
    }
}

impl LogStore for SqliteLogStore {
    fn load_networks(&self) -> PersistResult<Vec<Network>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM network ORDER BY id ASC")
            .during("load networks")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Network {
                    id: row.get(0)?,
                    name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                })
            })
            .during("load networks")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .during("load networks")
    }

    fn load_buffers(&self) -> PersistResult<Vec<Buffer>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, networkid, name FROM buffer ORDER BY id ASC")
            .during("load buffers")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Buffer {
                    id: row.get(0)?,
                    networkid: row.get(1)?,
                    name: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                })
            })
            .during("load buffers")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .during("load buffers")
    }

    fn load_senders(&self) -> PersistResult<Vec<Sender>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, nick, user, host FROM sender ORDER BY id ASC")
            .during("load senders")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Sender {
                    id: row.get(0)?,
                    nick: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                    user: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    host: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                })
            })
            .during("load senders")?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .during("load senders")
    }

    fn insert_network(&mut self, name: &str) -> PersistResult<NetworkId> {
        self.conn
            .prepare_cached(INSERT_NETWORK)
            .and_then(|mut stmt| stmt.execute(params![name]))
            .during("insert network")?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_buffer(&mut self, networkid: NetworkId, name: &str) -> PersistResult<BufferId> {
        self.conn
            .prepare_cached(INSERT_BUFFER)
            .and_then(|mut stmt| stmt.execute(params![networkid, name]))
            .during("insert buffer")?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_sender(&mut self, sender: &SenderDraft) -> PersistResult<SenderId> {
        self.conn
            .prepare_cached(INSERT_SENDER)
            .and_then(|mut stmt| stmt.execute(params![sender.nick, sender.user, sender.host]))
            .during("insert sender")?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_message(&mut self, msg: &MessageDraft) -> PersistResult<MessageId> {
        self.conn
            .prepare_cached(INSERT_MESSAGE)
            .and_then(|mut stmt| {
                stmt.execute(params![
                    msg.timestamp,
                    msg.kind.code(),
                    msg.bufferid,
                    msg.senderid,
                    msg.text,
                ])
            })
            .during("insert message")?;
        Ok(self.conn.last_insert_rowid())
    }

    fn begin(&mut self) -> PersistResult<()> {
        if self.in_transaction() {
            return Err(PersistError::AlreadyInTransaction);
        }
        self.conn.execute_batch("BEGIN").during("begin transaction")
    }

    fn commit(&mut self) -> PersistResult<()> {
        if !self.in_transaction() {
            return Err(PersistError::NotInTransaction("commit"));
        }
        self.conn.execute_batch("COMMIT").during("commit transaction")
    }

    fn in_transaction(&self) -> bool {
        !self.conn.is_autocommit()
    }
}
