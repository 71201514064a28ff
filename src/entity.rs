//! Dimension entities (network, buffer, sender) and log messages.

use serde::{Deserialize, Serialize};

use crate::types::{BufferId, MessageId, MessageType, NetworkId, SenderId};

/// A named IRC network grouping buffers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Storage-assigned id.
    pub id: NetworkId,
    /// Network name, matched case-sensitively.
    pub name: String,
}

/// A channel or query target within a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buffer {
    /// Storage-assigned id.
    pub id: BufferId,
    /// Owning network.
    pub networkid: NetworkId,
    /// Buffer name, e.g. `#chat`.
    pub name: String,
}

/// Point-in-time `nick!user@host` snapshot.
///
/// Senders are never mutated; a changed field means a new row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    /// Storage-assigned id.
    pub id: SenderId,
    /// Nickname.
    pub nick: String,
    /// Ident, empty when unknown.
    pub user: String,
    /// Hostname, empty when unknown.
    pub host: String,
}

impl Sender {
    /// Identity key of this sender.
    pub fn key(&self) -> SenderDraft {
        SenderDraft {
            nick: self.nick.clone(),
            user: self.user.clone(),
            host: self.host.clone(),
        }
    }
}

/// Sender identity triple before an id has been assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SenderDraft {
    /// Nickname.
    pub nick: String,
    /// Ident, empty when unknown.
    pub user: String,
    /// Hostname, empty when unknown.
    pub host: String,
}

impl SenderDraft {
    /// Triple with empty user and host, as seen on plain chat lines.
    pub fn nick_only(nick: impl Into<String>) -> Self {
        Self {
            nick: nick.into(),
            ..Self::default()
        }
    }
}

/// A stored log row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Storage-assigned id.
    pub id: MessageId,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Event type.
    pub kind: MessageType,
    /// Buffer the event happened in.
    pub bufferid: BufferId,
    /// Sender the event is attributed to.
    pub senderid: SenderId,
    /// Type-dependent payload: chat body, reason, new nick, mode string or topic.
    pub text: String,
}

/// Message payload handed to storage; ids are already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDraft {
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Event type.
    pub kind: MessageType,
    /// Buffer the event happened in.
    pub bufferid: BufferId,
    /// Sender the event is attributed to.
    pub senderid: SenderId,
    /// Type-dependent payload.
    pub text: String,
}
