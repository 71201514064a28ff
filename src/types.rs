//! Shared primitive IDs and the message type enum.

use serde::{Deserialize, Serialize};

/// Storage-assigned network identifier.
pub type NetworkId = i64;
/// Storage-assigned buffer identifier.
pub type BufferId = i64;
/// Storage-assigned sender identifier.
pub type SenderId = i64;
/// Storage-assigned message identifier.
pub type MessageId = i64;

/// Kind of event a log line records.
///
/// The discriminant is the integer code persisted in the `log.type` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    /// `<Nick> text`
    PrivMsg = 0,
    /// `-Nick- text`
    Notice = 1,
    /// `* Nick text`
    Action = 2,
    /// Nick joined the buffer.
    Join = 3,
    /// Nick left the buffer.
    Part = 4,
    /// Nick disconnected.
    Quit = 5,
    /// Nick was kicked.
    Kick = 6,
    /// Nick changed to a new nick.
    NickChange = 7,
    /// Channel or user modes changed.
    ModeChange = 8,
    /// Channel topic changed.
    TopicChange = 9,
}

impl MessageType {
    /// All types in code order.
    pub const ALL: [MessageType; 10] = [
        MessageType::PrivMsg,
        MessageType::Notice,
        MessageType::Action,
        MessageType::Join,
        MessageType::Part,
        MessageType::Quit,
        MessageType::Kick,
        MessageType::NickChange,
        MessageType::ModeChange,
        MessageType::TopicChange,
    ];

    /// Integer code stored in the database.
    pub fn code(self) -> i64 {
        self as u8 as i64
    }

    /// Inverse of [`MessageType::code`].
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
    }
}
