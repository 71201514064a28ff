//! `** ` lines: joins, parts, kicks, quits, mode, nick and topic changes.
//!
//! These have no positional grammar, so the kind is chosen by scanning the
//! line for each marker in [`SPECIAL_MARKERS`] order; the first hit wins. A
//! reason or topic that happens to contain an earlier marker is misclassified.

use crate::types::MessageType;

/// Special-line kinds, each paired with a marker below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialKind {
    Join,
    Part,
    Kick,
    Quit,
    Mode,
    Nick,
    Topic,
}

/// Markers in match order.
pub const SPECIAL_MARKERS: [(&str, SpecialKind); 7] = [
    ("> has joined ", SpecialKind::Join),
    ("> has left ", SpecialKind::Part),
    ("was kicked by ", SpecialKind::Kick),
    ("> has quit IRC", SpecialKind::Quit),
    (" sets mode: ", SpecialKind::Mode),
    (" is now known as ", SpecialKind::Nick),
    (" changes topic to \"", SpecialKind::Topic),
];

impl SpecialKind {
    /// First marker found in `line`, in table order.
    pub fn classify(line: &str) -> Option<(SpecialKind, &'static str)> {
        SPECIAL_MARKERS
            .iter()
            .find(|(marker, _)| line.contains(marker))
            .map(|&(marker, kind)| (kind, marker))
    }

    pub fn message_type(self) -> MessageType {
        match self {
            SpecialKind::Join => MessageType::Join,
            SpecialKind::Part => MessageType::Part,
            SpecialKind::Kick => MessageType::Kick,
            SpecialKind::Quit => MessageType::Quit,
            SpecialKind::Mode => MessageType::ModeChange,
            SpecialKind::Nick => MessageType::NickChange,
            SpecialKind::Topic => MessageType::TopicChange,
        }
    }
}
