//! Line classification and decoding.
//!
//! Each log line is `<timestamp>  <body>`. The first character of the body
//! picks the grammar:
//!
//! | lead   | grammar                          |
//! |--------|----------------------------------|
//! | `<`    | `<Nick> text` (privmsg)          |
//! | `-`    | `-Nick- text` (notice)           |
//! | `* `   | `* Nick text` (action)           |
//! | `**`   | special line, see [`special`]    |
//! | digit  | duplicated timestamp, read again |

/// Position-tracking cursor.
pub mod cursor;
/// Special-line marker table.
pub mod special;
/// Timestamp reader.
pub mod timestamp;

use tracing::warn;

use crate::{
    core::cache::IdentityCache,
    entity::SenderDraft,
    error::{Error, ParseError},
    persist::{LogStore, PersistError},
    types::{MessageType, SenderId},
};

use self::{
    cursor::LineCursor,
    special::SpecialKind,
    timestamp::{TimeZoneMode, TimestampError, read_timestamp},
};

/// Width of the delimiter between the timestamp and the body.
const TIMESTAMP_DELIM_WIDTH: usize = 2;

/// One decoded line with its sender resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// 1-based line number the event was read from.
    pub line: u64,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Event type.
    pub kind: MessageType,
    /// Sender the event is attributed to.
    pub senderid: SenderId,
    /// Type-dependent payload.
    pub text: String,
}

/// Grammar chosen from a line's lead characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    PrivMsg,
    Notice,
    Action,
    Special,
}

enum DecodeError {
    Parse(ParseError),
    Storage(PersistError),
}

impl From<ParseError> for DecodeError {
    fn from(value: ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<PersistError> for DecodeError {
    fn from(value: PersistError) -> Self {
        Self::Storage(value)
    }
}

type DecodeResult<T> = Result<T, DecodeError>;

fn unrecognized(reason: &'static str) -> DecodeError {
    DecodeError::Parse(ParseError::UnrecognizedLineFormat { reason })
}

/// Streaming decoder over a whole log.
///
/// Resolves every sender through the [`IdentityCache`] before handing out an
/// event, so ids in a [`LogEvent`] always exist in the store.
pub struct LineParser<'a> {
    cursor: LineCursor<'a>,
    zone: TimeZoneMode,
}

impl<'a> LineParser<'a> {
    pub fn new(input: &'a str, zone: TimeZoneMode) -> Self {
        Self {
            cursor: LineCursor::new(input),
            zone,
        }
    }

    /// Line number the next call will start reading.
    pub fn line(&self) -> u64 {
        self.cursor.line()
    }

    /// Decodes the next line. `Ok(None)` means the input ended cleanly.
    pub fn next_event<S: LogStore + ?Sized>(
        &mut self,
        cache: &mut IdentityCache,
        store: &mut S,
    ) -> Result<Option<LogEvent>, Error> {
        if self.cursor.is_eof() || self.at_trailing_blank() {
            return Ok(None);
        }

        let line = self.cursor.line();
        let content = self.cursor.current_line();
        match self.decode_line(cache, store) {
            Ok(event) => {
                if self.cursor.line() == line {
                    self.cursor.skip_line();
                }
                Ok(event)
            }
            Err(DecodeError::Storage(err)) => Err(Error::Storage(err)),
            Err(DecodeError::Parse(source)) => {
                let column = self.cursor.column();
                warn!(line, column, error = %source, "corrupt log line");
                Err(Error::Corrupt {
                    line,
                    column,
                    content: content.to_string(),
                    source,
                })
            }
        }
    }

    fn at_trailing_blank(&self) -> bool {
        let mut probe = self.cursor.clone();
        loop {
            if probe.is_eof() {
                return true;
            }
            if !probe.line_remaining().trim().is_empty() {
                return false;
            }
            probe.skip_line();
        }
    }

    fn decode_line<S: LogStore + ?Sized>(
        &mut self,
        cache: &mut IdentityCache,
        store: &mut S,
    ) -> DecodeResult<Option<LogEvent>> {
        let line = self.cursor.line();
        let Some(mut timestamp) = self.timestamp()? else {
            return Ok(None);
        };
        self.cursor.skip(TIMESTAMP_DELIM_WIDTH);

        // Some logs carry a stray duplicate timestamp before the real body.
        loop {
            match self.cursor.peek() {
                None => return Ok(None),
                Some(c) if c.is_ascii_digit() => {
                    let Some(again) = self.timestamp()? else {
                        return Ok(None);
                    };
                    timestamp = again;
                    self.cursor.skip(TIMESTAMP_DELIM_WIDTH);
                }
                Some(_) => break,
            }
        }

        let (kind, senderid, text) = match classify(&mut self.cursor)? {
            LineKind::PrivMsg => self.generic(MessageType::PrivMsg, '>', 1, cache, store)?,
            LineKind::Notice => self.generic(MessageType::Notice, '-', 1, cache, store)?,
            LineKind::Action => self.generic(MessageType::Action, ' ', 0, cache, store)?,
            LineKind::Special => self.special(cache, store)?,
        };

        Ok(Some(LogEvent {
            line,
            timestamp,
            kind,
            senderid,
            text,
        }))
    }

    fn timestamp(&mut self) -> DecodeResult<Option<i64>> {
        match read_timestamp(&mut self.cursor, self.zone) {
            Ok(ts) => Ok(Some(ts)),
            Err(TimestampError::Truncated) => Ok(None),
            Err(TimestampError::Malformed(field)) => {
                Err(ParseError::MalformedTimestamp { field }.into())
            }
        }
    }

    /// `<Nick> text`, `-Nick- text` and `* Nick text`.
    fn generic<S: LogStore + ?Sized>(
        &mut self,
        kind: MessageType,
        delim: char,
        skip: usize,
        cache: &mut IdentityCache,
        store: &mut S,
    ) -> DecodeResult<(MessageType, SenderId, String)> {
        let (nick, _) = self.cursor.read_until(delim);
        let senderid = cache.nick_sender(store, &nick)?.id;
        self.cursor.skip(skip);
        Ok((kind, senderid, self.cursor.rest_of_line()))
    }

    fn special<S: LogStore + ?Sized>(
        &mut self,
        cache: &mut IdentityCache,
        store: &mut S,
    ) -> DecodeResult<(MessageType, SenderId, String)> {
        let (kind, marker) = SpecialKind::classify(self.cursor.line_remaining())
            .ok_or_else(|| unrecognized("no special-line marker"))?;
        let cursor = &mut self.cursor;

        let (senderid, text) = match kind {
            SpecialKind::Join => {
                let senderid = full_capture(cursor, cache, store)?;
                cursor.skip_line();
                (senderid, String::new())
            }
            SpecialKind::Part => {
                let senderid = full_capture(cursor, cache, store)?;
                (senderid, read_optional_reason(cursor))
            }
            SpecialKind::Quit => {
                let senderid = full_capture(cursor, cache, store)?;
                cursor.skip_past("(");
                (senderid, strip_one(cursor.rest_of_line(), ')'))
            }
            SpecialKind::Kick => {
                // The kicked nick, not the kicker, is the sender.
                let senderid = nick_capture(cursor, cache, store)?;
                cursor.skip_past(marker);
                let (mut text, hit_space) = cursor.read_until(' ');
                if hit_space {
                    let reason = read_optional_reason(cursor);
                    if !reason.is_empty() {
                        text.push(' ');
                        text.push_str(&reason);
                    }
                }
                (senderid, text)
            }
            SpecialKind::Mode => {
                let senderid = nick_capture(cursor, cache, store)?;
                cursor.skip_past(":");
                cursor.skip(1);
                (senderid, cursor.rest_of_line())
            }
            SpecialKind::Nick => {
                let old = {
                    let (nick, _) = cursor.read_until(' ');
                    cache.nick_sender(store, &nick)?.clone()
                };
                cursor.skip_past(marker.trim_start());
                let new_nick = cursor.rest_of_line();
                cache.sender(
                    store,
                    SenderDraft {
                        nick: new_nick.clone(),
                        user: old.user,
                        host: old.host,
                    },
                )?;
                (old.id, new_nick)
            }
            SpecialKind::Topic => {
                let senderid = nick_capture(cursor, cache, store)?;
                cursor.skip_past(marker.trim_start());
                (senderid, strip_one(cursor.rest_of_line(), '"'))
            }
        };

        Ok((kind.message_type(), senderid, text))
    }
}

/// Picks the grammar from the lead characters and consumes them.
pub fn classify(cursor: &mut LineCursor<'_>) -> Result<LineKind, ParseError> {
    let bad = |reason| ParseError::UnrecognizedLineFormat { reason };
    match cursor.bump() {
        Some('<') => Ok(LineKind::PrivMsg),
        Some('-') => Ok(LineKind::Notice),
        Some('*') => match cursor.bump() {
            Some(' ') => Ok(LineKind::Action),
            Some('*') => {
                while cursor.peek() == Some('*') {
                    cursor.bump();
                }
                if cursor.peek() == Some(' ') {
                    cursor.bump();
                }
                Ok(LineKind::Special)
            }
            _ => Err(bad("expected '* ' or '**'")),
        },
        _ => Err(bad("unknown lead character")),
    }
}

/// `Nick <nick!user@host>`: the leading token is discarded, the bracketed
/// triple is resolved by exact match.
fn full_capture<S: LogStore + ?Sized>(
    cursor: &mut LineCursor<'_>,
    cache: &mut IdentityCache,
    store: &mut S,
) -> DecodeResult<SenderId> {
    cursor.read_until(' ');
    if cursor.peek() == Some('<') {
        cursor.bump();
    }
    let (nick, _) = cursor.read_until('!');
    let (user, _) = cursor.read_until('@');
    let (host, _) = cursor.read_until('>');
    Ok(cache.sender(store, SenderDraft { nick, user, host })?.id)
}

/// Leading nick token resolved with the nick-only heuristic.
fn nick_capture<S: LogStore + ?Sized>(
    cursor: &mut LineCursor<'_>,
    cache: &mut IdentityCache,
    store: &mut S,
) -> DecodeResult<SenderId> {
    let (nick, _) = cursor.read_until(' ');
    Ok(cache.nick_sender(store, &nick)?.id)
}

/// Text inside a trailing `(...)`, or empty when the line has no `(`.
/// Consumes the rest of the line either way.
pub fn read_optional_reason(cursor: &mut LineCursor<'_>) -> String {
    while let Some(c) = cursor.bump() {
        if c == '(' {
            return strip_one(cursor.rest_of_line(), ')');
        }
    }
    cursor.skip_line();
    String::new()
}

fn strip_one(mut text: String, suffix: char) -> String {
    if text.ends_with(suffix) {
        text.pop();
    }
    text
}
