//! Position-tracking reader over the raw log text.
//!
//! Every read is bounded by the current line: a field whose delimiter is
//! missing ends at the line break, which is left for [`LineCursor::rest_of_line`]
//! or [`LineCursor::skip_line`] to consume.

/// Cursor over the whole input, tracking the current line for diagnostics.
#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    input: &'a str,
    pos: usize,
    line: u64,
    line_start: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            line_start: 0,
        }
    }

    /// 1-based number of the line the cursor is on.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// 0-based byte offset into the current line.
    pub fn column(&self) -> usize {
        self.pos - self.line_start
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Consumes one character of the current line.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek().filter(|&c| c != '\n')?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skips up to `n` characters without leaving the current line.
    pub fn skip(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    /// Reads exactly `width` ASCII digits.
    ///
    /// Returns `Ok(None)` when the input ends first, and the offending
    /// character when a non-digit is found before `width` digits were read.
    pub fn take_digits(&mut self, width: usize) -> Result<Option<u32>, char> {
        let mut value = 0u32;
        for _ in 0..width {
            match self.peek() {
                None => return Ok(None),
                Some(c) if c.is_ascii_digit() => {
                    value = value * 10 + (c as u32 - '0' as u32);
                    self.pos += 1;
                }
                Some(c) => return Err(c),
            }
        }
        Ok(Some(value))
    }

    /// Reads up to `delim`, consuming it. The second value is false when the
    /// line ended before `delim` was seen.
    pub fn read_until(&mut self, delim: char) -> (String, bool) {
        let line = self.line_remaining();
        match line.find(delim) {
            Some(idx) => {
                let field = line[..idx].to_string();
                self.pos += idx + delim.len_utf8();
                (field, true)
            }
            None => {
                let field = strip_cr(line).to_string();
                self.pos += line.len();
                (field, false)
            }
        }
    }

    /// Advances past the first occurrence of `needle` on the current line.
    /// Returns false, and moves to the line end, when it does not occur.
    pub fn skip_past(&mut self, needle: &str) -> bool {
        let line = self.line_remaining();
        match line.find(needle) {
            Some(idx) => {
                self.pos += idx + needle.len();
                true
            }
            None => {
                self.pos += line.len();
                false
            }
        }
    }

    /// Reads to the end of the line and consumes the line break.
    pub fn rest_of_line(&mut self) -> String {
        let line = self.line_remaining();
        let text = strip_cr(line).to_string();
        self.pos += line.len();
        self.finish_line();
        text
    }

    /// Discards the rest of the line, including the line break.
    pub fn skip_line(&mut self) {
        self.pos += self.line_remaining().len();
        self.finish_line();
    }

    /// Unconsumed text on the current line, without the line break.
    pub fn line_remaining(&self) -> &'a str {
        let rest = self.remaining();
        match rest.find('\n') {
            Some(idx) => &rest[..idx],
            None => rest,
        }
    }

    /// Full text of the current line, regardless of cursor position.
    pub fn current_line(&self) -> &'a str {
        let rest = &self.input[self.line_start..];
        let line = match rest.find('\n') {
            Some(idx) => &rest[..idx],
            None => rest,
        };
        strip_cr(line)
    }

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn finish_line(&mut self) {
        if self.peek() == Some('\n') {
            self.pos += 1;
            self.line += 1;
            self.line_start = self.pos;
        }
    }
}

fn strip_cr(s: &str) -> &str {
    s.strip_suffix('\r').unwrap_or(s)
}
