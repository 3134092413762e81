use std::fmt;

use crate::error::CursorError;
use crate::logging::Loggable;
use crate::util;

/// An immutable position over a source buffer.
///
/// A cursor is a lightweight value: a byte offset plus derived line/column
/// counters over a shared, unmodified `&str`. Stepping never mutates in
/// place; `advance` hands back a fresh cursor so earlier positions stay
/// valid for backtracking and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'s> {
    source: &'s str,
    offset: usize,
    line: u32,
    column: u32,
}

/// A decoded character together with the 1-based line and column it was
/// read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionedChar {
    line: u32,
    column: u32,
    value: char,
}

impl PositionedChar {
    pub(crate) fn new(line: u32, column: u32, value: char) -> Self {
        Self { line, column, value }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn value(&self) -> char {
        self.value
    }
}

impl<'s> From<&'s str> for Cursor<'s> {
    #[inline]
    fn from(s: &'s str) -> Self {
        let cur = Self {
            source: s,
            offset: 0,
            line: 1,
            column: 1,
        };
        cur.log_success("Cursor::from", "");
        cur
    }
}

// an absent buffer reads as an immediately-EOF cursor
impl<'s> From<Option<&'s str>> for Cursor<'s> {
    #[inline]
    fn from(s: Option<&'s str>) -> Self {
        Self::from(s.unwrap_or_default())
    }
}

impl<'s> fmt::Display for Cursor<'s> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}:{} {}",
            self.line,
            self.column,
            util::formatter_str(self.remaining())
        )
    }
}

impl<'s> Cursor<'s> {
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    #[inline]
    pub fn has_value(&self) -> bool {
        !self.is_eof()
    }

    /// Byte offset into the source. Monotonically non-decreasing along any
    /// chain of advances derived from one cursor.
    #[inline]
    pub fn pos(&self) -> usize {
        self.offset
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub(crate) fn remaining(&self) -> &'s str {
        &self.source[self.offset..]
    }

    /// The character under the cursor with its position. Calling this at
    /// end of input is a usage error.
    pub fn current(&self) -> Result<PositionedChar, CursorError> {
        let ch = self
            .remaining()
            .chars()
            .next()
            .ok_or(CursorError::EndOfInput { action: "current" })?;
        Ok(PositionedChar::new(self.line, self.column, ch))
    }

    /// Steps over the character under the cursor, then swallows any run of
    /// line breaks that immediately follows it: each `'\n'` consumed resets
    /// the column to 1 and bumps the line, so the caller sees a single
    /// logical step. Calling this at end of input is a usage error.
    pub fn advance(&self) -> Result<Cursor<'s>, CursorError> {
        let ch = self
            .remaining()
            .chars()
            .next()
            .ok_or(CursorError::EndOfInput { action: "advance" })?;
        let mut offset = self.offset + ch.len_utf8();
        let mut line = self.line;
        let mut column = self.column + 1;
        while self.source[offset..].starts_with('\n') {
            offset += 1;
            column = 1;
            line += 1;
        }
        let cur = Cursor {
            source: self.source,
            offset,
            line,
            column,
        };
        cur.log_success("Cursor::advance", ch);
        Ok(cur)
    }

    /// `current` and `advance` in one step, for callers that have already
    /// ruled EOF out or treat it as a plain mismatch.
    pub(crate) fn step(&self) -> Option<(PositionedChar, Cursor<'s>)> {
        match (self.current(), self.advance()) {
            (Ok(current), Ok(next)) => Some((current, next)),
            _ => None,
        }
    }
}
