//! One line of text: a byte buffer closed by a terminator.
//!
//! An occupied line stores its content followed by a single terminator byte
//! (`0`). An empty line owns no storage at all. Columns range over
//! `[0, len]`, where `len` is the content length; column `len` is the slot
//! the terminator occupies, so typing there overwrites the terminator and
//! appends a fresh one.

use std::fmt;

use crate::growable::GrowBuf;

/// The byte closing every occupied line.
pub const TERMINATOR: u8 = 0;

/// Growth step for line buffers.
pub const LINE_CHUNK: usize = 16;

/// A line of the document.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Line {
    /// No content and no storage.
    #[default]
    Empty,
    /// Content bytes followed by the terminator.
    Occupied(GrowBuf<u8>),
}

impl Line {
    /// Copy `bytes` into a new line. An empty slice gives [`Line::Empty`].
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self::Empty;
        }

        let mut buf = GrowBuf::with_chunk(LINE_CHUNK);
        buf.extend_from_slice(bytes);
        buf.append(TERMINATOR);
        Self::Occupied(buf)
    }

    /// The content bytes, without the terminator.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Occupied(buf) => buf.as_slice().split_last().map_or(&[], |(_, content)| content),
        }
    }

    /// Content length in bytes; also the largest valid column.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content().len()
    }

    /// True for a line without storage.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The byte in the terminator slot, if the line has storage.
    #[must_use]
    pub fn terminator(&self) -> Option<u8> {
        match self {
            Self::Empty => None,
            Self::Occupied(buf) => buf.last().copied(),
        }
    }

    /// False when the terminator slot holds anything but [`TERMINATOR`].
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminator().is_none_or(|b| b == TERMINATOR)
    }

    /// Allocated bytes backing the line.
    #[must_use]
    pub fn capacity(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Occupied(buf) => buf.capacity(),
        }
    }

    // -----------------------------------------------------------------------
    // Splicing
    // -----------------------------------------------------------------------

    /// Insert `byte` at `col`. A column at or past the end writes into the
    /// terminator slot and appends a fresh terminator.
    pub fn insert_byte(&mut self, col: usize, byte: u8) {
        match self {
            Self::Empty => {
                let mut buf = GrowBuf::with_chunk(LINE_CHUNK);
                buf.append(byte);
                buf.append(TERMINATOR);
                *self = Self::Occupied(buf);
            }
            Self::Occupied(buf) => {
                if col >= buf.len().saturating_sub(1) {
                    if let Some(slot) = buf.last_mut() {
                        *slot = byte;
                    }
                    buf.append(TERMINATOR);
                } else {
                    buf.insert(col, byte);
                }
            }
        }
    }

    /// Remove the byte before `col` and return it.
    ///
    /// Removing the last content byte turns the line back into
    /// [`Line::Empty`]. Column 0 removes nothing.
    pub fn remove_before(&mut self, col: usize) -> Option<u8> {
        let Self::Occupied(buf) = self else {
            return None;
        };
        if col == 0 {
            return None;
        }

        let removed = buf.remove((col - 1).min(buf.len().saturating_sub(2)));
        if buf.len() <= 1 {
            *self = Self::Empty;
        }
        removed
    }

    /// Cut the line at `col`, returning everything from `col` on as a new
    /// line. Both halves stay terminated. A column at or past the end cuts
    /// nothing and returns [`Line::Empty`]; column 0 moves the whole line.
    pub fn split_off(&mut self, col: usize) -> Self {
        if col == 0 {
            return std::mem::take(self);
        }
        let Self::Occupied(buf) = self else {
            return Self::Empty;
        };
        if col >= buf.len().saturating_sub(1) {
            return Self::Empty;
        }

        let mut tail = GrowBuf::with_chunk(LINE_CHUNK);
        buf.split_into(&mut tail, col);
        buf.append(TERMINATOR);
        Self::Occupied(tail)
    }

    /// Append `other`'s content to this line, dropping this line's
    /// terminator in favour of `other`'s.
    pub fn merge(&mut self, other: Self) {
        let Self::Occupied(tail) = other else {
            return;
        };

        match self {
            Self::Empty => *self = Self::Occupied(tail),
            Self::Occupied(buf) => {
                buf.remove(buf.len());
                buf.join(tail);
            }
        }
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Line::Empty"),
            Self::Occupied(_) => {
                write!(f, "Line({:?}", String::from_utf8_lossy(self.content()))?;
                match self.terminator() {
                    Some(TERMINATOR) | None => f.write_str(")"),
                    Some(other) => write!(f, ", terminator: {other:#04x})"),
                }
            }
        }
    }
}
