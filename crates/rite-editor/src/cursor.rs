//! Cursor position within a document.
//!
//! Both coordinates are **0-indexed** byte offsets: `row` selects a line,
//! `col` a byte within it. Column `len` (one past the last content byte) is
//! valid and is where typed bytes append. Clamping against the document is
//! the editor's job; a bare `Cursor` is just a pair of numbers.

use std::fmt;

/// A (row, col) position, both 0-indexed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    /// Row 0, column 0.
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    #[inline]
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cur({}:{})", self.row, self.col)
    }
}
