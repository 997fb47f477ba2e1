//! Word jumps within a single line.
//!
//! A line is a sequence of runs: runs of spaces and runs of everything else.
//! [`jump_forward`] moves from the cursor to the end of the run it sits on;
//! [`jump_back`] moves to the start of the run just before the cursor.
//! Jumps never leave the line.

/// Byte class for run detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CharClass {
    Blank,
    Word,
}

pub(crate) const fn classify(b: u8) -> CharClass {
    if b == b' ' {
        CharClass::Blank
    } else {
        CharClass::Word
    }
}

/// Column just past the run starting at `col`.
///
/// Returns `col` unchanged when it is at or past the end of `line`.
#[must_use]
pub fn jump_forward(line: &[u8], col: usize) -> usize {
    let Some(&at) = line.get(col) else {
        return col;
    };
    let class = classify(at);
    col + line[col..].iter().take_while(|&&b| classify(b) == class).count()
}

/// Column at the start of the run ending just before `col`.
///
/// Returns `col` unchanged at column 0 or on an empty line.
#[must_use]
pub fn jump_back(line: &[u8], col: usize) -> usize {
    let col = col.min(line.len());
    let Some(&before) = line[..col].last() else {
        return col;
    };
    let class = classify(before);
    col - line[..col]
        .iter()
        .rev()
        .take_while(|&&b| classify(b) == class)
        .count()
}
