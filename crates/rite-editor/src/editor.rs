//! Cursor navigation and text edits over a [`Document`].
//!
//! The [`Editor`] owns the document and the cursor. Every operation is
//! total: targets outside the document are clamped, and edits that have
//! nothing to act on do nothing. After any call the cursor satisfies
//! `row < line_count` (or `row == 0` with no lines) and
//! `col <= line(row).len()`.

use tracing::trace;

use crate::cursor::Cursor;
use crate::document::Document;
use crate::error::DocumentError;
use crate::line::Line;
use crate::word;

/// A document plus the cursor editing it.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    cursor: Cursor,
}

/// Clamp a signed target into `[0, max]`.
fn clamp_index(target: isize, max: usize) -> usize {
    usize::try_from(target).map_or(0, |t| t.min(max))
}

fn signed(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

impl Editor {
    /// Start editing `document` at the origin.
    #[must_use]
    pub const fn new(document: Document) -> Self {
        Self {
            document,
            cursor: Cursor::ORIGIN,
        }
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Save the document.
    ///
    /// # Errors
    ///
    /// See [`Document::save`].
    pub fn save(&mut self) -> Result<usize, DocumentError> {
        self.document.save()
    }

    fn current_line(&self) -> Option<&Line> {
        self.document.line(self.cursor.row)
    }

    // -----------------------------------------------------------------------
    // Navigation
    // -----------------------------------------------------------------------

    /// Move to row `target`, clamped to the document, then re-clamp the
    /// column against the new line.
    pub fn move_row(&mut self, target: isize) {
        let count = self.document.line_count();
        if count == 0 {
            self.cursor = Cursor::ORIGIN;
            return;
        }

        self.cursor.row = clamp_index(target, count - 1);
        self.move_col(signed(self.cursor.col));
    }

    /// Move to column `target`, clamped to `[0, len]` of the current line.
    pub fn move_col(&mut self, target: isize) {
        if let Some(len) = self.current_line().map(Line::len) {
            self.cursor.col = clamp_index(target, len);
        }
    }

    pub fn move_up(&mut self) {
        self.move_row(signed(self.cursor.row) - 1);
    }

    pub fn move_down(&mut self) {
        self.move_row(signed(self.cursor.row).saturating_add(1));
    }

    pub fn move_left(&mut self) {
        self.move_col(signed(self.cursor.col) - 1);
    }

    pub fn move_right(&mut self) {
        self.move_col(signed(self.cursor.col).saturating_add(1));
    }

    pub fn home(&mut self) {
        self.move_col(0);
    }

    pub fn end(&mut self) {
        self.move_col(isize::MAX);
    }

    /// Move to the end of the run of spaces or non-spaces under the cursor.
    pub fn jump_forward(&mut self) {
        if let Some(line) = self.current_line() {
            self.cursor.col = word::jump_forward(line.content(), self.cursor.col);
        }
    }

    /// Move to the start of the run of spaces or non-spaces before the cursor.
    pub fn jump_back(&mut self) {
        if let Some(line) = self.current_line() {
            self.cursor.col = word::jump_back(line.content(), self.cursor.col);
        }
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    /// Insert `byte` at the cursor and advance one column.
    pub fn type_byte(&mut self, byte: u8) {
        let Cursor { row, col } = self.cursor;
        let Some(line) = self.document.line_mut(row) else {
            return;
        };

        line.insert_byte(col, byte);
        debug_assert!(line.is_terminated(), "row {row} lost its terminator");
        self.document.mark_dirty();
        self.move_col(signed(col).saturating_add(1));
    }

    /// Backspace.
    ///
    /// On an empty line below the first, deletes the line and lands at the
    /// end of the one above. At column 0, merges the line into the one above.
    /// Otherwise removes the byte before the cursor.
    pub fn erase(&mut self) {
        let Cursor { row, col } = self.cursor;
        let Some(current) = self.current_line() else {
            return;
        };

        if current.is_empty() && row > 0 {
            trace!(row, "erase: drop empty line");
            self.document.remove_line(row);
            self.document.mark_dirty();
            self.move_row(signed(row) - 1);
            self.end();
        } else if col == 0 {
            if row == 0 {
                return;
            }
            let Some(current) = self.document.remove_line(row) else {
                return;
            };
            let Some(prev) = self.document.line_mut(row - 1) else {
                return;
            };

            let boundary = prev.len();
            trace!(row, boundary, "erase: merge into previous line");
            prev.merge(current);
            debug_assert!(prev.is_terminated(), "row {} lost its terminator", row - 1);
            self.document.mark_dirty();
            self.move_row(signed(row) - 1);
            self.move_col(signed(boundary));
        } else {
            if let Some(line) = self.document.line_mut(row) {
                line.remove_before(col);
                debug_assert!(line.is_terminated(), "row {row} lost its terminator");
            }
            self.document.mark_dirty();
            self.move_col(signed(col) - 1);
        }
    }

    /// Line break at the cursor.
    ///
    /// At column 0 an empty line opens above the current one. Otherwise the
    /// text from the cursor on moves to a new line below. Either way the
    /// cursor ends at column 0 of the next row.
    pub fn enter(&mut self) {
        let Cursor { row, col } = self.cursor;

        if col == 0 {
            self.document.insert_line(row, Line::Empty);
        } else {
            let tail = self
                .document
                .line_mut(row)
                .map_or(Line::Empty, |line| line.split_off(col));
            trace!(row, col, moved = tail.len(), "enter: split line");
            self.document.insert_line(row + 1, tail);
        }

        self.document.mark_dirty();
        self.cursor.col = 0;
        self.move_row(signed(row).saturating_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn editor(text: &str) -> Editor {
        Editor::new(Document::parse("test.txt", text.as_bytes()))
    }

    fn text(ed: &Editor) -> String {
        String::from_utf8(ed.document().to_bytes()).unwrap()
    }

    fn at(ed: &Editor) -> (usize, usize) {
        (ed.cursor().row, ed.cursor().col)
    }

    fn place(ed: &mut Editor, row: isize, col: isize) {
        ed.move_row(row);
        ed.move_col(col);
    }

    // -- Navigation ---------------------------------------------------------

    #[test]
    fn move_col_clamps_both_ways() {
        let mut ed = editor("abc\n");
        for target in [-100, -1, 0, 1, 2, 3, 4, 100, isize::MIN, isize::MAX] {
            ed.move_col(target);
            let expected = usize::try_from(target.clamp(0, 3)).unwrap();
            assert_eq!(ed.cursor().col, expected, "target {target}");
        }
    }

    #[test]
    fn move_row_clamps_and_reclamps_col() {
        let mut ed = editor("long line\nab\n");
        ed.end();
        assert_eq!(at(&ed), (0, 9));

        ed.move_row(99);
        assert_eq!(at(&ed), (1, 2));

        ed.move_row(-5);
        assert_eq!(at(&ed), (0, 2));
    }

    #[test]
    fn navigation_on_empty_document_stays_at_origin() {
        let mut ed = editor("");
        ed.move_down();
        ed.move_right();
        ed.end();
        assert_eq!(at(&ed), (0, 0));
    }

    #[test]
    fn arrows_step_by_one() {
        let mut ed = editor("abc\ndef\n");
        ed.move_right();
        ed.move_down();
        assert_eq!(at(&ed), (1, 1));
        ed.move_left();
        ed.move_left();
        ed.move_up();
        assert_eq!(at(&ed), (0, 0));
    }

    #[test]
    fn home_and_end() {
        let mut ed = editor("hello\n");
        ed.end();
        assert_eq!(ed.cursor().col, 5);
        ed.home();
        assert_eq!(ed.cursor().col, 0);
    }

    #[test]
    fn word_jumps_walk_runs() {
        let mut ed = editor("ab  cd\n");
        let mut forward = vec![ed.cursor().col];
        for _ in 0..3 {
            ed.jump_forward();
            forward.push(ed.cursor().col);
        }
        assert_eq!(forward, vec![0, 2, 4, 6]);

        let mut back = vec![ed.cursor().col];
        for _ in 0..3 {
            ed.jump_back();
            back.push(ed.cursor().col);
        }
        assert_eq!(back, vec![6, 4, 2, 0]);
    }

    // -- Typing -------------------------------------------------------------

    #[test]
    fn type_at_every_column() {
        for k in 0..=3 {
            let mut ed = editor("abc\n");
            ed.move_col(k);
            ed.type_byte(b'X');

            let k = usize::try_from(k).unwrap();
            let mut expected = b"abc".to_vec();
            expected.insert(k, b'X');
            assert_eq!(ed.document().line(0).unwrap().content(), expected.as_slice());
            assert_eq!(ed.cursor().col, k + 1);
            assert!(ed.document().is_dirty());
        }
    }

    #[test]
    fn type_into_empty_line() {
        let mut ed = editor("\n");
        ed.type_byte(b'q');
        assert_eq!(text(&ed), "q\n");
        assert_eq!(at(&ed), (0, 1));
    }

    #[test]
    fn type_without_lines_is_noop() {
        let mut ed = editor("");
        ed.type_byte(b'q');
        assert_eq!(ed.document().line_count(), 0);
        assert!(!ed.document().is_dirty());
    }

    // -- Erase --------------------------------------------------------------

    #[test]
    fn erase_removes_byte_before_cursor() {
        let mut ed = editor("abc\n");
        ed.move_col(2);
        ed.erase();
        assert_eq!(text(&ed), "ac\n");
        assert_eq!(at(&ed), (0, 1));
        assert!(ed.document().is_dirty());
    }

    #[test]
    fn erase_last_byte_empties_line() {
        let mut ed = editor("a\n");
        ed.end();
        ed.erase();
        assert!(ed.document().line(0).unwrap().is_empty());
        assert_eq!(at(&ed), (0, 0));
    }

    #[test]
    fn erase_empty_line_lands_at_end_of_previous() {
        let mut ed = editor("abc\n\nxyz\n");
        ed.move_row(1);
        ed.erase();
        assert_eq!(text(&ed), "abc\nxyz\n");
        assert_eq!(at(&ed), (0, 3));
    }

    #[test]
    fn erase_at_column_zero_merges_lines() {
        let mut ed = editor("ab\ncd\n");
        ed.move_row(1);
        ed.erase();
        assert_eq!(text(&ed), "abcd\n");
        assert_eq!(at(&ed), (0, 2));
    }

    #[test]
    fn erase_merges_into_empty_previous_line() {
        let mut ed = editor("\ncd\n");
        ed.move_row(1);
        ed.erase();
        assert_eq!(text(&ed), "cd\n");
        assert_eq!(at(&ed), (0, 0));
    }

    #[test]
    fn erase_at_origin_is_noop() {
        let mut ed = editor("ab\n");
        ed.erase();
        assert_eq!(text(&ed), "ab\n");
        assert!(!ed.document().is_dirty());
    }

    #[test]
    fn erase_sole_empty_line_is_noop() {
        let mut ed = editor("\n");
        ed.erase();
        assert_eq!(ed.document().line_count(), 1);
        assert_eq!(at(&ed), (0, 0));
    }

    // -- Enter --------------------------------------------------------------

    #[test]
    fn enter_at_end_opens_line_below() {
        let mut ed = editor("ab\ncd\n");
        ed.end();
        ed.enter();
        assert_eq!(text(&ed), "ab\n\ncd\n");
        assert_eq!(at(&ed), (1, 0));
        assert!(ed.document().is_dirty());
    }

    #[test]
    fn enter_in_middle_splits() {
        let mut ed = editor("hello world\n");
        ed.move_col(5);
        ed.enter();
        assert_eq!(text(&ed), "hello\n world\n");
        assert_eq!(at(&ed), (1, 0));
    }

    #[test]
    fn enter_at_column_zero_opens_line_above() {
        let mut ed = editor("ab\n");
        ed.enter();
        assert_eq!(text(&ed), "\nab\n");
        assert_eq!(at(&ed), (1, 0));
    }

    #[test]
    fn enter_on_empty_document_creates_line() {
        let mut ed = editor("");
        ed.enter();
        assert_eq!(ed.document().line_count(), 1);
        assert_eq!(at(&ed), (0, 0));
        ed.type_byte(b'z');
        assert_eq!(text(&ed), "z\n");
    }

    #[test]
    fn enter_then_erase_restores_line_and_cursor() {
        for col in 0..=4 {
            let mut ed = editor("abcd\nxy\n");
            place(&mut ed, 0, col);
            let before = (text(&ed), at(&ed));

            ed.enter();
            ed.erase();
            assert_eq!((text(&ed), at(&ed)), before, "col {col}");
        }
    }

    #[test]
    fn enter_then_backspace_scenario() {
        let mut ed = editor("ab\ncd\n");
        ed.end();
        ed.enter();
        let rows: Vec<&[u8]> = ed.document().lines().map(Line::content).collect();
        assert_eq!(rows, vec![&b"ab"[..], b"", b"cd"]);
        assert_eq!(at(&ed), (1, 0));

        ed.erase();
        assert_eq!(text(&ed), "ab\ncd\n");
        assert_eq!(at(&ed), (0, 2));
    }

    // -- Consistency --------------------------------------------------------

    #[test]
    fn edit_sequences_stay_consistent() {
        let mut ed = editor("one two\n\nthree\n");
        let script: &[fn(&mut Editor)] = &[
            Editor::end,
            |e| e.type_byte(b'!'),
            Editor::enter,
            Editor::move_up,
            Editor::jump_back,
            Editor::erase,
            Editor::enter,
            Editor::erase,
            Editor::erase,
            Editor::move_down,
            Editor::move_down,
            Editor::erase,
            |e| e.type_byte(b' '),
            Editor::home,
            Editor::erase,
            Editor::jump_forward,
            Editor::enter,
        ];

        for (step, op) in script.iter().enumerate() {
            op(&mut ed);
            assert!(ed.document().check_consistency().is_ok(), "step {step}");

            let Cursor { row, col } = ed.cursor();
            let lines = ed.document().line_count();
            assert!(row < lines.max(1), "step {step}: row {row} of {lines}");
            let len = ed.document().line(row).map_or(0, Line::len);
            assert!(col <= len, "step {step}: col {col} past {len}");
        }
    }
}
