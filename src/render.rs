// SPDX-License-Identifier: MIT
//
// Frame rendering.
//
//   ┌──────────────────────────────┐
//   │ [cc_rr] :: name+             │  ← header, bold + underline
//   │ text rows                    │  ← size.rows - 3 rows
//   │ --------------------         │
//   │ status message               │
//   └──────────────────────────────┘
//
// The whole screen is redrawn every frame. The hardware cursor stays hidden;
// the cursor cell is drawn red on white instead.

use std::io::{self, Write};

use rite_editor::line::TERMINATOR;
use rite_editor::{Cursor, Editor, Line};
use rite_term::ansi::{self, Attr, Color};
use rite_term::terminal::Size;

/// Rows taken by the header, the separator and the status line.
const CHROME_ROWS: usize = 3;

const SEPARATOR: &[u8] = b"--------------------";

/// Number of rows available for text.
pub fn text_rows(size: Size) -> usize {
    usize::from(size.rows).saturating_sub(CHROME_ROWS).max(1)
}

/// First visible row and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewport {
    pub top: usize,
    pub left: usize,
}

impl Viewport {
    /// Scroll the least amount that brings `cursor` on screen.
    pub fn follow(&mut self, cursor: Cursor, size: Size) {
        let rows = text_rows(size);
        let cols = usize::from(size.cols).max(1);

        if cursor.row < self.top {
            self.top = cursor.row;
        } else if cursor.row >= self.top + rows {
            self.top = cursor.row + 1 - rows;
        }

        if cursor.col < self.left {
            self.left = cursor.col;
        } else if cursor.col >= self.left + cols {
            self.left = cursor.col + 1 - cols;
        }
    }
}

/// Draw one complete frame.
pub fn draw(
    out: &mut impl Write,
    editor: &Editor,
    status: &str,
    view: Viewport,
    size: Size,
) -> io::Result<()> {
    ansi::clear_screen(out)?;
    ansi::cursor_home(out)?;
    draw_header(out, editor)?;

    let cursor = editor.cursor();
    let cols = usize::from(size.cols).max(1);
    let lines = editor.document().lines().enumerate().skip(view.top);
    for (row, line) in lines.take(text_rows(size)) {
        let cursor_col = (row == cursor.row).then_some(cursor.col);
        draw_line(out, line, cursor_col, view.left, cols)?;
    }

    out.write_all(SEPARATOR)?;
    out.write_all(b"\r\n")?;
    out.write_all(status.as_bytes())?;
    Ok(())
}

fn draw_header(out: &mut impl Write, editor: &Editor) -> io::Result<()> {
    let Cursor { row, col } = editor.cursor();
    let doc = editor.document();

    ansi::attrs(out, Attr::BOLD | Attr::UNDERLINE)?;
    write!(
        out,
        "[{col:02x}_{row:02x}] :: {}{}",
        doc.name().display(),
        if doc.is_dirty() { '+' } else { ' ' }
    )?;
    ansi::reset(out)?;
    out.write_all(b"\r\n")
}

fn draw_line(
    out: &mut impl Write,
    line: &Line,
    cursor_col: Option<usize>,
    left: usize,
    cols: usize,
) -> io::Result<()> {
    let content = line.content();
    let visible = content.get(left..).unwrap_or_default();

    for (i, &b) in visible.iter().take(cols).enumerate() {
        let shown = if b < 0x20 || b == 0x7f { b'?' } else { b };
        if cursor_col == Some(left + i) {
            highlight(out, shown)?;
        } else {
            out.write_all(&[shown])?;
        }
    }
    if cursor_col == Some(content.len()) && content.len() >= left {
        highlight(out, b' ')?;
    }

    if let Some(terminator) = line.terminator().filter(|&t| t != TERMINATOR) {
        ansi::fg(out, Color::White)?;
        ansi::bg(out, Color::Red)?;
        write!(out, "__{terminator}")?;
        ansi::reset(out)?;
    }

    out.write_all(b"\r\n")
}

fn highlight(out: &mut impl Write, byte: u8) -> io::Result<()> {
    ansi::fg(out, Color::Red)?;
    ansi::bg(out, Color::White)?;
    out.write_all(&[byte])?;
    ansi::reset(out)
}
