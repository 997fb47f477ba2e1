// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. The
// renderer decides what to draw; this module only knows the bytes.
use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to the top-left cell.
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes and colors (SGR 0).
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

// ─── Colors ──────────────────────────────────────────────────────────────────

/// The eight standard terminal colors plus the terminal's own default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    #[default]
    Default,
}

impl Color {
    /// Offset added to the SGR base (30 for foreground, 40 for background).
    const fn offset(self) -> u8 {
        match self {
            Self::Black => 0,
            Self::Red => 1,
            Self::Green => 2,
            Self::Yellow => 3,
            Self::Blue => 4,
            Self::Magenta => 5,
            Self::Cyan => 6,
            Self::White => 7,
            Self::Default => 9,
        }
    }
}

/// Set the foreground color (SGR 30–37, 39).
#[inline]
pub fn fg(w: &mut impl Write, color: Color) -> io::Result<()> {
    write!(w, "\x1b[{}m", 30 + color.offset())
}

/// Set the background color (SGR 40–47, 49).
#[inline]
pub fn bg(w: &mut impl Write, color: Color) -> io::Result<()> {
    write!(w, "\x1b[{}m", 40 + color.offset())
}

// ─── Text Attributes ─────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Text attributes, one bit per SGR parameter.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attr: u8 {
        /// SGR 1
        const BOLD          = 1 << 0;
        /// SGR 2
        const DIM           = 1 << 1;
        /// SGR 3
        const ITALIC        = 1 << 2;
        /// SGR 4
        const UNDERLINE     = 1 << 3;
        /// SGR 5
        const BLINK         = 1 << 4;
        /// SGR 7
        const INVERSE       = 1 << 5;
        /// SGR 8
        const HIDDEN        = 1 << 6;
        /// SGR 9
        const STRIKETHROUGH = 1 << 7;
    }
}

const ATTR_CODES: [(Attr, &[u8]); 8] = [
    (Attr::BOLD, b"1"),
    (Attr::DIM, b"2"),
    (Attr::ITALIC, b"3"),
    (Attr::UNDERLINE, b"4"),
    (Attr::BLINK, b"5"),
    (Attr::INVERSE, b"7"),
    (Attr::HIDDEN, b"8"),
    (Attr::STRIKETHROUGH, b"9"),
];

/// Emit SGR codes for `attr` as a single CSI sequence.
///
/// Parameters are semicolon-separated: `\x1b[1;4m` for bold + underline.
/// Writes nothing when no attribute is set.
pub fn attrs(w: &mut impl Write, attr: Attr) -> io::Result<()> {
    if attr.is_empty() {
        return Ok(());
    }

    w.write_all(b"\x1b[")?;
    let mut first = true;
    for (flag, code) in ATTR_CODES {
        if attr.contains(flag) {
            if !first {
                w.write_all(b";")?;
            }
            w.write_all(code)?;
            first = false;
        }
    }
    w.write_all(b"m")
}

// ─── Alternate Screen ───────────────────────────────────────────────────────

/// Enter the alternate screen buffer (DEC Private Mode 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Exit the alternate screen buffer and restore the original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Mouse Reporting ────────────────────────────────────────────────────────

/// Enable X10 mouse reporting (DEC Private Mode 9).
///
/// The terminal reports button presses as `ESC [ M b x y`, each of the
/// three bytes offset by 32.
#[inline]
pub fn enable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?9h")
}

#[inline]
pub fn disable_mouse(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?9l")
}

// ─── Tests ───────────────────────────────────────────────────────────────────
