// SPDX-License-Identifier: MIT
//
// Terminal input decoder.
//
// Turns one raw read (a chunk of at most 16 bytes) into at most one event.
// There is no buffering across reads: a terminal writes a keypress, an
// escape sequence or a mouse report in a single burst, so each chunk is
// decoded on its own and anything unrecognised is dropped.
//
// Classification is an ordered table of (predicate, handler) rules; the
// first rule whose predicate accepts the chunk decides the outcome:
//
//   1. empty read       → Resize if one is pending, else nothing
//   2. quit byte first  → Quit
//   3. ESC + one byte   → Alt + that byte (unless the pair is a keymap entry)
//   4. single byte      → remapped named key, or the byte with Shift/Ctrl
//   5. ESC [ M b x y    → X10 mouse report
//   6. ESC [ 1 ; d ...  → modifier digit, then keymap lookup of ESC [ ...
//   7. anything else    → keymap lookup
//
// Modifier digits use the xterm encoding: the digit is one more than the
// modifier bitmask (2 = Shift, 3 = Alt, 5 = Ctrl, ...).

use std::fmt;

use bitflags::bitflags;
use tracing::trace;

use crate::keymap::{self, Keymap, NamedKey};
use crate::signal::ResizeFlag;

// ─── Event Types ────────────────────────────────────────────────────────────

/// A decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    /// The terminal was resized since the last empty read.
    Resize,
}

/// A key with the modifiers held when it was pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    #[inline]
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    #[inline]
    #[must_use]
    pub const fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }
}

/// Identity of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    /// A raw byte. Control bytes arrive unmasked to their letter (`Ctrl+A`
    /// is `Byte(b'a')` with [`Modifiers::CTRL`]).
    Byte(u8),
    Named(NamedKey),
}

impl From<NamedKey> for KeyCode {
    fn from(key: NamedKey) -> Self {
        Self::Named(key)
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Byte(b' ') => f.write_str("Space"),
            Self::Byte(b) if b.is_ascii_graphic() => write!(f, "{}", char::from(b)),
            Self::Byte(b) => write!(f, "{b:#04x}"),
            Self::Named(key) => f.write_str(key.name()),
        }
    }
}

bitflags! {
    /// Modifier keys, in xterm bit order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 0b001;
        const ALT   = 0b010;
        const CTRL  = 0b100;
    }
}

impl Modifiers {
    /// Decode an xterm modifier digit (`'2'` = Shift, `'5'` = Ctrl, ...).
    #[must_use]
    pub const fn from_digit(digit: u8) -> Self {
        if digit.is_ascii_digit() {
            Self::from_bits_truncate((digit - b'0').saturating_sub(1))
        } else {
            Self::empty()
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (flag, name) in [
            (Modifiers::CTRL, "Ctrl+"),
            (Modifiers::ALT, "Alt+"),
            (Modifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                f.write_str(name)?;
            }
        }
        write!(f, "{}", self.code)
    }
}

/// An X10 mouse report.
///
/// `x` and `y` are the 1-indexed cell the terminal reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    /// Button code with the bias removed.
    pub code: u8,
    pub x: u8,
    pub y: u8,
}

/// What a mouse report's button code means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Press(MouseButton),
    Release,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseEvent {
    #[must_use]
    pub const fn kind(&self) -> MouseEventKind {
        let wheel = self.code & 0x40 != 0;
        match (wheel, self.code & 0b11) {
            (false, 0) => MouseEventKind::Press(MouseButton::Left),
            (false, 1) => MouseEventKind::Press(MouseButton::Middle),
            (false, 2) => MouseEventKind::Press(MouseButton::Right),
            (true, 0) => MouseEventKind::ScrollUp,
            (true, 1) => MouseEventKind::ScrollDown,
            _ => MouseEventKind::Release,
        }
    }

    /// Modifiers held during the report (bits 2, 3 and 4 of the code).
    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        let mut mods = Modifiers::empty();
        mods.set(Modifiers::SHIFT, self.code & 0x04 != 0);
        mods.set(Modifiers::ALT, self.code & 0x08 != 0);
        mods.set(Modifiers::CTRL, self.code & 0x10 != 0);
        mods
    }
}

impl fmt::Display for MouseButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Left => "Left",
            Self::Middle => "Middle",
            Self::Right => "Right",
        })
    }
}

impl fmt::Display for MouseEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Press(button) => write!(f, "{button} press"),
            Self::Release => f.write_str("Release"),
            Self::ScrollUp => f.write_str("Scroll up"),
            Self::ScrollDown => f.write_str("Scroll down"),
        }
    }
}

impl fmt::Display for MouseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {},{}", self.kind(), self.x, self.y)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => fmt::Display::fmt(key, f),
            Self::Mouse(mouse) => fmt::Display::fmt(mouse, f),
            Self::Resize => f.write_str("Resize"),
        }
    }
}

// ─── Decoder ────────────────────────────────────────────────────────────────

/// Byte that ends the session (`Ctrl+Q`).
pub const QUIT: u8 = 0x11;

const ESC: u8 = 0x1b;

/// Prefix of an X10 mouse report.
pub const MOUSE_PREFIX: &[u8] = b"\x1b[M";

/// Prefix of a modified key sequence; the modifier digit follows.
pub const MODIFIER_PREFIX: &[u8] = b"\x1b[1;";

/// Offset the terminal adds to each byte of a mouse report.
const MOUSE_BIAS: u8 = 32;

/// Outcome of decoding one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Event(Event),
    /// The chunk carried nothing the editor understands.
    Nothing,
    Quit,
}

struct Rule {
    name: &'static str,
    applies: fn(&Decoder<'_>, &[u8]) -> bool,
    decode: fn(&Decoder<'_>, &[u8]) -> Decoded,
}

static RULES: [Rule; 7] = [
    Rule {
        name: "empty",
        applies: |_, chunk| chunk.is_empty(),
        decode: |decoder, chunk| decoder.decode_empty(chunk),
    },
    Rule {
        name: "quit",
        applies: |_, chunk| chunk.first() == Some(&QUIT),
        decode: |_, _| Decoded::Quit,
    },
    Rule {
        name: "alt",
        applies: |decoder, chunk| {
            chunk.len() == 2 && chunk[0] == ESC && decoder.keymap.lookup(chunk).is_none()
        },
        decode: |_, chunk| Decoded::Event(key_from_byte(chunk[1], Modifiers::ALT)),
    },
    Rule {
        name: "byte",
        applies: |_, chunk| chunk.len() == 1,
        decode: |_, chunk| Decoded::Event(key_from_byte(chunk[0], Modifiers::empty())),
    },
    Rule {
        name: "mouse",
        applies: |_, chunk| chunk.starts_with(MOUSE_PREFIX),
        decode: |_, chunk| decode_mouse(&chunk[MOUSE_PREFIX.len()..]),
    },
    Rule {
        name: "modified",
        applies: |_, chunk| chunk.starts_with(MODIFIER_PREFIX),
        decode: |decoder, chunk| decoder.decode_modified(chunk),
    },
    Rule {
        name: "keymap",
        applies: |_, _| true,
        decode: |decoder, chunk| decoder.decode_sequence(chunk, Modifiers::empty()),
    },
];

/// Decodes raw chunks against a keymap.
///
/// Borrows the resize flag it reports from, so tests can supply their own
/// instead of the process-wide one the signal handler raises.
#[derive(Debug, Clone, Copy)]
pub struct Decoder<'a> {
    keymap: Keymap,
    resize: &'a ResizeFlag,
}

impl<'a> Decoder<'a> {
    #[must_use]
    pub const fn new(keymap: Keymap, resize: &'a ResizeFlag) -> Self {
        Self { keymap, resize }
    }

    /// Decode one chunk.
    #[must_use]
    pub fn decode(&self, chunk: &[u8]) -> Decoded {
        let Some(rule) = RULES.iter().find(|rule| (rule.applies)(self, chunk)) else {
            return Decoded::Nothing;
        };

        let decoded = (rule.decode)(self, chunk);
        if !chunk.is_empty() {
            trace!(rule = rule.name, ?chunk, ?decoded, "decode");
        }
        decoded
    }

    fn decode_empty(&self, _chunk: &[u8]) -> Decoded {
        if self.resize.take() {
            Decoded::Event(Event::Resize)
        } else {
            Decoded::Nothing
        }
    }

    /// `ESC [ 1 ; d rest` → modifiers from `d`, then `ESC [ rest`.
    fn decode_modified(&self, chunk: &[u8]) -> Decoded {
        let Some((&digit, rest)) = chunk[MODIFIER_PREFIX.len()..].split_first() else {
            return Decoded::Nothing;
        };
        let shifted = [&b"\x1b["[..], rest].concat();
        self.decode_sequence(&shifted, Modifiers::from_digit(digit))
    }

    fn decode_sequence(&self, seq: &[u8], modifiers: Modifiers) -> Decoded {
        self.keymap.lookup(seq).map_or(Decoded::Nothing, |key| {
            Decoded::Event(Event::Key(KeyEvent::new(key.into(), modifiers)))
        })
    }
}

/// A single byte as a key: remapped, or raw with Shift/Ctrl derived from
/// the byte itself.
fn key_from_byte(byte: u8, mut modifiers: Modifiers) -> Event {
    if let Some(named) = keymap::remap(byte) {
        return Event::Key(KeyEvent::new(named.into(), modifiers));
    }

    let mut byte = byte;
    if byte.is_ascii_uppercase() {
        modifiers |= Modifiers::SHIFT;
    }
    if byte & !0x1f == 0 {
        modifiers |= Modifiers::CTRL;
        byte |= 0x60;
    }
    Event::Key(KeyEvent::new(KeyCode::Byte(byte), modifiers))
}

fn decode_mouse(report: &[u8]) -> Decoded {
    let Some(&[code, x, y]) = report.get(..3) else {
        return Decoded::Nothing;
    };
    Decoded::Event(Event::Mouse(MouseEvent {
        code: code.wrapping_sub(MOUSE_BIAS),
        x: x.wrapping_sub(MOUSE_BIAS),
        y: y.wrapping_sub(MOUSE_BIAS),
    }))
}

// ─── Tests ──────────────────────────────────────────────────────────────────
