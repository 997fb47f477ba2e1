// SPDX-License-Identifier: MIT
//
// Keymaps — which byte sequence each terminal sends for each named key.
//
// Terminals disagree on a handful of keys. Every family shares one default
// table and lists only the keys it sends differently; resolving a key walks
// the family's override first and falls back to the default. A received
// chunk names a key only when it is exactly that key's resolved sequence.

use std::fmt;

// ─── Named Keys ─────────────────────────────────────────────────────────────

/// Keys that have a name rather than a byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Home,
    Insert,
    Delete,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Right,
    Left,
    Tab,
    Enter,
    Backspace,
}

impl NamedKey {
    /// Keys sent as escape sequences, in lookup order.
    pub const SEQUENCED: [Self; 10] = [
        Self::Home,
        Self::Insert,
        Self::Delete,
        Self::End,
        Self::PageUp,
        Self::PageDown,
        Self::Up,
        Self::Down,
        Self::Right,
        Self::Left,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Insert => "Insert",
            Self::Delete => "Delete",
            Self::End => "End",
            Self::PageUp => "PageUp",
            Self::PageDown => "PageDown",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Right => "Right",
            Self::Left => "Left",
            Self::Tab => "Tab",
            Self::Enter => "Enter",
            Self::Backspace => "Backspace",
        }
    }

    /// Slot in a sequence table, for keys in [`SEQUENCED`](Self::SEQUENCED).
    const fn slot(self) -> Option<usize> {
        match self {
            Self::Home => Some(0),
            Self::Insert => Some(1),
            Self::Delete => Some(2),
            Self::End => Some(3),
            Self::PageUp => Some(4),
            Self::PageDown => Some(5),
            Self::Up => Some(6),
            Self::Down => Some(7),
            Self::Right => Some(8),
            Self::Left => Some(9),
            Self::Tab | Self::Enter | Self::Backspace => None,
        }
    }
}

impl fmt::Display for NamedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Single bytes that stand for a named key.
const REMAP: [(u8, NamedKey); 3] = [
    (0x09, NamedKey::Tab),
    (0x0d, NamedKey::Enter),
    (0x7f, NamedKey::Backspace),
];

/// The named key a single input byte stands for, if any.
#[must_use]
pub fn remap(byte: u8) -> Option<NamedKey> {
    REMAP
        .iter()
        .find_map(|&(b, key)| (b == byte).then_some(key))
}

// ─── Sequence Tables ────────────────────────────────────────────────────────

type Table = [Option<&'static [u8]>; 10];

#[rustfmt::skip]
const DEFAULT_TABLE: [&[u8]; 10] = [
    b"\x1b[1~", // Home
    b"\x1b[2~", // Insert
    b"\x1b[3~", // Delete
    b"\x1b[4~", // End
    b"\x1b[5~", // PageUp
    b"\x1b[6~", // PageDown
    b"\x1b[A",  // Up
    b"\x1b[B",  // Down
    b"\x1b[C",  // Right
    b"\x1b[D",  // Left
];

const NO_OVERRIDES: Table = [None; 10];

#[rustfmt::skip]
const XTERM_OVERRIDES: Table = [
    Some(b"\x1b[H"), None, None, Some(b"\x1b[F"),
    None, None, None, None, None, None,
];

#[rustfmt::skip]
const ST_OVERRIDES: Table = [
    Some(b"\x1b[H"), Some(b"\x1b[4h"), Some(b"\x1b[P"), None,
    None, None, None, None, None, None,
];

// ─── Terminal Families ──────────────────────────────────────────────────────

/// Groups of terminals that send the same sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TerminalFamily {
    #[default]
    Default,
    Xterm,
    St,
}

impl TerminalFamily {
    /// Pick a family from a `TERM` value.
    #[must_use]
    pub fn detect(term: &str) -> Self {
        if term.starts_with("xterm") {
            Self::Xterm
        } else if term.starts_with("st") {
            Self::St
        } else {
            Self::Default
        }
    }

    const fn overrides(self) -> &'static Table {
        match self {
            Self::Default => &NO_OVERRIDES,
            Self::Xterm => &XTERM_OVERRIDES,
            Self::St => &ST_OVERRIDES,
        }
    }
}

// ─── Keymap ─────────────────────────────────────────────────────────────────

/// The active sequence table: a family's overrides over the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    overrides: Table,
}

impl Keymap {
    #[must_use]
    pub const fn for_family(family: TerminalFamily) -> Self {
        Self {
            overrides: *family.overrides(),
        }
    }

    /// Replace the sequence `key` is recognised by. Keys outside
    /// [`NamedKey::SEQUENCED`] are ignored.
    #[must_use]
    pub const fn with_override(mut self, key: NamedKey, seq: &'static [u8]) -> Self {
        if let Some(slot) = key.slot() {
            self.overrides[slot] = Some(seq);
        }
        self
    }

    /// The sequence `key` is recognised by, or `None` for keys that are
    /// not escape sequences.
    #[must_use]
    pub fn resolve(&self, key: NamedKey) -> Option<&'static [u8]> {
        let slot = key.slot()?;
        Some(self.overrides[slot].unwrap_or(DEFAULT_TABLE[slot]))
    }

    /// The first named key whose resolved sequence equals `seq`.
    #[must_use]
    pub fn lookup(&self, seq: &[u8]) -> Option<NamedKey> {
        NamedKey::SEQUENCED
            .into_iter()
            .find(|&key| self.resolve(key) == Some(seq))
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::for_family(TerminalFamily::Default)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn remap_table() {
        assert_eq!(remap(0x09), Some(NamedKey::Tab));
        assert_eq!(remap(0x0d), Some(NamedKey::Enter));
        assert_eq!(remap(0x7f), Some(NamedKey::Backspace));
        assert_eq!(remap(b'a'), None);
        assert_eq!(remap(0x0a), None);
    }

    #[test]
    fn detect_family() {
        assert_eq!(TerminalFamily::detect("xterm-256color"), TerminalFamily::Xterm);
        assert_eq!(TerminalFamily::detect("st-256color"), TerminalFamily::St);
        assert_eq!(TerminalFamily::detect("linux"), TerminalFamily::Default);
        assert_eq!(TerminalFamily::detect(""), TerminalFamily::Default);
    }

    #[test]
    fn default_arrows() {
        let map = Keymap::default();
        assert_eq!(map.lookup(b"\x1b[A"), Some(NamedKey::Up));
        assert_eq!(map.lookup(b"\x1b[B"), Some(NamedKey::Down));
        assert_eq!(map.lookup(b"\x1b[C"), Some(NamedKey::Right));
        assert_eq!(map.lookup(b"\x1b[D"), Some(NamedKey::Left));
    }

    #[test]
    fn every_sequenced_key_resolves_and_round_trips() {
        for family in [TerminalFamily::Default, TerminalFamily::Xterm, TerminalFamily::St] {
            let map = Keymap::for_family(family);
            for key in NamedKey::SEQUENCED {
                let seq = map.resolve(key).unwrap();
                assert_eq!(map.lookup(seq), Some(key), "{family:?} {key}");
            }
        }
    }

    #[test]
    fn xterm_overrides_home_and_end() {
        let map = Keymap::for_family(TerminalFamily::Xterm);
        assert_eq!(map.resolve(NamedKey::Home), Some(&b"\x1b[H"[..]));
        assert_eq!(map.resolve(NamedKey::End), Some(&b"\x1b[F"[..]));
        assert_eq!(map.resolve(NamedKey::Insert), Some(&b"\x1b[2~"[..]));
        assert_eq!(map.lookup(b"\x1b[1~"), None);
    }

    #[test]
    fn st_overrides() {
        let map = Keymap::for_family(TerminalFamily::St);
        assert_eq!(map.lookup(b"\x1b[H"), Some(NamedKey::Home));
        assert_eq!(map.lookup(b"\x1b[4h"), Some(NamedKey::Insert));
        assert_eq!(map.lookup(b"\x1b[P"), Some(NamedKey::Delete));
        assert_eq!(map.lookup(b"\x1b[4~"), Some(NamedKey::End));
    }

    #[test]
    fn lookup_requires_exact_match() {
        let map = Keymap::default();
        assert_eq!(map.lookup(b"\x1b[A\x1b[A"), None);
        assert_eq!(map.lookup(b"\x1b["), None);
        assert_eq!(map.lookup(b""), None);
    }

    #[test]
    fn remapped_keys_have_no_sequence() {
        let map = Keymap::default();
        assert_eq!(map.resolve(NamedKey::Enter), None);
    }

    #[test]
    fn custom_override() {
        let map = Keymap::default().with_override(NamedKey::Delete, b"\x1b[P");
        assert_eq!(map.lookup(b"\x1b[P"), Some(NamedKey::Delete));
        assert_eq!(map.lookup(b"\x1b[3~"), None);
    }
}
