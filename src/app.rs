// SPDX-License-Identifier: MIT
//
// Key dispatch: decoded events to editor operations.
//
//   Up / Down            move a row
//   Left / Right         move a column (Ctrl: jump a run of words or spaces)
//   Home / End           start / end of line
//   Enter / Backspace    break / join lines, delete a byte
//   Ctrl+S               save
//   printable byte       type it
//
// Ctrl+Q never reaches this layer; the decoder ends the session itself.

use std::io;

use tracing::{debug, trace, warn};

use rite_editor::{DocumentError, Editor};
use rite_term::event_loop::{Action, App};
use rite_term::input::{Event, KeyCode, KeyEvent};
use rite_term::keymap::NamedKey;
use rite_term::terminal::Size;

use crate::render::{self, Viewport};

/// Shown until the first event.
pub const GREETING: &str = "howdy!";

/// The running editor: text state, scroll position, and the one-shot
/// status message.
pub struct Session {
    editor: Editor,
    view: Viewport,
    status: String,
}

impl Session {
    pub fn new(editor: Editor) -> Self {
        Self {
            editor,
            view: Viewport::default(),
            status: GREETING.to_owned(),
        }
    }

    pub const fn editor(&self) -> &Editor {
        &self.editor
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Named(NamedKey::Up) => self.editor.move_up(),
            KeyCode::Named(NamedKey::Down) => self.editor.move_down(),
            KeyCode::Named(NamedKey::Left) if key.ctrl() => self.editor.jump_back(),
            KeyCode::Named(NamedKey::Left) => self.editor.move_left(),
            KeyCode::Named(NamedKey::Right) if key.ctrl() => self.editor.jump_forward(),
            KeyCode::Named(NamedKey::Right) => self.editor.move_right(),
            KeyCode::Named(NamedKey::Home) => self.editor.home(),
            KeyCode::Named(NamedKey::End) => self.editor.end(),
            KeyCode::Named(NamedKey::Enter) => self.editor.enter(),
            KeyCode::Named(NamedKey::Backspace) => self.editor.erase(),
            KeyCode::Byte(b's') if key.ctrl() => self.save(),
            KeyCode::Byte(b) if is_typeable(b) && !key.ctrl() && !key.alt() => {
                self.editor.type_byte(b);
            }
            _ => {
                trace!(%key, "unbound key");
                self.status = format!("{key} is not bound");
            }
        }
    }

    fn save(&mut self) {
        let name = self.editor.document().name().display().to_string();
        match self.editor.save() {
            Ok(lines) => {
                debug!(%name, lines, "saved");
                self.status = format!("wrote {lines} lines to {name}");
            }
            Err(DocumentError::NotDirty) => {
                debug!(%name, "save skipped: no changes");
                self.status = DocumentError::NotDirty.to_string();
            }
            Err(err) => {
                warn!(%name, error = %err, "save failed");
                self.status = err.to_string();
            }
        }
    }
}

/// Bytes that are typed as-is: printable ASCII.
const fn is_typeable(b: u8) -> bool {
    matches!(b, 0x20..=0x7e)
}

impl App for Session {
    fn on_event(&mut self, event: &Event) -> Action {
        self.status.clear();
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Mouse(mouse) => trace!(%mouse, "mouse ignored"),
            Event::Resize => {}
        }
        Action::Continue
    }

    fn on_resize(&mut self, size: Size) {
        debug!(cols = size.cols, rows = size.rows, "resized");
    }

    fn paint(&mut self, out: &mut Vec<u8>, size: Size) -> io::Result<()> {
        self.view.follow(self.editor.cursor(), size);
        render::draw(out, &self.editor, &self.status, self.view, size)
    }
}
