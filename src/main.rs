// SPDX-License-Identifier: MIT
//
// rite — a minimal full-screen terminal text editor.
//
// This is the main binary that wires the crates together:
//
//   rite-term   → raw terminal, chunked reads, input decoding, event loop
//   rite-editor → growable buffers, lines, document, cursor editing
//
// `Session` implements rite-term's App trait. Each keypress flows through:
//
//   stdin → chunk → decoder → on_event → Editor operation
//   paint → viewport follow → render::draw → stdout

mod app;
mod config;
mod logging;
mod render;

use std::process;

use rite_editor::{Document, Editor};
use rite_term::event_loop::{EventLoop, LoopConfig};
use rite_term::keymap::Keymap;

use crate::app::Session;
use crate::config::Config;

fn main() {
    let config = Config::from_env();
    let _log_guard = logging::init(&config);

    let document = match &config.path {
        Some(path) => Document::open(path).unwrap_or_else(|e| {
            tracing::error!(error = %e, "load failed");
            eprintln!("rite: {e}");
            process::exit(1);
        }),
        None => Document::new(config.document_path()),
    };
    tracing::debug!(
        name = %document.name().display(),
        lines = document.line_count(),
        family = ?config.family,
        "starting"
    );

    let mut session = Session::new(Editor::new(document));
    let mut event_loop = EventLoop::new(LoopConfig::default(), Keymap::for_family(config.family));

    if let Err(e) = event_loop.run(&mut session) {
        tracing::error!(error = %e, "terminal failure");
        eprintln!("rite: {e}");
        process::exit(1);
    }

    let document = session.editor().document();
    if document.is_dirty() {
        tracing::warn!(name = %document.name().display(), "quit with unsaved changes");
    }
}
