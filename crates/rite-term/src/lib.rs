// SPDX-License-Identifier: MIT
//
// rite-term — terminal layer for rite.
//
// Raw-mode terminal control, chunked stdin reads, a table-driven decoder
// that turns each chunk into one key/mouse/resize event, and the loop that
// feeds those events to an application and writes its frames back out.
//
// No TUI framework in between: escape sequences are written by hand in
// `ansi`, termios and poll are called through libc, and the keymaps for
// the terminals we know about live in `keymap`.

pub mod ansi;
pub mod event_loop;
pub mod input;
pub mod keymap;
pub mod reader;
pub mod signal;
pub mod terminal;
