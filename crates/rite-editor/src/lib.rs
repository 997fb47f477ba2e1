//! # rite-editor — Editor core for rite
//!
//! The text model and every editing operation, with no terminal in sight:
//!
//! - **[`growable`]** — `GrowBuf<T>`, a chunk-growing array with splice primitives
//! - **[`line`]** — `Line`, a terminated byte buffer (or nothing at all)
//! - **[`document`]** — `Document`, the line list plus its file and dirty flag
//! - **[`cursor`]** — `Cursor` (row, col), 0-indexed byte coordinates
//! - **[`word`]** — run-based word jumps within a line
//! - **[`editor`]** — `Editor`, clamped navigation and the type/erase/enter edits
//! - **[`error`]** — `DocumentError` for load, save and consistency failures

pub mod cursor;
pub mod document;
pub mod editor;
pub mod error;
pub mod growable;
pub mod line;
pub mod word;

pub use cursor::Cursor;
pub use document::Document;
pub use editor::Editor;
pub use error::DocumentError;
pub use growable::GrowBuf;
pub use line::Line;
