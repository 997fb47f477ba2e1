//! The document: an ordered list of lines bound to a file.
//!
//! Loading splits the file on `\n` into [`Line`]s and forgets the raw
//! bytes. Saving writes every line back followed by `\n`. The `dirty` flag
//! gates saving: an unmodified document is never rewritten.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::DocumentError;
use crate::growable::GrowBuf;
use crate::line::{Line, TERMINATOR};

/// Growth step for the line list.
pub const LINE_LIST_CHUNK: usize = 16;

/// Lines of text plus the path they persist to.
#[derive(Debug, Clone)]
pub struct Document {
    name: PathBuf,
    dirty: bool,
    lines: GrowBuf<Line>,
}

impl Document {
    /// A document with no lines, bound to `name`.
    #[must_use]
    pub fn new(name: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dirty: false,
            lines: GrowBuf::with_chunk(LINE_LIST_CHUNK),
        }
    }

    /// Split `bytes` into lines on `\n`.
    ///
    /// Each delimited segment becomes one line, an empty segment an empty
    /// line. A trailing segment without a final `\n` is kept when non-empty.
    #[must_use]
    pub fn parse(name: impl Into<PathBuf>, bytes: &[u8]) -> Self {
        let mut doc = Self::new(name);
        let mut start = 0;

        for (i, &b) in bytes.iter().enumerate() {
            if b == b'\n' {
                doc.lines.append(Line::from_bytes(&bytes[start..i]));
                start = i + 1;
            }
        }
        if start < bytes.len() {
            doc.lines.append(Line::from_bytes(&bytes[start..]));
        }

        doc
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Open`] if the file cannot be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| DocumentError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let doc = Self::parse(path, &bytes);
        debug!(
            path = %path.display(),
            bytes = bytes.len(),
            lines = doc.line_count(),
            "document loaded"
        );
        Ok(doc)
    }

    /// Write the document to its path and clear the dirty flag.
    ///
    /// Returns the number of lines written.
    ///
    /// # Errors
    ///
    /// - [`DocumentError::NotDirty`] when nothing changed since the last save.
    /// - [`DocumentError::NoContent`] when the document has no lines.
    /// - [`DocumentError::Write`] when the file cannot be written; the
    ///   document stays dirty.
    pub fn save(&mut self) -> Result<usize, DocumentError> {
        if !self.dirty {
            return Err(DocumentError::NotDirty);
        }
        if self.lines.is_empty() {
            return Err(DocumentError::NoContent);
        }

        let bytes = self.to_bytes();
        if let Err(source) = fs::write(&self.name, &bytes) {
            warn!(path = %self.name.display(), error = %source, "save failed");
            return Err(DocumentError::Write {
                path: self.name.clone(),
                source,
            });
        }

        self.dirty = false;
        debug!(
            path = %self.name.display(),
            bytes = bytes.len(),
            lines = self.line_count(),
            "document saved"
        );
        Ok(self.line_count())
    }

    /// The on-disk layout: each line's content followed by `\n`.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let size = self.lines.iter().map(|line| line.len() + 1).sum();
        let mut out = Vec::with_capacity(size);
        for line in &self.lines {
            out.extend_from_slice(line.content());
            out.push(b'\n');
        }
        out
    }

    /// Report the first line whose terminator slot is corrupted.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::Inconsistent`] naming the row and the byte
    /// found where the terminator should be.
    pub fn check_consistency(&self) -> Result<(), DocumentError> {
        for (row, line) in self.lines.iter().enumerate() {
            match line.terminator() {
                Some(terminator) if terminator != TERMINATOR => {
                    return Err(DocumentError::Inconsistent { row, terminator });
                }
                _ => {}
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The path this document saves to.
    #[must_use]
    pub fn name(&self) -> &Path {
        &self.name
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub const fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    pub(crate) fn line_mut(&mut self, row: usize) -> Option<&mut Line> {
        self.lines.get_mut(row)
    }

    pub(crate) fn insert_line(&mut self, row: usize, line: Line) {
        self.lines.insert(row, line);
    }

    pub(crate) fn remove_line(&mut self, row: usize) -> Option<Line> {
        self.lines.remove(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn contents(doc: &Document) -> Vec<&[u8]> {
        doc.lines().map(Line::content).collect()
    }

    #[test]
    fn parse_splits_on_newline() {
        let doc = Document::parse("t", b"ab\ncd\n");
        assert_eq!(contents(&doc), vec![&b"ab"[..], b"cd"]);
        assert!(!doc.is_dirty());
    }

    #[test]
    fn parse_empty_segments_become_empty_lines() {
        let doc = Document::parse("t", b"a\n\n\nb\n");
        assert_eq!(doc.line_count(), 4);
        assert!(doc.line(1).is_some_and(Line::is_empty));
        assert!(doc.line(2).is_some_and(Line::is_empty));
    }

    #[test]
    fn parse_empty_source_has_no_lines() {
        let doc = Document::parse("t", b"");
        assert_eq!(doc.line_count(), 0);
        assert_eq!(doc.line(0), None);
    }

    #[test]
    fn parse_keeps_unterminated_tail() {
        let doc = Document::parse("t", b"ab\ncd");
        assert_eq!(contents(&doc), vec![&b"ab"[..], b"cd"]);
    }

    #[test]
    fn to_bytes_terminates_every_line() {
        let doc = Document::parse("t", b"ab\n\ncd");
        assert_eq!(doc.to_bytes(), b"ab\n\ncd\n");
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");
        let err = Document::open(&path).unwrap_err();
        assert!(matches!(err, DocumentError::Open { .. }));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn open_reads_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.txt");
        fs::write(&path, "one\ntwo\n").unwrap();

        let doc = Document::open(&path).unwrap();
        assert_eq!(contents(&doc), vec![&b"one"[..], b"two"]);
        assert_eq!(doc.name(), path.as_path());
    }

    #[test]
    fn save_refuses_clean_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clean.txt");
        let mut doc = Document::parse(&path, b"x\n");
        assert!(matches!(doc.save(), Err(DocumentError::NotDirty)));
        assert!(!path.exists());
    }

    #[test]
    fn save_refuses_empty_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        let mut doc = Document::new(&path);
        doc.mark_dirty();
        assert!(matches!(doc.save(), Err(DocumentError::NoContent)));
        assert!(!path.exists());
    }

    #[test]
    fn save_writes_and_clears_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut doc = Document::parse(&path, b"ab\ncd");
        doc.mark_dirty();

        assert_eq!(doc.save().unwrap(), 2);
        assert!(!doc.is_dirty());
        assert_eq!(fs::read(&path).unwrap(), b"ab\ncd\n");
    }

    #[test]
    fn save_failure_keeps_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.txt");
        let mut doc = Document::parse(&path, b"ab\n");
        doc.mark_dirty();

        assert!(matches!(doc.save(), Err(DocumentError::Write { .. })));
        assert!(doc.is_dirty());
    }

    #[test]
    fn loaded_document_is_consistent() {
        let doc = Document::parse("t", b"a\n\nbc\n");
        assert!(doc.check_consistency().is_ok());
    }

    #[test]
    fn corrupted_line_is_reported() {
        let mut doc = Document::parse("t", b"a\nbc\n");
        if let Some(Line::Occupied(buf)) = doc.line_mut(1) {
            if let Some(slot) = buf.last_mut() {
                *slot = 7;
            }
        }
        let err = doc.check_consistency().unwrap_err();
        assert!(matches!(
            err,
            DocumentError::Inconsistent {
                row: 1,
                terminator: 7
            }
        ));
    }
}
