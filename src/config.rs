// SPDX-License-Identifier: MIT
//
// Startup configuration from the command line and environment.
//
//   rite [path]          file to edit; without one, an empty "untitled"
//   RITE_LOG_DIR=<dir>   write rite.log there (no logging when unset)
//   RITE_LOG=<filter>    tracing filter, default "warn"
//   TERM                 picks the keymap family

use std::ffi::OsString;
use std::path::PathBuf;

use rite_term::keymap::TerminalFamily;

/// Document name used when no path is given.
pub const UNTITLED: &str = "untitled";

/// Filter used when `RITE_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// File given on the command line, if any.
    pub path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_filter: String,
    pub family: TerminalFamily,
}

impl Config {
    /// Read the real process arguments and environment.
    pub fn from_env() -> Self {
        Self::from_parts(std::env::args_os(), |key| std::env::var_os(key))
    }

    /// Build from an argument list (program name first) and a variable lookup.
    pub fn from_parts(
        args: impl IntoIterator<Item = OsString>,
        var: impl Fn(&str) -> Option<OsString>,
    ) -> Self {
        let path = args.into_iter().nth(1).map(PathBuf::from);
        let log_dir = var("RITE_LOG_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        let log_filter = var("RITE_LOG")
            .and_then(|filter| filter.into_string().ok())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());
        let family = var("TERM")
            .map(|term| TerminalFamily::detect(&term.to_string_lossy()))
            .unwrap_or_default();

        Self {
            path,
            log_dir,
            log_filter,
            family,
        }
    }

    /// The path the document is bound to.
    pub fn document_path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(|| PathBuf::from(UNTITLED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config(args: &[&str], vars: &[(&str, &str)]) -> Config {
        let vars: Vec<(String, OsString)> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), OsString::from(v)))
            .collect();
        Config::from_parts(args.iter().map(OsString::from), |key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
    }

    #[test]
    fn defaults() {
        let c = config(&["rite"], &[]);
        assert_eq!(
            c,
            Config {
                path: None,
                log_dir: None,
                log_filter: "warn".to_owned(),
                family: TerminalFamily::Default,
            }
        );
        assert_eq!(c.document_path(), PathBuf::from("untitled"));
    }

    #[test]
    fn path_argument() {
        let c = config(&["rite", "notes.txt", "ignored"], &[]);
        assert_eq!(c.path, Some(PathBuf::from("notes.txt")));
        assert_eq!(c.document_path(), PathBuf::from("notes.txt"));
    }

    #[test]
    fn environment() {
        let c = config(
            &["rite"],
            &[
                ("RITE_LOG_DIR", "/tmp/rite"),
                ("RITE_LOG", "rite_term=trace"),
                ("TERM", "st-256color"),
            ],
        );
        assert_eq!(c.log_dir, Some(PathBuf::from("/tmp/rite")));
        assert_eq!(c.log_filter, "rite_term=trace");
        assert_eq!(c.family, TerminalFamily::St);
    }

    #[test]
    fn empty_log_dir_disables_logging() {
        let c = config(&["rite"], &[("RITE_LOG_DIR", "")]);
        assert_eq!(c.log_dir, None);
    }
}
