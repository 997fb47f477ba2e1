// SPDX-License-Identifier: MIT
//
// File logging.
//
// The screen belongs to the editor, so logs go to `rite.log` in the
// configured directory through a non-blocking writer. Without a directory
// nothing is installed and every tracing macro is a no-op.

use std::panic::{self, PanicHookInfo};
use std::sync::Once;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, DEFAULT_LOG_FILTER};

pub const LOG_FILE: &str = "rite.log";

/// Install the subscriber and the panic logger.
///
/// Keep the returned guard alive until exit; dropping it flushes the file.
pub fn init(config: &Config) -> Option<WorkerGuard> {
    let dir = config.log_dir.as_ref()?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let filter = EnvFilter::try_new(&config.log_filter)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    install_panic_hook();
    tracing::info!(dir = %dir.display(), "logging started");
    Some(guard)
}

/// Log panics while the screen is still intact: the terminal restore hook
/// goes in first, so the logger chained over it runs ahead of it.
fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        rite_term::terminal::install_panic_hook();
        chain_panic_hook(|info| tracing::error!(target: "rite::panic", %info, "panic"));
    });
}

/// Run `first`, then whatever hook was installed before.
fn chain_panic_hook(first: impl Fn(&PanicHookInfo<'_>) + Send + Sync + 'static) {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        first(info);
        previous(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn no_log_dir_installs_nothing() {
        let config = Config::from_parts([OsString::from("rite")], |_| None);
        assert!(init(&config).is_none());
    }

    #[test]
    fn chained_hook_runs_before_the_earlier_one() {
        use std::sync::{Arc, Mutex};

        const MARK: &str = "chained hook order";
        let order = Arc::new(Mutex::new(Vec::new()));
        let ours = |info: &PanicHookInfo<'_>| info.payload().downcast_ref::<&str>() == Some(&MARK);

        let seen = Arc::clone(&order);
        panic::set_hook(Box::new(move |info| {
            if ours(info) {
                seen.lock().unwrap().push("restore");
            }
        }));
        let seen = Arc::clone(&order);
        chain_panic_hook(move |info| {
            if ours(info) {
                seen.lock().unwrap().push("log");
            }
        });

        let result = panic::catch_unwind(|| panic::panic_any(MARK));
        drop(panic::take_hook());

        assert!(result.is_err());
        assert_eq!(*order.lock().unwrap(), ["log", "restore"]);
    }
}
