// SPDX-License-Identifier: MIT
//
// Terminal control: raw mode, alternate screen, and RAII cleanup.
//
// Safety: termios (tcgetattr, tcsetattr), ioctl (TIOCGWINSZ), isatty and the
// raw fd write in the panic hook are plain POSIX calls with no safe
// equivalent in std. Each unsafe block is minimal.
#![allow(unsafe_code)]
//
// Session setup, in order:
//
//   raw mode → alternate screen → hide cursor → clear → X10 mouse on
//
// Teardown runs the same list backwards. It runs from `leave`, from `Drop`,
// and from a panic hook that writes a canned byte string to fd 1 and puts
// the saved termios back before the panic message prints.

use std::io::{self, Write};
#[cfg(unix)]
use std::sync::Mutex;
use std::sync::Once;

use tracing::debug;

use crate::ansi;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub cols: u16,
    pub rows: u16,
}

impl Size {
    /// Used whenever the real size cannot be queried.
    pub const FALLBACK: Self = Self { cols: 80, rows: 24 };
}

/// Window size of stdout, or `None` when it is not a terminal.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    // SAFETY: TIOCGWINSZ only writes into `ws`.
    let rc = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };
    (rc == 0 && ws.ws_col > 0 && ws.ws_row > 0).then_some(Size {
        cols: ws.ws_col,
        rows: ws.ws_row,
    })
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Whether stdin is a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Raw Mode ───────────────────────────────────────────────────────────────

/// Saved stdin attributes; restoring them ends raw mode.
#[cfg(unix)]
struct RawMode {
    saved: libc::termios,
}

/// Second copy of the saved attributes for the panic hook.
#[cfg(unix)]
static SAVED_TERMIOS: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn read_attrs() -> io::Result<libc::termios> {
    let mut attrs: libc::termios = unsafe { std::mem::zeroed() };
    // SAFETY: tcgetattr fills `attrs` and touches nothing else.
    if unsafe { libc::tcgetattr(libc::STDIN_FILENO, &raw mut attrs) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(attrs)
}

#[cfg(unix)]
fn write_attrs(attrs: &libc::termios) -> io::Result<()> {
    // SAFETY: tcsetattr only reads `attrs`.
    if unsafe { libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, attrs) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Byte-at-a-time input with no echo, no signals, no CR translation and
/// no output processing.
#[cfg(unix)]
const fn make_raw(mut attrs: libc::termios) -> libc::termios {
    attrs.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
    attrs.c_oflag &= !libc::OPOST;
    attrs.c_lflag &= !(libc::ECHO | libc::ICANON | libc::ISIG | libc::IEXTEN);
    attrs.c_cflag |= libc::CS8;
    // Reads follow a successful poll, so one byte is always there.
    attrs.c_cc[libc::VMIN] = 1;
    attrs.c_cc[libc::VTIME] = 0;
    attrs
}

#[cfg(unix)]
impl RawMode {
    /// Switch stdin to raw mode. `None` when stdin is not a terminal.
    fn enable() -> io::Result<Option<Self>> {
        if !is_tty() {
            return Ok(None);
        }
        let saved = read_attrs()?;
        write_attrs(&make_raw(saved))?;
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = Some(saved);
        }
        debug!("raw mode on");
        Ok(Some(Self { saved }))
    }

    fn disable(self) -> io::Result<()> {
        write_attrs(&self.saved)?;
        if let Ok(mut slot) = SAVED_TERMIOS.lock() {
            *slot = None;
        }
        debug!("raw mode off");
        Ok(())
    }
}

#[cfg(not(unix))]
struct RawMode;

#[cfg(not(unix))]
impl RawMode {
    #[allow(clippy::unnecessary_wraps)]
    const fn enable() -> io::Result<Option<Self>> {
        Ok(None)
    }

    #[allow(clippy::unnecessary_wraps)]
    const fn disable(self) -> io::Result<()> {
        Ok(())
    }
}

// ─── Panic Restore ──────────────────────────────────────────────────────────

/// Teardown as one write: mouse off, attributes reset, cursor shown, and
/// the alternate screen left last so the shell reappears clean.
const PANIC_TEARDOWN: &[u8] = b"\x1b[?9l\x1b[0m\x1b[?25h\x1b[?1049l";

/// Restore the terminal when a panic happens while it is raw.
///
/// [`Terminal::enter`] installs this itself. Hooks installed after it run
/// before the restore, so callers that want to see the panic on a still
/// intact screen (a file logger, say) install this first.
pub fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            panic_teardown();
            previous(info);
        }));
    });
}

/// The panicking frame may hold the stdout lock, so this goes to fd 1
/// directly.
fn panic_teardown() {
    #[cfg(unix)]
    {
        // SAFETY: writes a static buffer of known length.
        unsafe {
            let _ = libc::write(
                libc::STDOUT_FILENO,
                PANIC_TEARDOWN.as_ptr().cast::<libc::c_void>(),
                PANIC_TEARDOWN.len(),
            );
        }
        if let Some(saved) = SAVED_TERMIOS.lock().ok().and_then(|slot| *slot) {
            let _ = write_attrs(&saved);
        }
    }

    #[cfg(not(unix))]
    {
        let mut out = io::stdout();
        let _ = out.write_all(PANIC_TEARDOWN);
        let _ = out.flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Owner of the full-screen session.
///
/// [`enter`](Self::enter) sets the terminal up; [`leave`](Self::leave),
/// drop, and panics put it back.
///
/// ```no_run
/// use rite_term::terminal::Terminal;
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// // ... draw, read input ...
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    /// Present while raw mode is on.
    raw: Option<RawMode>,
    /// Cached; refresh with [`refresh_size`](Self::refresh_size).
    size: Size,
    active: bool,
}

impl Terminal {
    /// A handle with the current size (80×24 if unknown). Terminal modes are
    /// left alone until [`enter`](Self::enter).
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw: None,
            size: get_size().unwrap_or(Size::FALLBACK),
            active: false,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Ask the OS again and cache the answer.
    pub fn refresh_size(&mut self) -> Size {
        if let Some(size) = get_size() {
            self.size = size;
        }
        debug!(cols = self.size.cols, rows = self.size.rows, "terminal size");
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start the session. A no-op while already active.
    ///
    /// # Errors
    ///
    /// Termios or stdout failures.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }
        install_panic_hook();
        self.raw = RawMode::enable()?;

        let mut out = io::stdout().lock();
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        ansi::enable_mouse(&mut out)?;
        out.flush()?;

        self.active = true;
        Ok(())
    }

    /// End the session. A no-op while inactive.
    ///
    /// # Errors
    ///
    /// Stdout or termios failures.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        {
            let mut out = io::stdout().lock();
            ansi::disable_mouse(&mut out)?;
            ansi::reset(&mut out)?;
            ansi::cursor_show(&mut out)?;
            ansi::exit_alt_screen(&mut out)?;
            out.flush()?;
        }
        self.active = false;
        self.raw.take().map_or(Ok(()), RawMode::disable)
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn teardown_via_ansi() -> Vec<u8> {
        let mut out = Vec::new();
        ansi::disable_mouse(&mut out).unwrap();
        ansi::reset(&mut out).unwrap();
        ansi::cursor_show(&mut out).unwrap();
        ansi::exit_alt_screen(&mut out).unwrap();
        out
    }

    #[test]
    fn panic_teardown_matches_leave() {
        assert_eq!(PANIC_TEARDOWN, teardown_via_ansi().as_slice());
        assert!(PANIC_TEARDOWN.ends_with(b"\x1b[?1049l"));
    }

    #[cfg(unix)]
    #[test]
    fn raw_attrs() {
        let mut cooked: libc::termios = unsafe { std::mem::zeroed() };
        cooked.c_lflag = libc::ECHO | libc::ICANON | libc::ISIG;
        cooked.c_iflag = libc::ICRNL | libc::IXON;
        cooked.c_oflag = libc::OPOST;

        let raw = make_raw(cooked);
        assert_eq!(raw.c_lflag & (libc::ECHO | libc::ICANON | libc::ISIG), 0);
        assert_eq!(raw.c_iflag & (libc::ICRNL | libc::IXON), 0);
        assert_eq!(raw.c_oflag & libc::OPOST, 0);
        assert_eq!(raw.c_cflag & libc::CS8, libc::CS8);
        assert_eq!(raw.c_cc[libc::VMIN], 1);
        assert_eq!(raw.c_cc[libc::VTIME], 0);
    }

    #[test]
    fn fallback_size() {
        assert_eq!(Size::FALLBACK, Size { cols: 80, rows: 24 });
    }

    #[test]
    fn new_is_inactive_with_usable_size() {
        let term = Terminal::new();
        assert!(!term.is_active());
        assert!(term.size().cols > 0 && term.size().rows > 0);
    }

    #[test]
    fn leave_without_enter_is_noop() {
        let mut term = Terminal::new();
        term.leave().unwrap();
        assert!(!term.is_active());
    }

    #[test]
    fn enter_leave_cycles() {
        let mut term = Terminal::new();
        for _ in 0..2 {
            term.enter().unwrap();
            term.enter().unwrap();
            assert!(term.is_active());
            term.leave().unwrap();
            assert!(!term.is_active());
        }
    }

    #[test]
    fn refresh_size_updates_cache() {
        let mut term = Terminal::new();
        let size = term.refresh_size();
        assert_eq!(size, term.size());
    }
}
