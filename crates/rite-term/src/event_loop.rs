// SPDX-License-Identifier: MIT
//
// Event loop: read a chunk, decode it, hand the event to the app, repaint.
//
// Single-threaded and synchronous. Each iteration reads at most one chunk
// (waiting up to the poll timeout), decodes it into at most one event, and
// repaints after every event. Empty reads are not wasted: they are when the
// decoder checks for a pending resize. The loop ends on the quit byte, when
// the app asks to quit, or when stdin closes; the terminal is restored on
// every one of those paths.

use std::io::{self, Write};

use tracing::debug;

use crate::input::{Decoded, Decoder, Event};
use crate::keymap::Keymap;
use crate::reader::{CHUNK_SIZE, ChunkSource, StdinSource};
use crate::signal::{self, ResizeFlag};
use crate::terminal::{Size, Terminal};

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the loop after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Application interface for the event loop.
///
/// For every decoded event the loop calls [`on_resize`](App::on_resize)
/// (resize events only), then [`on_event`](App::on_event), then
/// [`paint`](App::paint).
pub trait App {
    /// Handle one decoded event. Return [`Action::Quit`] to stop the loop.
    fn on_event(&mut self, event: &Event) -> Action;

    /// Called with the new size before a resize event is delivered.
    fn on_resize(&mut self, _size: Size) {}

    /// Write a complete frame into `out`.
    ///
    /// `out` starts empty; the loop writes it to the terminal afterwards.
    ///
    /// # Errors
    ///
    /// Formatting into `out` never fails, but implementations may share code
    /// with writers that can.
    fn paint(&mut self, out: &mut Vec<u8>, size: Size) -> io::Result<()>;
}

// ─── Loop Config ─────────────────────────────────────────────────────────────

/// Input timing for the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    /// Bytes taken per read, at most [`CHUNK_SIZE`].
    pub chunk_size: usize,
    /// How long one read waits for input before coming back empty.
    pub poll_timeout_ms: u64,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            poll_timeout_ms: 100,
        }
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// Owns the terminal and the decoder; [`run`](Self::run) drives an [`App`].
///
/// ```no_run
/// use std::io;
/// use rite_term::event_loop::{Action, App, EventLoop, LoopConfig};
/// use rite_term::input::Event;
/// use rite_term::keymap::Keymap;
/// use rite_term::terminal::Size;
///
/// struct Hello;
///
/// impl App for Hello {
///     fn on_event(&mut self, _event: &Event) -> Action {
///         Action::Continue
///     }
///
///     fn paint(&mut self, out: &mut Vec<u8>, _size: Size) -> io::Result<()> {
///         out.extend_from_slice(b"\x1b[2J\x1b[Hhello, Ctrl+Q quits");
///         Ok(())
///     }
/// }
///
/// EventLoop::new(LoopConfig::default(), Keymap::default()).run(&mut Hello)?;
/// # Ok::<(), io::Error>(())
/// ```
pub struct EventLoop {
    terminal: Terminal,
    decoder: Decoder<'static>,
    config: LoopConfig,
}

impl EventLoop {
    /// A loop fed by the SIGWINCH handler's resize flag.
    #[must_use]
    pub fn new(config: LoopConfig, keymap: Keymap) -> Self {
        Self::with_resize_flag(config, keymap, &signal::RESIZE_PENDING)
    }

    /// A loop that reports resizes raised on `resize`.
    #[must_use]
    pub fn with_resize_flag(config: LoopConfig, keymap: Keymap, resize: &'static ResizeFlag) -> Self {
        Self {
            terminal: Terminal::new(),
            decoder: Decoder::new(keymap, resize),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn size(&self) -> Size {
        self.terminal.size()
    }

    /// Run until quit, restoring the terminal however the loop ends.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup, input, or output fails.
    pub fn run(&mut self, app: &mut impl App) -> io::Result<()> {
        self.terminal.enter()?;
        signal::install_resize_handler();

        let mut source = StdinSource::new(&self.config);
        let result = {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            self.pump(&mut source, app, &mut out)
        };

        self.terminal.leave()?;
        result
    }

    /// The loop body, over any input source and output sink.
    fn pump(
        &mut self,
        source: &mut impl ChunkSource,
        app: &mut impl App,
        out: &mut impl Write,
    ) -> io::Result<()> {
        let mut frame = Vec::with_capacity(4096);
        let mut buf = [0u8; CHUNK_SIZE];
        let chunk = self.config.chunk_size.clamp(1, CHUNK_SIZE);

        self.repaint(app, &mut frame, out)?;

        loop {
            let n = match source.read_chunk(&mut buf[..chunk]) {
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!("input closed");
                    return Ok(());
                }
                Err(err) => return Err(err),
            };

            match self.decoder.decode(&buf[..n]) {
                Decoded::Quit => {
                    debug!("quit requested");
                    return Ok(());
                }
                Decoded::Nothing => {}
                Decoded::Event(event) => {
                    if event == Event::Resize {
                        let size = self.terminal.refresh_size();
                        app.on_resize(size);
                    }
                    if app.on_event(&event) == Action::Quit {
                        return Ok(());
                    }
                    self.repaint(app, &mut frame, out)?;
                }
            }
        }
    }

    fn repaint(
        &self,
        app: &mut impl App,
        frame: &mut Vec<u8>,
        out: &mut impl Write,
    ) -> io::Result<()> {
        frame.clear();
        app.paint(frame, self.terminal.size())?;
        out.write_all(frame)?;
        out.flush()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
