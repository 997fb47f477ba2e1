// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Chunked stdin reader.
//
// Input arrives one read at a time, at most `CHUNK_SIZE` bytes per read, and
// each read is decoded as a unit: a keypress, an escape sequence or a mouse
// report all fit in one chunk. The reader polls stdin with a short timeout
// first, so an idle terminal produces periodic empty reads. The decoder uses
// those empty reads to notice a pending resize.

use std::io;

use crate::event_loop::LoopConfig;

/// Largest number of bytes taken from stdin in one read.
pub const CHUNK_SIZE: usize = 16;

/// A source of raw input chunks.
pub trait ChunkSource {
    /// Fill `buf` with the next chunk and return its length.
    ///
    /// `Ok(0)` means nothing arrived before the timeout (or the wait was
    /// interrupted by a signal).
    ///
    /// # Errors
    ///
    /// [`io::ErrorKind::UnexpectedEof`] once the input is closed, or any
    /// other read failure.
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Reads stdin with `poll(2)` + `read(2)`.
#[derive(Debug, Clone, Copy)]
pub struct StdinSource {
    timeout_ms: i32,
}

impl StdinSource {
    #[must_use]
    pub fn new(config: &LoopConfig) -> Self {
        Self {
            timeout_ms: i32::try_from(config.poll_timeout_ms).unwrap_or(i32::MAX),
        }
    }
}

impl ChunkSource for StdinSource {
    #[cfg(unix)]
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let ready = unsafe {
            let mut pfd = libc::pollfd {
                fd: libc::STDIN_FILENO,
                events: libc::POLLIN,
                revents: 0,
            };
            libc::poll(&raw mut pfd, 1, self.timeout_ms)
        };

        if ready < 0 {
            let err = io::Error::last_os_error();
            return if err.kind() == io::ErrorKind::Interrupted {
                Ok(0)
            } else {
                Err(err)
            };
        }
        if ready == 0 {
            return Ok(0);
        }

        let want = buf.len().min(CHUNK_SIZE);
        let n = unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), want) };

        match n {
            0 => Err(io::ErrorKind::UnexpectedEof.into()),
            n if n < 0 => {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    Ok(0)
                } else {
                    Err(err)
                }
            }
            #[allow(clippy::cast_sign_loss)] // n > 0
            n => Ok(n as usize),
        }
    }

    #[cfg(not(unix))]
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        use std::io::Read;

        let want = buf.len().min(CHUNK_SIZE);
        match io::stdin().lock().read(&mut buf[..want])? {
            0 => Err(io::ErrorKind::UnexpectedEof.into()),
            n => Ok(n),
        }
    }
}

/// Replays a fixed list of chunks, then reports end of input.
#[cfg(test)]
pub(crate) struct ScriptedSource {
    chunks: std::collections::VecDeque<Vec<u8>>,
}

#[cfg(test)]
impl ScriptedSource {
    pub(crate) fn new(chunks: &[&[u8]]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
        }
    }
}

#[cfg(test)]
impl ChunkSource for ScriptedSource {
    fn read_chunk(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let chunk = self
            .chunks
            .pop_front()
            .ok_or(io::ErrorKind::UnexpectedEof)?;
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        Ok(n)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
