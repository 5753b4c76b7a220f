//! An in-memory stream that records how it is used.
//!
//! [`MockStream`] is the transport a [`FailStream`](crate::chaos::FailStream)
//! usually wraps in tests: reads drain a preloaded input buffer, writes are
//! captured, and every call is counted so a test can prove whether the
//! wrapped stream was touched.
//!
//! # Example
//!
//! ```rust
//! use fail_stream::executor::IoContext;
//! use fail_stream::mock::MockStream;
//! use fail_stream::stream::{ReadStream, WriteStream};
//!
//! let mut stream = MockStream::new(IoContext::new()).with_input(b"ping");
//!
//! let mut buf = [0u8; 8];
//! assert_eq!(stream.read_some(&mut buf), Ok(4));
//! assert_eq!(&buf[..4], b"ping");
//!
//! stream.write_some(b"pong").unwrap();
//! assert_eq!(stream.written(), b"pong");
//! assert_eq!(stream.stats().reads, 1);
//! ```

use std::collections::VecDeque;

use crate::error::{Error, Result};
use crate::executor::{Executor, IoContext};
use crate::stream::{LayeredStream, ReadStream, Role, Teardown, WriteStream};

/// Counts of the calls a [`MockStream`] has served.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MockStats {
    /// Strict and explicit reads.
    pub reads: u64,
    /// Strict and explicit writes.
    pub writes: u64,
    /// Deferred reads.
    pub async_reads: u64,
    /// Deferred writes.
    pub async_writes: u64,
    /// Synchronous teardowns.
    pub teardowns: u64,
    /// Deferred teardowns.
    pub async_teardowns: u64,
}

impl MockStats {
    /// Total number of calls of any kind.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.reads
            + self.writes
            + self.async_reads
            + self.async_writes
            + self.teardowns
            + self.async_teardowns
    }
}

/// A deterministic in-memory transport.
///
/// Reads return bytes from the input buffer (zero bytes once it is empty),
/// optionally capped per call by [`read_limit`](MockStream::read_limit).
/// After a teardown every operation fails with [`Error::Closed`].
///
/// Deferred operations do their work immediately and post the completion
/// handler to the stream's [`IoContext`].
#[derive(Debug)]
pub struct MockStream {
    ctx: IoContext,
    input: VecDeque<u8>,
    output: Vec<u8>,
    read_limit: Option<usize>,
    closed: bool,
    teardowns: Vec<Role>,
    stats: MockStats,
}

impl MockStream {
    /// Create an empty stream that posts completions to `ctx`.
    #[must_use]
    pub fn new(ctx: IoContext) -> Self {
        Self {
            ctx,
            input: VecDeque::new(),
            output: Vec::new(),
            read_limit: None,
            closed: false,
            teardowns: Vec::new(),
            stats: MockStats::default(),
        }
    }

    /// Preload bytes to be returned by reads.
    #[must_use]
    pub fn with_input(mut self, bytes: &[u8]) -> Self {
        self.input.extend(bytes);
        self
    }

    /// Cap the number of bytes a single read returns.
    #[must_use]
    pub fn read_limit(mut self, limit: usize) -> Self {
        self.read_limit = Some(limit);
        self
    }

    /// Append bytes to be returned by later reads.
    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    /// Returns the number of input bytes not yet read.
    #[must_use]
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }

    /// Returns everything written so far.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.output
    }

    /// Take everything written so far, clearing the output buffer.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Returns the roles of every successful teardown, in order.
    #[must_use]
    pub fn teardowns(&self) -> &[Role] {
        &self.teardowns
    }

    /// Returns true once the stream has been torn down.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns call statistics.
    #[must_use]
    pub fn stats(&self) -> MockStats {
        self.stats
    }

    fn do_read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.closed {
            return Err(Error::Closed);
        }

        let limit = self.read_limit.unwrap_or(usize::MAX);
        let n = buf.len().min(self.input.len()).min(limit);
        for (dst, src) in buf.iter_mut().zip(self.input.drain(..n)) {
            *dst = src;
        }
        Ok(n)
    }

    fn do_write(&mut self, buf: &[u8]) -> Result<usize> {
        if self.closed {
            return Err(Error::Closed);
        }

        self.output.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn do_teardown(&mut self, role: Role) -> Result<()> {
        if self.closed {
            return Err(Error::Closed);
        }

        self.closed = true;
        self.teardowns.push(role);
        Ok(())
    }
}

impl LayeredStream for MockStream {
    type LowestLayer = Self;
    type Executor = IoContext;

    fn lowest_layer(&self) -> &Self {
        self
    }

    fn lowest_layer_mut(&mut self) -> &mut Self {
        self
    }

    fn executor(&self) -> &IoContext {
        &self.ctx
    }
}

impl ReadStream for MockStream {
    fn read_some(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.stats.reads += 1;
        self.do_read(buf)
    }

    fn read_some_ec(&mut self, buf: &mut [u8], ec: &mut Option<Error>) -> usize {
        self.stats.reads += 1;
        match self.do_read(buf) {
            Ok(n) => n,
            Err(err) => {
                *ec = Some(err);
                0
            }
        }
    }

    fn async_read_some<B, H>(&mut self, mut buf: B, handler: H)
    where
        B: AsMut<[u8]> + Send + 'static,
        H: FnOnce(Result<usize>, B) + Send + 'static,
    {
        self.stats.async_reads += 1;
        let result = self.do_read(buf.as_mut());
        self.ctx.post(move || handler(result, buf));
    }
}

impl WriteStream for MockStream {
    fn write_some(&mut self, buf: &[u8]) -> Result<usize> {
        self.stats.writes += 1;
        self.do_write(buf)
    }

    fn write_some_ec(&mut self, buf: &[u8], ec: &mut Option<Error>) -> usize {
        self.stats.writes += 1;
        match self.do_write(buf) {
            Ok(n) => n,
            Err(err) => {
                *ec = Some(err);
                0
            }
        }
    }

    fn async_write_some<B, H>(&mut self, buf: B, handler: H)
    where
        B: AsRef<[u8]> + Send + 'static,
        H: FnOnce(Result<usize>, B) + Send + 'static,
    {
        self.stats.async_writes += 1;
        let result = self.do_write(buf.as_ref());
        self.ctx.post(move || handler(result, buf));
    }
}

impl Teardown for MockStream {
    fn teardown(&mut self, role: Role, ec: &mut Option<Error>) {
        self.stats.teardowns += 1;
        if let Err(err) = self.do_teardown(role) {
            *ec = Some(err);
        }
    }

    fn async_teardown<H>(&mut self, role: Role, handler: H)
    where
        H: FnOnce(Result<()>) + Send + 'static,
    {
        self.stats.async_teardowns += 1;
        let result = self.do_teardown(role);
        self.ctx.post(move || handler(result));
    }
}
