//! Mock transports for exercising stream wrappers.
//!
//! - [`MockStream`] - In-memory stream that records every call
//! - [`MockStats`] - Per-operation call counts
//!
//! ```rust
//! use fail_stream::executor::IoContext;
//! use fail_stream::mock::MockStream;
//! use fail_stream::stream::WriteStream;
//!
//! let mut stream = MockStream::new(IoContext::new());
//! stream.write_some(b"hello").unwrap();
//!
//! assert_eq!(stream.written(), b"hello");
//! assert_eq!(stream.stats().writes, 1);
//! ```

mod stream;

pub use stream::{MockStats, MockStream};
