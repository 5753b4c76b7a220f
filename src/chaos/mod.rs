//! Deterministic failure injection for layered streams.
//!
//! This module provides the two pieces a fault-injection test is built from:
//!
//! - [`FaultCounter`] - Decides on which call the failure happens
//! - [`FailStream`] - Wraps a stream and fails once the counter says so
//!
//! # Example
//!
//! ```rust
//! use fail_stream::chaos::{FailStream, FaultCounter};
//! use fail_stream::executor::IoContext;
//! use fail_stream::mock::MockStream;
//! use fail_stream::stream::{ReadStream, WriteStream};
//!
//! let ctx = IoContext::new();
//!
//! // Run the same exchange with the failure moved one call later each time
//! for n in 1..4 {
//!     let counter = FaultCounter::new(n);
//!     let mut stream = FailStream::with_counter(
//!         &counter,
//!         MockStream::new(ctx.clone()).with_input(b"reply"),
//!     );
//!
//!     let mut buf = [0u8; 8];
//!     let outcome = stream
//!         .write_some(b"request")
//!         .and_then(|_| stream.read_some(&mut buf))
//!         .and_then(|_| stream.write_some(b"ack"));
//!
//!     assert!(outcome.is_err());
//!     assert_eq!(counter.calls(), n);
//! }
//! ```

mod counter;
mod fail_stream;

pub use counter::FaultCounter;
pub use fail_stream::FailStream;
