//! # fail-stream
//!
//! > Deterministic I/O failures for protocol tests
//!
//! **fail-stream** wraps any layered stream so that the `n`th operation on it
//! fails with a chosen error while every earlier operation behaves exactly like
//! the real transport. Moving `n` from 1 upwards walks a failure through every
//! step of a handshake or teardown sequence.
//!
//! ## Quick Start
//!
//! ```rust
//! use fail_stream::prelude::*;
//!
//! let ctx = IoContext::new();
//! let mut stream = FailStream::new(2, MockStream::new(ctx.clone()).with_input(b"hello"));
//!
//! let mut buf = [0u8; 16];
//! let mut ec = None;
//!
//! // First call goes through to the wrapped stream
//! assert_eq!(stream.read_some_ec(&mut buf, &mut ec), 5);
//! assert!(ec.is_none());
//!
//! // Second call fails without touching it
//! assert_eq!(stream.read_some_ec(&mut buf, &mut ec), 0);
//! assert_eq!(ec, Some(Error::TestFailure));
//! assert_eq!(stream.next_layer().stats().reads, 1);
//! ```
//!
//! ## Features
//!
//! - **Three call forms** - strict (`Result`), explicit (error slot) and
//!   deferred (completion handler), each preserved by the wrapper
//! - **Shared budgets** - several wrappers can draw from one [`FaultCounter`](chaos::FaultCounter)
//! - **Nesting** - wrappers stack, and `lowest_layer()` reaches the real transport
//! - **No inline completions** - injected failures are posted to the executor
//!   like any other completion

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod chaos;
pub mod error;
pub mod executor;
pub mod mock;
pub mod stream;

/// Prelude for convenient imports
///
/// ```rust
/// use fail_stream::prelude::*;
/// ```
pub mod prelude {
    pub use crate::chaos::{FailStream, FaultCounter};
    pub use crate::error::{Error, Result};
    pub use crate::executor::{Executor, IoContext};
    pub use crate::mock::{MockStats, MockStream};
    pub use crate::stream::{
        async_teardown, teardown, LayeredStream, ReadStream, Role, Teardown, WriteStream,
    };
}

// Re-exports
pub use error::{Error, Result};
