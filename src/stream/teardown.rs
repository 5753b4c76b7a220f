//! Role-aware shutdown of layered streams.

use std::fmt;

use crate::error::{Error, Result};

use super::LayeredStream;

/// Which side of a connection is shutting it down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    /// The side that initiated the connection.
    Client,
    /// The side that accepted the connection.
    Server,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Server => write!(f, "server"),
        }
    }
}

/// Orderly, protocol-level shutdown of a stream.
///
/// Protocol layers call this before closing the underlying transport. The
/// sequencing may depend on which [`Role`] is tearing the connection down.
pub trait Teardown: LayeredStream {
    /// Tear the stream down, reporting failure through `ec`.
    fn teardown(&mut self, role: Role, ec: &mut Option<Error>);

    /// Start tearing the stream down.
    ///
    /// `handler` is posted to the stream's executor once the teardown
    /// completes; it is never invoked before this call returns.
    fn async_teardown<H>(&mut self, role: Role, handler: H)
    where
        H: FnOnce(Result<()>) + Send + 'static;
}

/// Tear down `stream` for `role`, reporting failure through `ec`.
pub fn teardown<S>(role: Role, stream: &mut S, ec: &mut Option<Error>)
where
    S: Teardown,
{
    stream.teardown(role, ec);
}

/// Start tearing down `stream` for `role`.
pub fn async_teardown<S, H>(role: Role, stream: &mut S, handler: H)
where
    S: Teardown,
    H: FnOnce(Result<()>) + Send + 'static,
{
    stream.async_teardown(role, handler);
}
