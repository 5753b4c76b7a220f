//! The call-counting failure policy.
//!
//! This module provides [`FaultCounter`], which decides on which consultation
//! a [`FailStream`](super::FailStream) injects its failure.

use std::cell::Cell;

use tracing::trace;

use crate::error::{Error, Result};

/// A failure policy based on call count.
///
/// The counter fails the `n`th time it is consulted and, once triggered,
/// keeps failing on every later consultation. A threshold of zero behaves
/// like a threshold of one: the very first consultation fails.
///
/// The count lives in a [`Cell`], so a `FaultCounter` can be shared by plain
/// reference between several streams on one thread. It is not `Sync`; tests
/// that want to share one budget across threads must wrap it in their own
/// synchronization.
///
/// # Example
///
/// ```rust
/// use fail_stream::chaos::FaultCounter;
/// use fail_stream::Error;
///
/// let counter = FaultCounter::new(3);
///
/// assert!(counter.fail().is_ok());
/// assert!(counter.fail().is_ok());
/// assert_eq!(counter.fail(), Err(Error::TestFailure));
///
/// // Failure is sticky once the threshold is reached
/// assert_eq!(counter.fail(), Err(Error::TestFailure));
/// ```
#[derive(Debug)]
pub struct FaultCounter {
    threshold: u64,
    error: Error,
    calls: Cell<u64>,
    failures: Cell<u64>,
}

impl FaultCounter {
    /// Create a counter that fails on the `n`th consultation with
    /// [`Error::TestFailure`].
    #[must_use]
    pub fn new(n: u64) -> Self {
        Self::with_error(n, Error::TestFailure)
    }

    /// Create a counter that fails on the `n`th consultation with `error`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::io::ErrorKind;
    ///
    /// use fail_stream::chaos::FaultCounter;
    /// use fail_stream::Error;
    ///
    /// let reset = Error::io(ErrorKind::ConnectionReset, "peer reset");
    /// let counter = FaultCounter::with_error(1, reset.clone());
    ///
    /// assert_eq!(counter.fail(), Err(reset));
    /// ```
    #[must_use]
    pub fn with_error(n: u64, error: Error) -> Self {
        Self {
            threshold: n,
            error,
            calls: Cell::new(0),
            failures: Cell::new(0),
        }
    }

    /// Set the error injected once the threshold is reached.
    #[must_use]
    pub fn error(mut self, error: Error) -> Self {
        self.error = error;
        self
    }

    /// Consult the counter, failing fast.
    ///
    /// Returns the configured error once the threshold is reached.
    pub fn fail(&self) -> Result<()> {
        if self.consult() {
            Err(self.error.clone())
        } else {
            Ok(())
        }
    }

    /// Consult the counter, reporting failure through `ec`.
    ///
    /// Returns `true` and stores the configured error in `ec` once the
    /// threshold is reached. Otherwise `ec` is left untouched.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fail_stream::chaos::FaultCounter;
    ///
    /// let counter = FaultCounter::new(2);
    /// let mut ec = None;
    ///
    /// assert!(!counter.fail_ec(&mut ec));
    /// assert!(ec.is_none());
    ///
    /// assert!(counter.fail_ec(&mut ec));
    /// assert!(ec.is_some());
    /// ```
    pub fn fail_ec(&self, ec: &mut Option<Error>) -> bool {
        if self.consult() {
            *ec = Some(self.error.clone());
            true
        } else {
            false
        }
    }

    /// Returns the configured threshold.
    #[must_use]
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    /// Returns the configured error.
    #[must_use]
    pub fn configured_error(&self) -> &Error {
        &self.error
    }

    /// Returns the number of consultations so far.
    #[must_use]
    pub fn calls(&self) -> u64 {
        self.calls.get()
    }

    /// Returns the number of consultations that failed.
    #[must_use]
    pub fn failures(&self) -> u64 {
        self.failures.get()
    }

    /// Returns true once the threshold has been reached.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        self.calls.get() >= self.threshold.max(1)
    }

    /// Reset the counter to its initial state.
    pub fn reset(&self) {
        self.calls.set(0);
        self.failures.set(0);
    }

    fn consult(&self) -> bool {
        self.calls.set(self.calls.get().saturating_add(1));

        let fails = self.is_triggered();
        if fails {
            self.failures.set(self.failures.get() + 1);
        }

        trace!(
            call = self.calls.get(),
            threshold = self.threshold,
            fails,
            "fault counter consulted"
        );
        fails
    }
}
