//! The expected-failure signal raised by assertions.

use miette::Diagnostic;
use thiserror::Error;

/// Why a single test case did not pass.
///
/// A `TestFailure` is the only error kind the executor recovers from: it is recorded against the
/// failing case and the run continues. Every other error coming out of a test body aborts the run.
///
/// ## Notes
///
/// - Immutable once built; the message is fixed at construction.
/// - Assertions build these; test bodies may also build one by hand with [`TestFailure::new`].
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(minitest::test_failure))]
pub struct TestFailure {
    message: String,
}

impl TestFailure {
    /// Create a failure with a human-readable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message explaining the failure.
    pub fn message(&self) -> &str {
        &self.message
    }
}
