//! Errors that end a run.

use miette::Diagnostic;
use thiserror::Error;

use crate::executor::RunResult;

/// Why a run did not succeed.
///
/// Each variant carries the [`RunResult`] as it stood when the run ended, so callers can see which
/// cases were attempted. `Unexpected` and `FailFast` also carry the test's own error untouched;
/// use [`RunError::test_error`] and `anyhow::Error::downcast_ref` to inspect it.
#[derive(Debug, Error, Diagnostic)]
pub enum RunError {
    /// The run completed and at least one case failed an assertion.
    #[error("{}", .0.failure_report())]
    #[diagnostic(
        code(minitest::run::failures),
        help("every failing case is listed; `-k <name>` reruns a single one")
    )]
    Failures(Box<RunResult>),

    /// A case returned an error other than a test failure, or panicked.
    #[error("unexpected error in test `{test}` of namespace `{}`: {error:#}", .result.namespace())]
    #[diagnostic(
        code(minitest::run::unexpected),
        help("only assertion failures are collected; any other error stops the run")
    )]
    Unexpected {
        test: String,
        error: anyhow::Error,
        result: Box<RunResult>,
    },

    /// Fail-fast was on and a case returned an error; nothing after it ran.
    #[error("test `{test}` of namespace `{}` stopped the run (fail-fast): {error:#}", .result.namespace())]
    #[diagnostic(code(minitest::run::fail_fast))]
    FailFast {
        test: String,
        error: anyhow::Error,
        result: Box<RunResult>,
    },
}

impl RunError {
    /// The run state at the point the run ended.
    pub fn result(&self) -> &RunResult {
        match self {
            RunError::Failures(result) => result,
            RunError::Unexpected { result, .. } | RunError::FailFast { result, .. } => result,
        }
    }

    /// The case that ended the run, for `Unexpected` and `FailFast`.
    pub fn test_name(&self) -> Option<&str> {
        match self {
            RunError::Failures(_) => None,
            RunError::Unexpected { test, .. } | RunError::FailFast { test, .. } => Some(test),
        }
    }

    /// The error returned by the case that ended the run, untouched.
    pub fn test_error(&self) -> Option<&anyhow::Error> {
        match self {
            RunError::Failures(_) => None,
            RunError::Unexpected { error, .. } | RunError::FailFast { error, .. } => Some(error),
        }
    }
}
