#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
//! minitest: a small convention-based test runner
//!
//! Test cases are zero-argument functions bound under `test_`-prefixed names in a [`Namespace`].
//! The runner discovers them, runs each in binding order, records assertion failures, and stops
//! the whole run on anything that is not an assertion failure.
//!
//! ```rust
//! use minitest::{CaseResult, check, run_tests, suite};
//!
//! #[suite]
//! mod math {
//!     use minitest::{CaseResult, check};
//!
//!     pub fn test_add() -> CaseResult {
//!         check!(1 + 1 == 2);
//!         Ok(())
//!     }
//! }
//!
//! fn is_positive(x: i32) -> CaseResult {
//!     check!(x > 0);
//!     Ok(())
//! }
//!
//! let mut ns = math::namespace();
//! minitest::parametric(&mut ns, is_positive, [1, 2, 3]);
//! let result = run_tests(&ns, false).unwrap();
//! assert_eq!(result.passed(), 4);
//! ```
//!
//! ## Panic Policy
//!
//! - **Library code**: errors travel as `Result` values; `unwrap()` is denied at the crate root.
//! - **Test bodies**: return [`CaseResult`]. An `Err` holding a [`TestFailure`] is a failed case;
//!   any other `Err` (or a panic) is an unexpected error and aborts the run.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

// Lets `::minitest::...` paths emitted by the macros resolve inside this crate too.
extern crate self as minitest;

pub mod assertions;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod errors;
pub mod executor;
pub mod namespace;
pub mod parametric;
pub mod reporter;
pub mod selfcheck;
pub mod version;

pub use assertions::{assert_equal, assert_raises, assert_true, fail};
pub use config::{FailFastOverride, ProcessArgs, RunConfig};
pub use discovery::{PrefixDiscovery, TestDiscovery, discover};
pub use errors::RunError;
pub use executor::{CaseOutcome, CaseState, RunResult, RunState, TestExecutor, run_tests};
pub use namespace::{CaseResult, IntoCaseResult, Namespace, TestFn};
pub use parametric::{Scalar, Spread, Template, parametric, parametric_named};
pub use reporter::{ConsoleReporter, RunSummary, TestReporter};

pub use minitest_core::{FAIL_FAST_FLAG, TEST_PREFIX, TestFailure};
pub use minitest_derive::{check, check_raises, suite};

// Re-exported so test bodies can name the error channel without a direct dependency.
pub use anyhow;
