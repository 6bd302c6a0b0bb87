//! Run configuration
//!
//! [`RunConfig`] holds what the caller asks for. The process-wide fail-fast override is a
//! separate input ([`FailFastOverride`]) consulted at the start of every run, so a `--failfast`
//! on the command line wins over whatever the calling code requested.

use std::env;
use std::ffi::{OsStr, OsString};

use minitest_core::FAIL_FAST_FLAG;

/// Options for a single run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Stop at the first failing case instead of collecting every failure.
    pub fail_fast: bool,
    /// Only run discovered cases whose name contains this keyword.
    pub filter: Option<String>,
    /// Report one line per case instead of one character.
    pub verbose: bool,
    /// Colour console output.
    pub color: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            filter: None,
            verbose: false,
            color: true,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Resolve the fail-fast flag for one run: the override forces it on, never off.
    pub fn effective_fail_fast(&self, overrides: &dyn FailFastOverride) -> bool {
        self.fail_fast || overrides.fail_fast_forced()
    }
}

/// External input that can force fail-fast for every run.
pub trait FailFastOverride {
    fn fail_fast_forced(&self) -> bool;
}

/// Reads the process arguments for [`FAIL_FAST_FLAG`] each time it is asked.
///
/// Arguments are compared as `OsStr`, so non-UTF-8 arguments are skipped rather than fatal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessArgs;

impl FailFastOverride for ProcessArgs {
    fn fail_fast_forced(&self) -> bool {
        args_force_fail_fast(env::args_os())
    }
}

/// A fixed argument list, for embedding callers and tests.
impl FailFastOverride for [String] {
    fn fail_fast_forced(&self) -> bool {
        args_force_fail_fast(self.iter())
    }
}

impl FailFastOverride for Vec<String> {
    fn fail_fast_forced(&self) -> bool {
        self.as_slice().fail_fast_forced()
    }
}

impl FailFastOverride for [OsString] {
    fn fail_fast_forced(&self) -> bool {
        args_force_fail_fast(self.iter())
    }
}

impl FailFastOverride for Vec<OsString> {
    fn fail_fast_forced(&self) -> bool {
        self.as_slice().fail_fast_forced()
    }
}

impl FailFastOverride for bool {
    fn fail_fast_forced(&self) -> bool {
        *self
    }
}

fn args_force_fail_fast<I>(args: I) -> bool
where
    I: IntoIterator,
    I::Item: AsRef<OsStr>,
{
    let flag = OsStr::new(FAIL_FAST_FLAG);
    args.into_iter().any(|arg| arg.as_ref() == flag)
}
