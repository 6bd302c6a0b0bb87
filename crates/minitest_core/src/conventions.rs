//! Shared runner conventions (well-known identifiers).

/// Reserved prefix that marks a namespace binding as a test case.
pub const TEST_PREFIX: &str = "test_";

/// Process argument that forces fail-fast for every run in the process.
pub const FAIL_FAST_FLAG: &str = "--failfast";
