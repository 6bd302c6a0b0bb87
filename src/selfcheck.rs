//! The suite the `minitest` binary runs: the runner checking its own conventions.

use std::time::Duration;

use crate::executor::CaseOutcome;
use crate::namespace::Namespace;
use crate::reporter::{RunSummary, TestReporter};
use crate::suite;

/// Reporter that drops every event; nested runs inside the suite use it.
struct Quiet;

impl TestReporter for Quiet {
    fn on_test_complete(&mut self, _name: &str, _outcome: &CaseOutcome, _duration: Duration) {}

    fn on_run_complete(&mut self, _summary: &RunSummary<'_>) {}
}

#[suite]
mod checks {
    use super::Quiet;
    use crate::{
        CaseResult, CaseState, Namespace, RunError, TestExecutor, TestFailure, assert_equal, assert_true,
        check, check_raises, discover,
    };

    fn executor() -> TestExecutor {
        TestExecutor::default().with_override(false)
    }

    fn test_truthiness_is_strict() -> CaseResult {
        check!(assert_true(true).is_ok());
        check!(assert_true(false).is_err());
        check!(assert_true(1).is_err());
        check!(assert_true("true").is_err());
        Ok(())
    }

    fn test_equality_failure_names_both_operands() -> CaseResult {
        let failure = check_raises!(TestFailure, assert_equal(2, 3));
        check!(failure.message() == "2 != 3");
        Ok(())
    }

    fn test_discovery_skips_helpers() -> CaseResult {
        let mut ns = Namespace::new("inner");
        ns.bind("test_a", || ());
        ns.bind("test_b", || ());
        ns.bind("helper", || ());
        check!(discover(&ns) == ["test_a", "test_b"]);
        Ok(())
    }

    fn test_failures_are_collected() -> CaseResult {
        let mut ns = Namespace::new("inner");
        ns.bind("test_a", || ());
        ns.bind("test_b", || assert_equal(2, 3));
        let err = check_raises!(RunError, executor().run(&ns, &mut Quiet));
        check!(matches!(&err, RunError::Failures(_)));
        check!(err.result().attempted() == 2);
        check!(err.result().failure("test_b").is_some());
        Ok(())
    }

    fn test_unexpected_error_stops_the_run() -> CaseResult {
        let mut ns = Namespace::new("inner");
        ns.bind("test_io", || -> std::io::Result<()> { Err(std::io::Error::other("disk")) });
        ns.bind("test_after", || ());
        let err = check_raises!(RunError, executor().run(&ns, &mut Quiet));
        check!(matches!(&err, RunError::Unexpected { .. }));
        check!(err.result().case_state("test_after") == Some(CaseState::Pending));
        Ok(())
    }

    fn test_reruns_are_identical() -> CaseResult {
        let mut ns = Namespace::new("inner");
        ns.bind("test_a", || ());
        ns.bind("test_b", || ());
        let first = executor().run(&ns, &mut Quiet)?;
        let second = executor().run(&ns, &mut Quiet)?;
        check!(first == second);
        Ok(())
    }

    pub(super) fn positive(x: i32) -> CaseResult {
        check!(x > 0);
        Ok(())
    }

    pub(super) fn commutes(x: i32, y: i32) -> CaseResult {
        check!(x + y == y + x);
        Ok(())
    }
}

/// The bundled self-check namespace: the `#[suite]` cases plus parametric ones.
pub fn namespace() -> Namespace {
    let mut namespace = checks::namespace();
    namespace.parametric(checks::positive, [1, 2, 3]);
    namespace.parametric(checks::commutes, [(1, 2), (3, 4)]);
    namespace
}
