//! Test execution
//!
//! Runs every discovered case of a namespace in discovery order and classifies how each one ends:
//!
//! - `Ok(())`: passed.
//! - `Err` holding a [`TestFailure`]: failed; recorded and the run continues.
//! - any other `Err`, or a panic: unexpected; a notice is emitted and the run stops.
//!
//! With fail-fast on (requested, or forced by the process override), the first `Err` of any kind
//! ends the run and is handed back untouched inside [`RunError::FailFast`]. Panics are never
//! caught in that mode.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use indexmap::IndexMap;
use minitest_core::TestFailure;

use crate::config::{FailFastOverride, ProcessArgs, RunConfig};
use crate::discovery::{PrefixDiscovery, TestDiscovery, filter_by_keyword};
use crate::errors::RunError;
use crate::namespace::{CaseResult, Namespace};
use crate::reporter::{ConsoleReporter, RunSummary, TestReporter};

/// Where a single case is in its lifecycle.
///
/// `Pending -> Running -> {Passed | Failed | Errored}`; cases never attempted stay `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseState {
    Pending,
    Running,
    Passed,
    Failed,
    Errored,
}

/// Where a run is in its lifecycle.
///
/// `Idle -> Running -> {Completed | Aborted}`. A run is `Aborted` when an unexpected error or a
/// fail-fast stop ended it before every case was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Completed,
    Aborted,
}

/// How one attempted case ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseOutcome {
    Passed,
    Failed(TestFailure),
    /// Unexpected error or panic, rendered as text.
    Errored(String),
}

impl CaseOutcome {
    pub fn state(&self) -> CaseState {
        match self {
            CaseOutcome::Passed => CaseState::Passed,
            CaseOutcome::Failed(_) => CaseState::Failed,
            CaseOutcome::Errored(_) => CaseState::Errored,
        }
    }

    fn classify(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<TestFailure>() {
            Some(failure) => CaseOutcome::Failed(failure.clone()),
            None => CaseOutcome::Errored(format!("{error:#}")),
        }
    }
}

/// The record of one run over one namespace.
///
/// Holds no timings, so two runs over the same namespace compare equal.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    namespace: String,
    state: RunState,
    cases: IndexMap<String, CaseState>,
    failures: IndexMap<String, TestFailure>,
}

impl RunResult {
    fn new(namespace: &str, names: &[String]) -> Self {
        Self {
            namespace: namespace.to_string(),
            state: RunState::Idle,
            cases: names.iter().map(|name| (name.clone(), CaseState::Pending)).collect(),
            failures: IndexMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Number of cases selected for this run.
    pub fn discovered(&self) -> usize {
        self.cases.len()
    }

    /// Number of cases that were started.
    pub fn attempted(&self) -> usize {
        self.cases.values().filter(|state| **state != CaseState::Pending).count()
    }

    pub fn passed(&self) -> usize {
        self.count(CaseState::Passed)
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn errored(&self) -> usize {
        self.count(CaseState::Errored)
    }

    /// True when the run completed and nothing failed.
    pub fn is_success(&self) -> bool {
        self.state == RunState::Completed && self.failures.is_empty()
    }

    /// Selected case names with their final state, in execution order.
    pub fn cases(&self) -> impl Iterator<Item = (&str, CaseState)> {
        self.cases.iter().map(|(name, state)| (name.as_str(), *state))
    }

    pub fn case_state(&self, name: &str) -> Option<CaseState> {
        self.cases.get(name).copied()
    }

    /// Recorded failures, in the order they happened.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &TestFailure)> {
        self.failures.iter().map(|(name, failure)| (name.as_str(), failure))
    }

    pub fn failure(&self, name: &str) -> Option<&TestFailure> {
        self.failures.get(name)
    }

    /// One line per failure, used as the aggregate error message.
    pub(crate) fn failure_report(&self) -> String {
        let mut report = format!(
            "{} of {} test(s) failed in `{}`",
            self.failed(),
            self.attempted(),
            self.namespace
        );
        for (name, failure) in &self.failures {
            report.push_str(&format!("\n  {name}: {}", failure.message()));
        }
        report
    }

    fn count(&self, wanted: CaseState) -> usize {
        self.cases.values().filter(|state| **state == wanted).count()
    }

    fn record(&mut self, name: &str, outcome: &CaseOutcome) {
        if let CaseOutcome::Failed(failure) = outcome {
            self.failures.insert(name.to_string(), failure.clone());
        }
        self.set_case(name, outcome.state());
    }

    fn set_case(&mut self, name: &str, state: CaseState) {
        if let Some(slot) = self.cases.get_mut(name) {
            *slot = state;
        }
    }
}

/// Runs the cases of a namespace.
///
/// Discovery strategy and the fail-fast override are pluggable so the executor can be driven
/// without touching real process arguments.
pub struct TestExecutor {
    config: RunConfig,
    discovery: Box<dyn TestDiscovery>,
    overrides: Box<dyn FailFastOverride>,
}

impl Default for TestExecutor {
    fn default() -> Self {
        Self::new(RunConfig::default())
    }
}

impl TestExecutor {
    /// Executor with prefix discovery and the process arguments as fail-fast override.
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            discovery: Box::new(PrefixDiscovery::default()),
            overrides: Box::new(ProcessArgs),
        }
    }

    pub fn with_discovery(mut self, discovery: impl TestDiscovery + 'static) -> Self {
        self.discovery = Box::new(discovery);
        self
    }

    pub fn with_override(mut self, overrides: impl FailFastOverride + 'static) -> Self {
        self.overrides = Box::new(overrides);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Names this executor would run, after discovery and the keyword filter.
    pub fn collect(&self, namespace: &Namespace) -> Vec<String> {
        filter_by_keyword(self.discovery.discover(namespace), self.config.filter.as_deref())
    }

    /// Run every collected case of `namespace`.
    ///
    /// ## Returns
    /// - `Ok(RunResult)`: every case passed.
    /// - `Err(RunError::Failures)`: the run completed with at least one test failure.
    /// - `Err(RunError::Unexpected)`: a case returned a non-failure error (or panicked, in which
    ///   case the panic is resumed instead of returned).
    /// - `Err(RunError::FailFast)`: fail-fast was on and a case returned an error.
    ///
    /// ## Notes
    /// - The fail-fast override is read once, here, at the start of the run.
    #[tracing::instrument(skip_all, fields(namespace = namespace.name()))]
    pub fn run(&self, namespace: &Namespace, reporter: &mut dyn TestReporter) -> Result<RunResult, RunError> {
        let fail_fast = self.config.effective_fail_fast(self.overrides.as_ref());
        let names = self.collect(namespace);
        let mut result = RunResult::new(namespace.name(), &names);
        tracing::debug!(count = names.len(), fail_fast, "collected test cases");
        reporter.on_collection_complete(namespace.name(), names.len());

        let started = Instant::now();
        result.state = RunState::Running;

        for name in &names {
            let Some(case) = namespace.get(name) else {
                continue;
            };
            result.set_case(name, CaseState::Running);
            reporter.on_test_start(name);
            let case_started = Instant::now();

            let returned = if fail_fast {
                case()
            } else {
                match call_guarded(case) {
                    Ok(returned) => returned,
                    Err(payload) => {
                        let message = panic_message(payload.as_ref());
                        let outcome = CaseOutcome::Errored(message.clone());
                        result.record(name, &outcome);
                        result.state = RunState::Aborted;
                        reporter.on_test_complete(name, &outcome, case_started.elapsed());
                        notice_unexpected(reporter, namespace.name(), name, &message);
                        reporter.on_run_complete(&RunSummary::new(&result, started.elapsed()));
                        panic::resume_unwind(payload);
                    }
                }
            };
            let duration = case_started.elapsed();

            let error = match returned {
                Ok(()) => {
                    result.record(name, &CaseOutcome::Passed);
                    reporter.on_test_complete(name, &CaseOutcome::Passed, duration);
                    continue;
                }
                Err(error) => error,
            };

            if fail_fast {
                let outcome = CaseOutcome::classify(&error);
                result.record(name, &outcome);
                result.state = RunState::Aborted;
                reporter.on_test_complete(name, &outcome, duration);
                reporter.on_run_complete(&RunSummary::new(&result, started.elapsed()));
                tracing::debug!(test = %name, "fail-fast: stopping at first error");
                return Err(RunError::FailFast {
                    test: name.clone(),
                    error,
                    result: Box::new(result),
                });
            }

            match error.downcast::<TestFailure>() {
                Ok(failure) => {
                    let outcome = CaseOutcome::Failed(failure);
                    result.record(name, &outcome);
                    reporter.on_test_complete(name, &outcome, duration);
                }
                Err(error) => {
                    let message = format!("{error:#}");
                    let outcome = CaseOutcome::Errored(message.clone());
                    result.record(name, &outcome);
                    result.state = RunState::Aborted;
                    reporter.on_test_complete(name, &outcome, duration);
                    notice_unexpected(reporter, namespace.name(), name, &message);
                    reporter.on_run_complete(&RunSummary::new(&result, started.elapsed()));
                    return Err(RunError::Unexpected {
                        test: name.clone(),
                        error,
                        result: Box::new(result),
                    });
                }
            }
        }

        result.state = RunState::Completed;
        tracing::debug!(passed = result.passed(), failed = result.failed(), "run completed");
        reporter.on_run_complete(&RunSummary::new(&result, started.elapsed()));

        if result.failures.is_empty() {
            Ok(result)
        } else {
            Err(RunError::Failures(Box::new(result)))
        }
    }
}

/// Run every `test_` case in `namespace`, reporting to stderr.
///
/// `fail_fast` is combined with the `--failfast` process argument; either one turns it on.
pub fn run_tests(namespace: &Namespace, fail_fast: bool) -> Result<RunResult, RunError> {
    let executor = TestExecutor::new(RunConfig::new().with_fail_fast(fail_fast));
    let mut reporter = ConsoleReporter::new(false);
    executor.run(namespace, &mut reporter)
}

fn call_guarded(case: &dyn Fn() -> CaseResult) -> Result<CaseResult, Box<dyn Any + Send>> {
    panic::catch_unwind(AssertUnwindSafe(case))
}

fn notice_unexpected(reporter: &mut dyn TestReporter, namespace: &str, name: &str, message: &str) {
    tracing::error!(test = %name, namespace = %namespace, error = %message, "unexpected error in test case");
    reporter.on_unexpected_error(name, namespace, message);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked with a non-string payload".to_string()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::check;

    fn executor() -> TestExecutor {
        TestExecutor::new(RunConfig::new().with_color(false)).with_override(false)
    }

    #[derive(Default)]
    struct Events(Vec<String>);

    impl TestReporter for Events {
        fn on_test_complete(&mut self, name: &str, outcome: &CaseOutcome, _duration: Duration) {
            self.0.push(format!("{name}:{:?}", outcome.state()));
        }

        fn on_run_complete(&mut self, summary: &RunSummary<'_>) {
            self.0.push(format!("done:{:?}", summary.result.state()));
        }
    }

    fn passing() -> CaseResult {
        check!(1 + 1 == 2);
        Ok(())
    }

    fn failing() -> CaseResult {
        check!(2 == 3);
        Ok(())
    }

    #[test]
    fn test_failures_are_collected_in_order() {
        let mut ns = Namespace::new("collect");
        ns.bind("test_a", passing);
        ns.bind("test_b", failing);
        ns.bind("test_c", failing);

        let mut events = Events::default();
        let err = executor().run(&ns, &mut events).unwrap_err();
        let result = match err {
            RunError::Failures(result) => result,
            other => panic!("expected aggregate failure, got {other:?}"),
        };
        assert_eq!(result.attempted(), 3);
        assert_eq!(result.failures().map(|(n, _)| n).collect::<Vec<_>>(), ["test_b", "test_c"]);
        assert_eq!(result.failure("test_b").unwrap().message(), "2 != 3");
        assert_eq!(
            events.0,
            ["test_a:Passed", "test_b:Failed", "test_c:Failed", "done:Completed"]
        );
    }

    #[test]
    fn test_empty_namespace_succeeds() {
        let ns = Namespace::new("empty");
        let result = executor().run(&ns, &mut Events::default()).unwrap();
        assert!(result.is_success());
        assert_eq!(result.discovered(), 0);
    }

    #[test]
    fn test_filter_narrows_collection() {
        let mut ns = Namespace::new("filter");
        ns.bind("test_add", passing);
        ns.bind("test_sub", failing);
        let executor = TestExecutor::new(RunConfig::new().with_filter(Some("add".into()))).with_override(false);
        assert_eq!(executor.collect(&ns), ["test_add"]);
        assert!(executor.run(&ns, &mut Events::default()).is_ok());
    }

    #[test]
    fn test_panic_message_rendering() {
        assert_eq!(panic_message(&"boom"), "panicked: boom");
        assert_eq!(panic_message(&String::from("bang")), "panicked: bang");
        assert_eq!(panic_message(&7u8), "panicked with a non-string payload");
    }
}
