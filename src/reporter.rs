//! Run reporting
//!
//! The executor talks to a [`TestReporter`] and never prints on its own, so output formats
//! other than the console one can be plugged in by implementing the trait.

use std::io::{self, Write};
use std::time::Duration;

use crate::config::RunConfig;
use crate::executor::{CaseOutcome, RunResult, RunState};

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RED_BOLD: &str = "\x1b[1;31m";
const RESET: &str = "\x1b[0m";

/// Receives run events from the executor.
pub trait TestReporter {
    /// Called once, after discovery and filtering.
    fn on_collection_complete(&mut self, _namespace: &str, _test_count: usize) {}

    /// Called before a case is invoked.
    fn on_test_start(&mut self, _name: &str) {}

    /// Called after a case returns.
    fn on_test_complete(&mut self, name: &str, outcome: &CaseOutcome, duration: Duration);

    /// Called when a case ends with an unexpected error, before the run stops.
    fn on_unexpected_error(&mut self, _name: &str, _namespace: &str, _message: &str) {}

    /// Called when the run ends, whether it completed or was aborted.
    fn on_run_complete(&mut self, summary: &RunSummary<'_>);
}

/// Snapshot handed to [`TestReporter::on_run_complete`].
pub struct RunSummary<'a> {
    pub result: &'a RunResult,
    pub duration: Duration,
}

impl<'a> RunSummary<'a> {
    pub fn new(result: &'a RunResult, duration: Duration) -> Self {
        Self { result, duration }
    }
}

/// Console reporter (pytest-style): one character per case, or one line per case when verbose.
pub struct ConsoleReporter<W: Write = io::Stderr> {
    out: W,
    verbose: bool,
    color: bool,
    timing: bool,
    line_open: bool,
}

impl ConsoleReporter<io::Stderr> {
    pub fn new(verbose: bool) -> Self {
        Self::with_writer(io::stderr(), verbose)
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.verbose).with_color(config.color)
    }
}

impl Default for ConsoleReporter<io::Stderr> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<W: Write> ConsoleReporter<W> {
    /// Report into any writer; colour and timings are on by default.
    pub fn with_writer(out: W, verbose: bool) -> Self {
        Self {
            out,
            verbose,
            color: true,
            timing: true,
            line_open: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Show durations. Off gives byte-stable output.
    pub fn with_timing(mut self, timing: bool) -> Self {
        self.timing = timing;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.color {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn close_line(&mut self) {
        if self.line_open {
            let _ = writeln!(self.out);
            self.line_open = false;
        }
    }

    fn elapsed(&self, duration: Duration) -> String {
        if self.timing {
            format!(" in {:.2}s", duration.as_secs_f64())
        } else {
            String::new()
        }
    }
}

impl<W: Write> TestReporter for ConsoleReporter<W> {
    fn on_collection_complete(&mut self, namespace: &str, test_count: usize) {
        if self.verbose {
            let _ = writeln!(self.out, "collected {test_count} test(s) from {namespace}");
        }
    }

    fn on_test_start(&mut self, name: &str) {
        if self.verbose {
            let _ = write!(self.out, "{name} ... ");
        }
    }

    fn on_test_complete(&mut self, _name: &str, outcome: &CaseOutcome, duration: Duration) {
        let (code, long, short) = match outcome {
            CaseOutcome::Passed => (GREEN, "PASSED", "."),
            CaseOutcome::Failed(_) => (RED, "FAILED", "F"),
            CaseOutcome::Errored(_) => (YELLOW, "ERROR", "E"),
        };

        if self.verbose {
            let status = self.paint(code, long);
            if self.timing {
                let _ = writeln!(self.out, "{status} ({}ms)", duration.as_millis());
            } else {
                let _ = writeln!(self.out, "{status}");
            }
        } else {
            let status = self.paint(code, short);
            let _ = write!(self.out, "{status}");
            self.line_open = true;
        }
        let _ = self.out.flush();
    }

    fn on_unexpected_error(&mut self, name: &str, namespace: &str, message: &str) {
        self.close_line();
        let notice = self.paint(
            YELLOW,
            &format!("unexpected error in test `{name}` of namespace `{namespace}`: {message}"),
        );
        let _ = writeln!(self.out, "{notice}");
    }

    fn on_run_complete(&mut self, summary: &RunSummary<'_>) {
        self.close_line();
        let result = summary.result;
        let elapsed = self.elapsed(summary.duration);

        if result.state() == RunState::Aborted {
            let line = format!(
                "run aborted after {} of {} test(s) in {}{elapsed}",
                result.attempted(),
                result.discovered(),
                result.namespace()
            );
            let line = self.paint(RED_BOLD, &line);
            let _ = writeln!(self.out, "{line}");
        } else if result.failed() == 0 {
            let line = format!("{} test functions run successfully{elapsed}", result.passed());
            let line = self.paint(GREEN, &line);
            let _ = writeln!(self.out, "{line}");
        } else {
            let heading = self.paint(RED_BOLD, "FAILURES");
            let _ = writeln!(self.out);
            let _ = writeln!(self.out, "{heading}");
            for (name, failure) in result.failures() {
                let header = self.paint(BOLD, &format!("___________ {name} ___________"));
                let _ = writeln!(self.out, "{header}");
                let _ = writeln!(self.out, "    {}", failure.message());
            }
            let line = self.paint(
                RED_BOLD,
                &format!("{} passed, {} failed{elapsed}", result.passed(), result.failed()),
            );
            let _ = writeln!(self.out);
            let _ = writeln!(self.out, "{line}");
        }
        let _ = self.out.flush();
    }
}
