//! CLI module for the minitest runner
//!
//! The `minitest` binary runs the bundled self-check suite ([`crate::selfcheck`]) and reports
//! pytest-style on stderr.
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! [`execute`] returns `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::process;

use clap::Parser;

use crate::config::RunConfig;
use crate::errors::RunError;
use crate::executor::TestExecutor;
use crate::reporter::ConsoleReporter;
use crate::selfcheck;
use crate::version::MINITEST_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<RunError> for CliError {
    fn from(err: RunError) -> Self {
        match err {
            // The reporter has already listed every failure.
            RunError::Failures(_) => CliError::failure(""),
            other => CliError::failure(format!("{:?}", miette::Report::new(other))),
        }
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Convention-based test runner
#[derive(Parser, Debug)]
#[command(name = "minitest")]
#[command(version = MINITEST_VERSION)]
#[command(about = "Run the bundled minitest self-check suite", long_about = None)]
pub struct Cli {
    /// Stop at the first failing test
    #[arg(long = "failfast")]
    pub fail_fast: bool,

    /// One line per test instead of one character
    #[arg(short, long)]
    pub verbose: bool,

    /// Only run tests whose name contains this keyword
    #[arg(short = 'k', value_name = "FILTER")]
    pub filter: Option<String>,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    pub fn run_config(&self) -> RunConfig {
        RunConfig::new()
            .with_fail_fast(self.fail_fast)
            .with_filter(self.filter.clone())
            .with_verbose(self.verbose)
            .with_color(!self.no_color)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called.
pub fn run() {
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(exit_code) => {
            if exit_code != ExitCode::SUCCESS {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Run the self-check suite with the options in `cli`.
pub fn execute(cli: &Cli) -> CliResult<ExitCode> {
    let config = cli.run_config();
    let mut reporter = ConsoleReporter::from_config(&config);
    let executor = TestExecutor::new(config);
    executor.run(&selfcheck::namespace(), &mut reporter)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::try_parse_from(["minitest"]).unwrap();
        assert_eq!(cli.run_config(), RunConfig::default());
    }

    #[test]
    fn test_cli_parse_all_flags() {
        let cli = Cli::try_parse_from(["minitest", "--failfast", "-v", "-k", "equal", "--no-color"]).unwrap();
        let config = cli.run_config();
        assert!(config.fail_fast);
        assert!(config.verbose);
        assert!(!config.color);
        assert_eq!(config.filter.as_deref(), Some("equal"));
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["minitest", "--fail-fast"]).is_err());
    }

    #[test]
    fn test_aggregate_failure_has_empty_cli_message() {
        let mut ns = crate::Namespace::new("cli");
        ns.bind("test_b", || crate::assert_equal(2, 3));
        let err = TestExecutor::default()
            .with_override(false)
            .run(&ns, &mut ConsoleReporter::with_writer(Vec::new(), false))
            .unwrap_err();
        let cli_err = CliError::from(err);
        assert!(cli_err.message.is_empty());
        assert_eq!(cli_err.exit_code, ExitCode::FAILURE);
    }

    #[test]
    fn test_unexpected_error_renders_diagnostic() {
        let mut ns = crate::Namespace::new("cli");
        ns.bind("test_io", || -> std::io::Result<()> { Err(std::io::Error::other("disk")) });
        let err = TestExecutor::default()
            .with_override(false)
            .run(&ns, &mut ConsoleReporter::with_writer(Vec::new(), false))
            .unwrap_err();
        let cli_err = CliError::from(err);
        assert!(cli_err.message.contains("test_io"));
        assert!(cli_err.message.contains("disk"));
    }
}
