//! Runner version information.
//!
//! The value is taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time; the CLI's
//! `--version` and the run banner both read it from here.

/// The minitest version string (for example, `0.1.0`).
pub const MINITEST_VERSION: &str = env!("CARGO_PKG_VERSION");
