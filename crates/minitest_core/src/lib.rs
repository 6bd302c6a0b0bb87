//! Provide the failure type and naming conventions shared by the minitest runner and its macros.
//!
//! This crate is intentionally small and dependency-light. It holds the pieces that both:
//! - the assertion helpers use to *produce* a failure, and
//! - the executor uses to *recognise* one and to name synthesized test cases.
//!
//! ## Notes
//!
//! - This is a "semantic core" crate: **no IO**, no global state, no logging.
//! - Current scope: [`TestFailure`], well-known identifiers ([`conventions`]) and parametric case naming
//!   ([`naming`]).

pub mod conventions;
pub mod failure;
pub mod naming;

pub use conventions::{FAIL_FAST_FLAG, TEST_PREFIX};
pub use failure::TestFailure;
pub use naming::{parametric_case_name, template_name};
