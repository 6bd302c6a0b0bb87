//! Assertion helpers.
//!
//! Each helper returns `Result<_, TestFailure>` so test bodies propagate a failure with `?`.
//! The `check!` macro chooses between [`assert_equal`] and [`assert_true`] from the shape of its
//! argument; these functions are the plain entry points it expands to.

use std::any::{Any, type_name};
use std::fmt::{Debug, Display};

use minitest_core::TestFailure;

/// Assert that a value is exactly the boolean `true`.
///
/// Anything else fails, including `false`, `1` and `"true"`. The failure message embeds the
/// value's `Debug` rendering. A `&'static bool` is read through. A shorter-lived `&bool` does
/// not meet the `Any` bound; dereference it first (`assert_true(*flag)`, `check!(*flag)`).
///
/// ## Examples
/// ```rust
/// use minitest::assert_true;
///
/// assert!(assert_true(1 < 2).is_ok());
/// assert!(assert_true(1).is_err());
/// assert!(assert_true("true").is_err());
/// ```
pub fn assert_true<T: Any + Debug>(value: T) -> Result<(), TestFailure> {
    let value_any = &value as &dyn Any;
    let truth = value_any
        .downcast_ref::<bool>()
        .copied()
        .or_else(|| value_any.downcast_ref::<&'static bool>().map(|flag| **flag));
    match truth {
        Some(true) => Ok(()),
        _ => Err(TestFailure::new(format!("assertion failed: {value:?} is not true"))),
    }
}

/// Assert that two values compare equal.
///
/// The failure message is both operands, in order, joined with `!=`.
///
/// ## Examples
/// ```rust
/// use minitest::assert_equal;
///
/// assert!(assert_equal(2, 2).is_ok());
/// assert_eq!(assert_equal(2, 3).unwrap_err().message(), "2 != 3");
/// ```
pub fn assert_equal<L, R>(left: L, right: R) -> Result<(), TestFailure>
where
    L: PartialEq<R> + Debug,
    R: Debug,
{
    if left == right {
        Ok(())
    } else {
        Err(TestFailure::new(format!("{left:?} != {right:?}")))
    }
}

/// Assert that an evaluation fails with an error of type `E`.
///
/// `f` is run once. The assertion holds iff it returns `Err` and the underlying error is an `E`;
/// the matched error is handed back. Matching is by type only.
///
/// ## Errors
///
/// - `Ok(_)`: "expected error of type `E`, but no error was raised".
/// - `Err` of another type: "expected error of type `E`, got: ..." with the error's message.
///
/// ## Examples
/// ```rust
/// use std::num::ParseIntError;
/// use minitest::assert_raises;
///
/// assert!(assert_raises::<ParseIntError, _, _, _>(|| "x".parse::<i32>()).is_ok());
/// assert!(assert_raises::<ParseIntError, _, _, _>(|| "7".parse::<i32>()).is_err());
/// ```
pub fn assert_raises<E, T, X, F>(f: F) -> Result<E, TestFailure>
where
    E: Display + Debug + Send + Sync + 'static,
    X: Into<anyhow::Error>,
    F: FnOnce() -> Result<T, X>,
{
    let expected = type_name::<E>();
    match f() {
        Ok(_) => Err(TestFailure::new(format!(
            "expected error of type `{expected}`, but no error was raised"
        ))),
        Err(err) => {
            let err: anyhow::Error = err.into();
            err.downcast::<E>().map_err(|other| {
                TestFailure::new(format!("expected error of type `{expected}`, got: {other:#}"))
            })
        }
    }
}

/// Fail the current test case explicitly.
///
/// ## Examples
/// ```rust
/// use minitest::{CaseResult, fail};
///
/// fn test_unreachable_branch() -> CaseResult {
///     Err(fail("took the unreachable branch").into())
/// }
/// assert!(test_unreachable_branch().is_err());
/// ```
pub fn fail(message: impl Into<String>) -> TestFailure {
    TestFailure::new(message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::CaseResult;
    use std::num::ParseIntError;

    #[test]
    fn test_assert_true_only_accepts_true() {
        assert!(assert_true(true).is_ok());
        assert!(assert_true(false).is_err());
        assert!(assert_true(1).is_err());
        assert!(assert_true("true").is_err());
        assert!(assert_true(Some(true)).is_err());
    }

    #[test]
    fn test_assert_true_reads_through_static_bool_refs() {
        assert!(assert_true(&true).is_ok());
        assert!(assert_true(&false).is_err());
    }

    #[test]
    fn test_check_on_dereferenced_borrowed_bool() -> CaseResult {
        let flags = vec![true, false];
        let flag: &bool = &flags[0];
        crate::check!(*flag);
        assert!(assert_true(!*flag).is_err());
        Ok(())
    }

    #[test]
    fn test_assert_true_message_embeds_value() {
        let failure = assert_true(42u8).unwrap_err();
        assert!(failure.message().contains("42"), "{}", failure.message());
    }

    #[test]
    fn test_assert_equal_message_orders_operands() {
        let failure = assert_equal("left", "right").unwrap_err();
        assert_eq!(failure.message(), "\"left\" != \"right\"");
    }

    #[test]
    fn test_assert_equal_across_types() {
        let owned = String::from("abc");
        assert!(assert_equal(owned.as_str(), "abc").is_ok());
        assert!(assert_equal(owned, "abd").is_err());
    }

    #[test]
    fn test_assert_raises_matches_type() {
        let err = assert_raises::<ParseIntError, _, _, _>(|| "nope".parse::<u8>()).unwrap();
        assert!(err.to_string().contains("invalid digit"));
    }

    #[test]
    fn test_assert_raises_without_error() {
        let failure = assert_raises::<ParseIntError, _, _, _>(|| "12".parse::<u8>()).unwrap_err();
        assert!(failure.message().contains("no error was raised"));
        assert!(failure.message().contains("ParseIntError"));
    }

    #[test]
    fn test_assert_raises_wrong_type() {
        let failure =
            assert_raises::<ParseIntError, _, _, _>(|| -> Result<(), TestFailure> { Err(fail("other")) })
                .unwrap_err();
        assert!(failure.message().contains("got: other"), "{}", failure.message());
    }

    #[test]
    fn test_check_dispatches_equality() -> CaseResult {
        let failed = (|| -> CaseResult {
            crate::check!(1 + 1 == 3);
            Ok(())
        })()
        .unwrap_err();
        let failure = failed.downcast_ref::<TestFailure>().unwrap();
        assert_eq!(failure.message(), "2 != 3");
        Ok(())
    }

    #[test]
    fn test_check_dispatches_truth() {
        let failed = (|| -> CaseResult {
            crate::check!(3 < 2);
            Ok(())
        })()
        .unwrap_err();
        let failure = failed.downcast_ref::<TestFailure>().unwrap();
        assert_eq!(failure.message(), "assertion failed: false is not true");
    }

    #[test]
    fn test_check_raises_returns_error() -> CaseResult {
        let err = crate::check_raises!(ParseIntError, "z".parse::<i64>());
        crate::check!(err.to_string().contains("invalid digit"));
        Ok(())
    }
}
