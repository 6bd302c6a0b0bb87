//! Test-case naming rules.
//!
//! Parametric generation names every synthesized case through these helpers, so the names stay
//! deterministic and always carry the discovery prefix.

use std::any::type_name;
use std::fmt::Debug;

use crate::conventions::TEST_PREFIX;

/// Build the name of one synthesized parametric case.
///
/// ## Parameters
/// - `template`: name of the template function.
/// - `value`: the argument value (scalar or tuple) bound into the case.
///
/// ## Returns
/// - (`String`): `TEST_PREFIX + template + format!("{value:?}")`.
///
/// ## Notes
/// - The `Debug` rendering keeps names distinct for values that differ (`1` vs `"1"`), which a
///   `Display` rendering would not.
///
/// ## Examples
/// ```rust
/// use minitest_core::parametric_case_name;
///
/// assert_eq!(parametric_case_name("positive", &3), "test_positive3");
/// assert_eq!(parametric_case_name("commutes", &(1, 2)), "test_commutes(1, 2)");
/// ```
pub fn parametric_case_name(template: &str, value: &dyn Debug) -> String {
    format!("{TEST_PREFIX}{template}{value:?}")
}

/// Derive a template name from the template's type.
///
/// For a function item or method this is the function's own name: the last path segment of
/// [`type_name`] outside any angle brackets, with generic arguments removed. This covers
/// qualified paths such as `<Shape as Named>::label`. Closures yield `{{closure}}`, so callers
/// naming a closure template should pass an explicit name instead.
pub fn template_name<F: ?Sized>() -> &'static str {
    let full = type_name::<F>();
    let mut depth = 0usize;
    let mut start = 0;
    let mut previous = None;
    for (index, ch) in full.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ':' if depth == 0 && previous == Some(':') => start = index + 1,
            _ => {}
        }
        previous = Some(ch);
    }
    let last = &full[start..];
    last.split('<').next().unwrap_or(last)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn check_positive(_x: i32) {}

    fn generic_template<T>(_x: T) {}

    struct Shape;

    trait Named {
        fn label(_x: i32);
    }

    impl Named for Shape {
        fn label(_x: i32) {}
    }

    impl Shape {
        fn area(_x: i32) {}
    }

    #[test]
    fn test_template_name_of_fn_item() {
        assert_eq!(template_name_of(check_positive), "check_positive");
    }

    #[test]
    fn test_template_name_strips_generics() {
        assert_eq!(template_name_of(generic_template::<String>), "generic_template");
    }

    #[test]
    fn test_template_name_of_trait_method() {
        assert_eq!(template_name_of(<Shape as Named>::label), "label");
    }

    #[test]
    fn test_template_name_of_inherent_method() {
        assert_eq!(template_name_of(Shape::area), "area");
    }

    #[test]
    fn test_parametric_names_distinguish_types() {
        assert_ne!(parametric_case_name("f", &1), parametric_case_name("f", &"1"));
        assert_eq!(parametric_case_name("f", &"1"), "test_f\"1\"");
    }

    fn template_name_of<F>(_f: F) -> &'static str {
        template_name::<F>()
    }

    proptest! {
        #[test]
        fn case_names_are_discoverable(template in "[a-z_]{1,12}", value in any::<i64>()) {
            let name = parametric_case_name(&template, &value);
            prop_assert!(name.starts_with(TEST_PREFIX));
            let expected = format!("test_{template}{value}");
            prop_assert_eq!(name, expected);
        }

        #[test]
        fn distinct_values_get_distinct_names(a in any::<u16>(), b in any::<u16>()) {
            prop_assume!(a != b);
            prop_assert_ne!(parametric_case_name("t", &a), parametric_case_name("t", &b));
        }
    }
}
