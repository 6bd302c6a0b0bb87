//! Parametric test generation
//!
//! One template function plus a sequence of values becomes one named test case per value.
//! Cases are bound eagerly, at generation time, so a later discovery pass sees them like any
//! hand-written case.
//!
//! ## Argument spreading
//!
//! A template taking N arguments given N-tuples is called with each tuple spread positionally;
//! any other template receives the value as its single argument. The choice is made by the
//! compiler through the `Marker` parameter of [`Template`] ([`Scalar`] or [`Spread`]), so it never
//! needs to be spelled out at the call site.

use std::fmt::Debug;
use std::rc::Rc;

use minitest_core::{parametric_case_name, template_name};

use crate::namespace::{CaseResult, IntoCaseResult, Namespace};

/// Marker: the value is passed as the template's only argument.
pub struct Scalar;

/// Marker: a tuple value is spread across the template's arguments.
pub struct Spread;

/// A function that can be driven by parametric values of type `V`.
pub trait Template<Marker, V>: 'static {
    fn invoke(&self, value: V) -> CaseResult;
}

impl<F, V, R> Template<Scalar, V> for F
where
    F: Fn(V) -> R + 'static,
    R: IntoCaseResult,
{
    fn invoke(&self, value: V) -> CaseResult {
        self(value).into_case_result()
    }
}

macro_rules! impl_spread_template {
    ($($arg:ident),+) => {
        impl<F, R, $($arg),+> Template<Spread, ($($arg,)+)> for F
        where
            F: Fn($($arg),+) -> R + 'static,
            R: IntoCaseResult,
        {
            #[allow(non_snake_case)]
            fn invoke(&self, ($($arg,)+): ($($arg,)+)) -> CaseResult {
                self($($arg),+).into_case_result()
            }
        }
    };
}

impl_spread_template!(A);
impl_spread_template!(A, B);
impl_spread_template!(A, B, C);
impl_spread_template!(A, B, C, D);
impl_spread_template!(A, B, C, D, E);
impl_spread_template!(A, B, C, D, E, G);

/// Bind one test case per value, naming each after the template function.
///
/// The template name is the function's own name (see [`template_name`]); closures should go
/// through [`parametric_named`]. Returns the synthesized names in value order.
///
/// ## Examples
/// ```rust
/// use minitest::{CaseResult, Namespace, check, discover, parametric};
///
/// fn positive(x: i32) -> CaseResult {
///     check!(x > 0);
///     Ok(())
/// }
///
/// fn commutes(x: i32, y: i32) -> CaseResult {
///     check!(x + y == y + x);
///     Ok(())
/// }
///
/// let mut ns = Namespace::new("params");
/// parametric(&mut ns, positive, [1, 2, 3]);
/// parametric(&mut ns, commutes, [(1, 2), (3, 4)]);
/// assert_eq!(
///     discover(&ns),
///     ["test_positive1", "test_positive2", "test_positive3", "test_commutes(1, 2)", "test_commutes(3, 4)"]
/// );
/// ```
pub fn parametric<M, V, F, I>(namespace: &mut Namespace, template: F, values: I) -> Vec<String>
where
    F: Template<M, V>,
    V: Debug + Clone + 'static,
    I: IntoIterator<Item = V>,
{
    parametric_named(namespace, template_name::<F>(), template, values)
}

/// Bind one test case per value under an explicit template name.
///
/// Each case is named `test_ + name + format!("{value:?}")`. A name that is already bound is
/// replaced (see [`Namespace::bind`]).
#[tracing::instrument(skip_all, fields(namespace = namespace.name(), template = name))]
pub fn parametric_named<M, V, F, I>(namespace: &mut Namespace, name: &str, template: F, values: I) -> Vec<String>
where
    F: Template<M, V>,
    V: Debug + Clone + 'static,
    I: IntoIterator<Item = V>,
{
    let template = Rc::new(template);
    values
        .into_iter()
        .map(|value| {
            let case_name = parametric_case_name(name, &value);
            let template = Rc::clone(&template);
            tracing::debug!(case = %case_name, "binding parametric case");
            namespace.bind_boxed(case_name.clone(), Box::new(move || template.invoke(value.clone())));
            case_name
        })
        .collect()
}

impl Namespace {
    /// Method form of [`parametric`].
    pub fn parametric<M, V, F, I>(&mut self, template: F, values: I) -> Vec<String>
    where
        F: Template<M, V>,
        V: Debug + Clone + 'static,
        I: IntoIterator<Item = V>,
    {
        parametric(self, template, values)
    }

    /// Method form of [`parametric_named`].
    pub fn parametric_named<M, V, F, I>(&mut self, name: &str, template: F, values: I) -> Vec<String>
    where
        F: Template<M, V>,
        V: Debug + Clone + 'static,
        I: IntoIterator<Item = V>,
    {
        parametric_named(self, name, template, values)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{TestFailure, check, discover};

    fn positive(x: i32) -> CaseResult {
        check!(x > 0);
        Ok(())
    }

    fn commutes(x: i32, y: i32) -> CaseResult {
        check!(x + y == y + x);
        Ok(())
    }

    fn takes_pair(pair: (i32, i32)) -> CaseResult {
        check!(pair.0 < pair.1);
        Ok(())
    }

    fn three(a: u8, b: u8, c: u8) {
        let _ = (a, b, c);
    }

    #[test]
    fn test_scalar_values_bind_named_cases() {
        let mut ns = Namespace::new("scalar");
        let names = parametric(&mut ns, positive, [1, 2, 3]);
        assert_eq!(names, ["test_positive1", "test_positive2", "test_positive3"]);
        for name in &names {
            assert!(ns.get(name).unwrap()().is_ok());
        }
    }

    #[test]
    fn test_tuple_values_are_spread() {
        let mut ns = Namespace::new("spread");
        let names = ns.parametric(commutes, [(1, 2), (3, 4)]);
        assert_eq!(names, ["test_commutes(1, 2)", "test_commutes(3, 4)"]);
        assert!(names.iter().all(|n| ns.get(n).unwrap()().is_ok()));
    }

    #[test]
    fn test_tuple_template_receives_whole_tuple() {
        let mut ns = Namespace::new("whole");
        ns.parametric(takes_pair, [(1, 2), (5, 4)]);
        assert!(ns.get("test_takes_pair(1, 2)").unwrap()().is_ok());
        let err = ns.get("test_takes_pair(5, 4)").unwrap()().unwrap_err();
        assert!(err.downcast_ref::<TestFailure>().is_some());
    }

    #[test]
    fn test_three_way_spread_and_unit_return() {
        let mut ns = Namespace::new("three");
        ns.parametric(three, [(1u8, 2u8, 3u8)]);
        assert!(ns.get("test_three(1, 2, 3)").unwrap()().is_ok());
    }

    #[test]
    fn test_named_closure_template() {
        let mut ns = Namespace::new("closure");
        let limit = 10;
        ns.parametric_named("below_limit", move |x: i32| assert_below(x, limit), [3, 12]);
        assert_eq!(discover(&ns), ["test_below_limit3", "test_below_limit12"]);
        assert!(ns.get("test_below_limit3").unwrap()().is_ok());
        assert!(ns.get("test_below_limit12").unwrap()().is_err());
    }

    #[test]
    fn test_synthesized_cases_are_rerunnable() {
        let mut ns = Namespace::new("rerun");
        ns.parametric_named("owned", |s: String| crate::assert_true(!s.is_empty()), [String::from("a")]);
        let case = ns.get("test_owned\"a\"").unwrap();
        assert!(case().is_ok());
        assert!(case().is_ok());
    }

    #[test]
    fn test_colliding_values_overwrite() {
        let mut ns = Namespace::new("collide");
        let names = ns.parametric(positive, [1, 1]);
        assert_eq!(names.len(), 2);
        assert_eq!(ns.len(), 1);
    }

    fn assert_below(x: i32, limit: i32) -> CaseResult {
        check!(x < limit);
        Ok(())
    }
}
