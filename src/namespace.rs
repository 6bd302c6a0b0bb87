//! The namespace under test: an ordered registry of named callables.

use std::fmt;

use indexmap::IndexMap;

/// What a test body returns.
///
/// `Err` holding a [`TestFailure`](crate::TestFailure) is an expected failure; any other error is
/// unexpected and aborts the run.
pub type CaseResult = anyhow::Result<()>;

/// A bound zero-argument callable.
pub type TestFn = Box<dyn Fn() -> CaseResult>;

/// Conversion from a function's return value into a [`CaseResult`].
///
/// Lets plain `fn()` helpers and `Result`-returning test bodies share one namespace.
pub trait IntoCaseResult {
    fn into_case_result(self) -> CaseResult;
}

impl IntoCaseResult for () {
    fn into_case_result(self) -> CaseResult {
        Ok(())
    }
}

impl<T, E> IntoCaseResult for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn into_case_result(self) -> CaseResult {
        self.map(|_| ()).map_err(Into::into)
    }
}

/// A named mapping from binding name to callable, in insertion order.
///
/// The caller owns the namespace. Discovery only reads it; binding (directly, through
/// `#[suite]`, or through parametric generation) writes to it. Rebinding an existing name
/// replaces the callable in place and keeps its original position.
pub struct Namespace {
    name: String,
    bindings: IndexMap<String, TestFn>,
}

impl Namespace {
    /// Create an empty namespace. `name` identifies it in diagnostics.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bindings: IndexMap::new(),
        }
    }

    /// Name used in diagnostics (for `#[suite]` modules, the module path).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bind `f` under `name`, returning the callable it replaced, if any.
    ///
    /// A replaced binding is not an error but is logged at `warn`, since it usually means two
    /// parametric values rendered to the same name.
    pub fn bind<F, R>(&mut self, name: impl Into<String>, f: F) -> Option<TestFn>
    where
        F: Fn() -> R + 'static,
        R: IntoCaseResult,
    {
        self.bind_boxed(name.into(), Box::new(move || f().into_case_result()))
    }

    pub(crate) fn bind_boxed(&mut self, name: String, f: TestFn) -> Option<TestFn> {
        if self.bindings.contains_key(&name) {
            tracing::warn!(namespace = %self.name, binding = %name, "binding overwrote an existing entry");
        }
        self.bindings.insert(name, f)
    }

    /// Look up a binding by name.
    pub fn get(&self, name: &str) -> Option<&TestFn> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// All bound names, in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl fmt::Debug for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Namespace")
            .field("name", &self.name)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::TestFailure;

    fn test_ok() {}

    fn test_failing() -> Result<(), TestFailure> {
        Err(TestFailure::new("nope"))
    }

    #[test]
    fn test_bind_preserves_insertion_order() {
        let mut ns = Namespace::new("order");
        ns.bind("test_z", test_ok);
        ns.bind("helper", test_ok);
        ns.bind("test_a", test_ok);
        assert_eq!(ns.names().collect::<Vec<_>>(), ["test_z", "helper", "test_a"]);
    }

    #[test]
    fn test_rebind_replaces_in_place() {
        let mut ns = Namespace::new("rebind");
        assert!(ns.bind("test_a", test_ok).is_none());
        ns.bind("test_b", test_ok);
        assert!(ns.bind("test_a", test_failing).is_some());

        assert_eq!(ns.len(), 2);
        assert_eq!(ns.names().collect::<Vec<_>>(), ["test_a", "test_b"]);
        let replaced = ns.get("test_a").unwrap();
        assert!(replaced().is_err());
    }

    #[test]
    fn test_return_values_convert() {
        let mut ns = Namespace::new("convert");
        ns.bind("unit", || ());
        ns.bind("ok_value", || Ok::<_, TestFailure>(7));
        ns.bind("io_error", || -> std::io::Result<()> {
            Err(std::io::Error::other("disk"))
        });

        assert!(ns.get("unit").unwrap()().is_ok());
        assert!(ns.get("ok_value").unwrap()().is_ok());
        let err = ns.get("io_error").unwrap()().unwrap_err();
        assert!(err.downcast_ref::<std::io::Error>().is_some());
    }
}
