//! Test discovery
//!
//! Discovery turns a [`Namespace`] into the ordered list of names the executor should run.
//! It is a trait so a caller can swap in another selection rule (a different prefix, an
//! explicit allow-list) without touching the executor.

use std::borrow::Cow;

use minitest_core::TEST_PREFIX;

use crate::namespace::Namespace;

/// Select the test-case names of a namespace.
pub trait TestDiscovery {
    /// Names to run, in the namespace's enumeration order. Must not mutate the namespace.
    fn discover(&self, namespace: &Namespace) -> Vec<String>;
}

/// Prefix-based discovery (`test_` by default).
#[derive(Debug, Clone)]
pub struct PrefixDiscovery {
    prefix: Cow<'static, str>,
}

impl PrefixDiscovery {
    pub fn new(prefix: impl Into<Cow<'static, str>>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for PrefixDiscovery {
    fn default() -> Self {
        Self::new(TEST_PREFIX)
    }
}

impl TestDiscovery for PrefixDiscovery {
    fn discover(&self, namespace: &Namespace) -> Vec<String> {
        namespace
            .names()
            .filter(|name| name.starts_with(self.prefix.as_ref()))
            .map(str::to_string)
            .collect()
    }
}

/// Discover the `test_`-prefixed names of a namespace, in binding order.
///
/// A namespace without test cases yields an empty list, not an error.
pub fn discover(namespace: &Namespace) -> Vec<String> {
    PrefixDiscovery::default().discover(namespace)
}

/// Keep only names containing `keyword` (the `-k` filter).
pub(crate) fn filter_by_keyword(names: Vec<String>, keyword: Option<&str>) -> Vec<String> {
    match keyword {
        Some(keyword) => names.into_iter().filter(|name| name.contains(keyword)).collect(),
        None => names,
    }
}
