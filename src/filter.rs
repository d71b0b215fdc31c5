//! Selecting named test routines from the command line.
//!
//! With no arguments every routine runs. Otherwise a routine runs when its
//! name starts with one of the arguments, character for character.

/// Prefix filter over test routine names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestFilter {
    prefixes: Vec<String>,
}

impl TestFilter {
    pub fn new<I, T>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a filter from the process arguments, skipping the program name.
    pub fn from_args() -> Self {
        Self::new(std::env::args().skip(1))
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        self.is_empty() || self.prefixes.iter().any(|p| name.starts_with(p.as_str()))
    }
}

/// Runs `test` if the filter selects `name`. Returns whether it ran.
pub fn run_test<F: FnOnce()>(filter: &TestFilter, name: &str, test: F) -> bool {
    if !filter.matches(name) {
        tracing::trace!(name, "filtered out");
        return false;
    }
    tracing::debug!(name, "running test routine");
    test();
    true
}

/// `run_tests!(filter, tap; basic_ok, string_compare)` calls each
/// `fn(&mut Tap<_>)` whose name the filter selects.
#[macro_export]
macro_rules! run_tests {
    ($filter:expr, $tap:expr; $($test:ident),+ $(,)?) => {
        $(
            $crate::filter::run_test(&$filter, ::std::stringify!($test), || $test(&mut $tap));
        )+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_selects_everything() {
        let filter = TestFilter::default();
        assert!(filter.matches("anything"));
        assert!(filter.matches(""));
    }

    #[test]
    fn prefixes_match_from_the_start() {
        let filter = TestFilter::new(["cmp", "is_"]);
        assert!(filter.matches("cmp_ok"));
        assert!(filter.matches("cmp_mem"));
        assert!(filter.matches("is_null"));
        assert!(!filter.matches("fcmp_ok"));
        assert!(!filter.matches("is"));
    }

    #[test]
    fn matching_is_case_sensitive() {
        let filter = TestFilter::new(["Like"]);
        assert!(!filter.matches("like_basic"));
    }

    #[test]
    fn run_test_only_calls_selected_routines() {
        let filter = TestFilter::new(["a"]);
        let mut calls = Vec::new();
        assert!(run_test(&filter, "alpha", || calls.push("alpha")));
        assert!(!run_test(&filter, "beta", || calls.push("beta")));
        assert_eq!(calls, vec!["alpha"]);
    }
}
