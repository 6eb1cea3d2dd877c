//! Property tests for exclusion matching.

use std::path::PathBuf;

use proptest::prelude::*;

use dcr::domain::value_objects::{ExclusionSet, DEFAULT_EXCLUSIONS};

fn segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[a-z0-9_-]{1,10}").unwrap()
}

fn relative_path() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(segment(), 1..=4)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: anything inside `node_modules` or `.git` is excluded, at any depth.
    #[test]
    fn property_default_directories_exclude_descendants(
        prefix in proptest::collection::vec(segment(), 0..=3),
        suffix in relative_path(),
        dir in prop::sample::select(vec!["node_modules", ".git"]),
    ) {
        let set = ExclusionSet::defaults();
        let mut path = PathBuf::new();
        for p in &prefix {
            path.push(p);
        }
        path.push(dir);
        for s in &suffix {
            path.push(s);
        }
        prop_assert!(set.is_excluded(&path, false), "{} not excluded", path.display());
    }

    /// PROPERTY: extra patterns only ever add exclusions.
    #[test]
    fn property_extra_patterns_never_reinclude(
        path in relative_path(),
        extra in proptest::collection::vec("[a-z*]{1,6}", 0..=4),
    ) {
        let defaults = ExclusionSet::defaults();
        let extended = ExclusionSet::with_patterns(&extra).unwrap();
        let path: PathBuf = path.iter().collect();

        if defaults.is_excluded(&path, false) {
            prop_assert!(extended.is_excluded(&path, false));
        }
        prop_assert_eq!(
            extended.patterns().len(),
            DEFAULT_EXCLUSIONS.len() + extra.len()
        );
    }

    /// PROPERTY: negated patterns are always rejected.
    #[test]
    fn property_negation_is_rejected(pattern in "[a-z_./*]{1,12}") {
        let negated = format!("!{}", pattern);
        prop_assert!(ExclusionSet::with_patterns([negated]).is_err());
    }

    /// PROPERTY: building from arbitrary pattern text never panics.
    #[test]
    fn property_with_patterns_never_panics(patterns in proptest::collection::vec(".{0,32}", 0..=6)) {
        let _ = ExclusionSet::with_patterns(&patterns);
    }
}
