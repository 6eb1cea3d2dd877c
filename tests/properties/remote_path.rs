//! Property tests for remote path quoting and joining.

use proptest::prelude::*;

use dcr::domain::value_objects::remote_path::{expand_home, join, shell_quote};

/// Undo `shell_quote` the way a POSIX shell would for one word.
fn shell_unquote(word: &str) -> Option<String> {
    let mut out = String::new();
    let mut rest = word;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("\\'") {
            out.push('\'');
            rest = after;
            continue;
        }
        let body = rest.strip_prefix('\'')?;
        let end = body.find('\'')?;
        out.push_str(&body[..end]);
        rest = &body[end + 1..];
    }
    Some(out)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a quoted path reads back as the original string.
    #[test]
    fn property_shell_quote_round_trips(s in "[^\u{0}]{0,64}") {
        prop_assert_eq!(shell_unquote(&shell_quote(&s)), Some(s));
    }

    /// PROPERTY: join never produces a doubled separator at the seam.
    #[test]
    fn property_join_single_separator(
        dir in "/[a-z]{1,8}(/[a-z]{1,8}){0,3}/{0,2}",
        name in "/{0,2}[a-z.]{1,12}",
    ) {
        let joined = join(&dir, &name);
        prop_assert!(!joined.contains("//"), "{}", joined);
        prop_assert!(joined.starts_with(dir.trim_end_matches('/')));
    }

    /// PROPERTY: paths without a leading `~` are never rewritten.
    #[test]
    fn property_expand_home_ignores_non_tilde(path in "[a-z/._-]{0,40}") {
        prop_assert_eq!(expand_home(&path, "/home/deploy"), path);
    }
}
