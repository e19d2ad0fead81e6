//! Property-based tests for pattern matching and path containment.

#![allow(clippy::expect_used)]

use proptest::prelude::*;
use restorable_core::DestDir;
use restorable_core::Pattern;
use restorable_core::SafePath;
use tempfile::TempDir;

fn create_test_dest() -> (TempDir, DestDir) {
    let temp = TempDir::new().expect("failed to create temp dir");
    let dest = DestDir::new(temp.path()).expect("failed to create dest");
    (temp, dest)
}

proptest! {
    /// A pattern without wildcards matches exactly itself.
    #[test]
    fn prop_literal_pattern_matches_only_itself(
        name in "[a-zA-Z0-9 ._+()\\[\\]{}^$|-]{1,30}",
        other in "[a-zA-Z0-9._-]{1,30}",
    ) {
        let pattern = Pattern::new(&name).expect("literal pattern compiles");
        prop_assert!(pattern.matches(&name));
        prop_assert_eq!(pattern.matches(&other), other == name);
    }

    /// `*` followed by a suffix matches any name ending in it, at any depth.
    #[test]
    fn prop_star_suffix(
        dirs in prop::collection::vec("[a-z]{1,8}", 0..4),
        stem in "[a-z]{0,8}",
    ) {
        let pattern = Pattern::new("*.jar").expect("pattern compiles");
        let mut name = dirs.join("/");
        if !name.is_empty() {
            name.push('/');
        }
        name.push_str(&stem);

        let jar = format!("{name}.jar");
        prop_assert!(pattern.matches(&jar));
        let backup = format!("{jar}.bak");
        prop_assert!(!pattern.matches(&backup));
    }

    /// `?` consumes exactly one character.
    #[test]
    fn prop_question_mark_is_one_char(stem in "[a-z]{0,6}", extra in "[a-z]{2,4}") {
        let pattern = Pattern::new(&format!("{stem}?")).expect("pattern compiles");
        let one = format!("{stem}x");
        let more = format!("{stem}{extra}");
        prop_assert!(pattern.matches(&one));
        prop_assert!(!pattern.matches(&stem));
        prop_assert!(!pattern.matches(&more));
    }

    /// Names built from plain components always resolve inside the
    /// destination.
    #[test]
    fn prop_plain_names_stay_inside(
        components in prop::collection::vec("[a-zA-Z0-9_-]{1,20}", 1..6)
    ) {
        let (_temp, dest) = create_test_dest();
        let safe = SafePath::resolve(&components.join("/"), &dest).expect("plain name resolves");
        prop_assert!(safe.resolved().starts_with(dest.as_path()));
        prop_assert!(!safe.is_root());
    }

    /// Climbing out through `..` is always rejected, however it is spelled.
    #[test]
    fn prop_parent_escape_rejected(
        depth in 0usize..4,
        prefix in prop::collection::vec("[a-z]{1,8}", 0..4),
        suffix in "[a-z]{1,8}",
    ) {
        let (_temp, dest) = create_test_dest();
        let mut parts: Vec<String> = prefix.clone();
        for _ in 0..=prefix.len() + depth {
            parts.push("..".to_string());
        }
        parts.push(suffix);

        let result = SafePath::resolve(&parts.join("/"), &dest);
        prop_assert!(result.is_err());
        prop_assert!(result.expect_err("rejected").is_security_violation());
    }

    /// Climbing back down without leaving the destination is accepted.
    #[test]
    fn prop_balanced_parent_accepted(
        dirs in prop::collection::vec("[a-z]{1,8}", 1..4),
        file in "[a-z]{1,8}",
    ) {
        let (_temp, dest) = create_test_dest();
        let mut parts = dirs.clone();
        parts.extend(std::iter::repeat_n("..".to_string(), dirs.len()));
        parts.push(file.clone());

        let safe = SafePath::resolve(&parts.join("/"), &dest).expect("balanced path resolves");
        prop_assert_eq!(safe.as_path(), std::path::Path::new(&file));
    }
}
