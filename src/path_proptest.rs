//! Property-based tests for path and URL joining.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{clean_path, ensure_git_suffix, join_clean, url_join};
    use proptest::prelude::*;

    // ============================================================================
    // clean_path property tests
    // ============================================================================

    proptest! {
        /// Property: cleaning is idempotent
        #[test]
        fn clean_path_is_idempotent(input in "[a-z./]{0,24}") {
            let once = clean_path(&input);
            prop_assert_eq!(clean_path(&once), once.clone());
        }

        /// Property: cleaned paths never contain empty or `.` segments
        #[test]
        fn clean_path_has_no_empty_or_dot_segments(input in "[a-z./]{1,24}") {
            let cleaned = clean_path(&input);
            prop_assert!(!cleaned.contains("//"), "{:?} -> {:?}", input, cleaned);
            if cleaned != "." && cleaned != "/" {
                prop_assert!(!cleaned.ends_with('/'), "{:?} -> {:?}", input, cleaned);
                let body = cleaned.trim_start_matches('/');
                prop_assert!(body.split('/').all(|s| s != "."), "{:?} -> {:?}", input, cleaned);
            }
        }

        /// Property: rooted paths stay rooted and never climb above the root
        #[test]
        fn clean_path_keeps_root(input in "/[a-z./]{0,24}") {
            let cleaned = clean_path(&input);
            prop_assert!(cleaned.starts_with('/'));
            let first = cleaned.trim_start_matches('/').split('/').next();
            prop_assert_ne!(first, Some(".."));
        }
    }

    // ============================================================================
    // join property tests
    // ============================================================================

    proptest! {
        /// Property: joining plain segments is plain concatenation with a separator
        #[test]
        fn join_clean_of_simple_segments(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
            prop_assert_eq!(join_clean(&a, &b), format!("{}/{}", a, b));
        }

        /// Property: URL joins keep scheme and host and extend the path
        #[test]
        fn url_join_keeps_scheme_and_host(
            host in "[a-z]{1,10}",
            base in "[a-z]{1,8}",
            component in "[a-z]{1,8}(/[a-z]{1,8}){0,2}",
        ) {
            let joined = url_join(&format!("https://{}.example/{}", host, base), &component).unwrap();
            prop_assert_eq!(joined, format!("https://{}.example/{}/{}", host, base, component));
        }

        /// Property: joining is deterministic
        #[test]
        fn url_join_is_deterministic(base in "[a-z:/.]{0,16}", component in "[a-z/]{0,8}") {
            let first = url_join(&base, &component).ok();
            let second = url_join(&base, &component).ok();
            prop_assert_eq!(first, second);
        }
    }

    // ============================================================================
    // ensure_git_suffix property tests
    // ============================================================================

    proptest! {
        /// Property: the suffix is applied exactly once
        #[test]
        fn ensure_git_suffix_is_idempotent(path in "[a-z]{1,8}(/[a-z]{1,8}){0,3}") {
            for fetch in [format!("https://host/{}", path), format!("/srv/{}", path)] {
                let once = ensure_git_suffix(&fetch);
                prop_assert!(once.ends_with(".git"));
                prop_assert_eq!(ensure_git_suffix(&once), once.clone());
            }
        }
    }
}
