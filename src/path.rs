//! Path and URL joining utilities for manifest resolution
//!
//! Fetch URLs and checkout paths are both built by joining a base with a
//! relative component. When the base is an absolute URL the join only touches
//! the URL path, keeping scheme, host, port, query and fragment. Anything else
//! is treated as a slash-separated filesystem path.

use crate::error::{Error, Result};
use url::Url;

/// Lexically clean a slash-separated path.
///
/// Repeated separators collapse, `.` segments are removed, `..` consumes the
/// preceding segment and trailing separators are dropped. A rooted path never
/// climbs above `/`. An empty input stays empty, any other input that cleans
/// away entirely becomes `.`.
pub fn clean_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let rooted = path.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." => {
                    segments.pop();
                }
                _ if rooted => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join two path fragments and clean the result. Empty fragments are ignored.
pub fn join_clean(base: &str, component: &str) -> String {
    match (base.is_empty(), component.is_empty()) {
        (true, true) => String::new(),
        (true, false) => clean_path(component),
        (false, true) => clean_path(base),
        (false, false) => clean_path(&format!("{}/{}", base, component)),
    }
}

/// Join `component` onto `base`, which may be a URL or a filesystem path.
///
/// Bases without a `//` authority, such as the ssh alias `gitserver:projects`,
/// are joined as plain strings. An opaque base that carries a query or a
/// fragment (`mailto:dev@example.com?subject=x`) has nowhere to put a path
/// and is rejected.
///
/// ```
/// use pman::path::url_join;
///
/// assert_eq!(url_join("http://a/b", "c/d").unwrap(), "http://a/b/c/d");
/// assert_eq!(url_join("/a/b", "c").unwrap(), "/a/b/c");
/// assert_eq!(url_join("gitserver:projects", "core").unwrap(), "gitserver:projects/core");
/// ```
pub fn url_join(base: &str, component: &str) -> Result<String> {
    match Url::parse(base) {
        Ok(url) if url.cannot_be_a_base() => {
            if url.query().is_some() || url.fragment().is_some() {
                return Err(Error::InvalidJoinBase {
                    base: base.to_string(),
                    component: component.to_string(),
                });
            }
            Ok(join_clean(base, component))
        }
        Ok(mut url) => {
            let joined = join_clean(url.path(), component);
            url.set_path(&joined);
            Ok(url.to_string())
        }
        Err(_) => Ok(join_clean(base, component)),
    }
}

/// Make sure a fetch location ends in `.git`.
///
/// For URLs the suffix goes on the URL path, so query strings and fragments
/// stay where they are. Local paths and scp-style locations
/// (`git@host:org/repo`) get the suffix appended to the string.
pub fn ensure_git_suffix(fetch: &str) -> String {
    match Url::parse(fetch) {
        Ok(mut url) if !url.cannot_be_a_base() => {
            if !url.path().ends_with(".git") {
                let suffixed = format!("{}.git", url.path());
                url.set_path(&suffixed);
            }
            url.to_string()
        }
        _ if fetch.ends_with(".git") => fetch.to_string(),
        _ => format!("{}.git", fetch),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path("a//b/./c/"), "a/b/c");
        assert_eq!(clean_path("/a/b/../c"), "/a/c");
        assert_eq!(clean_path("/../a"), "/a");
        assert_eq!(clean_path("../a/.."), "..");
        assert_eq!(clean_path("a/.."), ".");
        assert_eq!(clean_path("/"), "/");
        assert_eq!(clean_path(""), "");
    }

    #[test]
    fn test_join_clean() {
        assert_eq!(join_clean("", ""), "");
        assert_eq!(join_clean("", "core"), "core");
        assert_eq!(join_clean("tools", ""), "tools");
        assert_eq!(join_clean("tools/", "/core/"), "tools/core");
        assert_eq!(join_clean("/", "core"), "/core");
    }

    #[test]
    fn test_url_join_url_base() {
        assert_eq!(url_join("http://a/b", "c/d").unwrap(), "http://a/b/c/d");
        assert_eq!(
            url_join("https://git.example.com/org/", "/libs//lib1/").unwrap(),
            "https://git.example.com/org/libs/lib1"
        );
        assert_eq!(url_join("http://host", "proj").unwrap(), "http://host/proj");
    }

    #[test]
    fn test_url_join_preserves_port_query_and_fragment() {
        assert_eq!(
            url_join("ssh://git@host:2222/org?x=1#frag", "proj").unwrap(),
            "ssh://git@host:2222/org/proj?x=1#frag"
        );
    }

    #[test]
    fn test_url_join_path_base() {
        assert_eq!(url_join("/a/b", "c").unwrap(), "/a/b/c");
        assert_eq!(url_join("~/src", "core").unwrap(), "~/src/core");
        assert_eq!(url_join("", "core").unwrap(), "core");
        assert_eq!(
            url_join("git@github.com:acme", "core").unwrap(),
            "git@github.com:acme/core"
        );
    }

    #[test]
    fn test_url_join_ssh_alias_base() {
        assert_eq!(
            url_join("gitserver:projects", "core").unwrap(),
            "gitserver:projects/core"
        );
        assert_eq!(
            url_join("gitserver:projects/", "libs//lib1").unwrap(),
            "gitserver:projects/libs/lib1"
        );
        assert_eq!(
            ensure_git_suffix("gitserver:projects/core"),
            "gitserver:projects/core.git"
        );
    }

    #[test]
    fn test_url_join_rejects_opaque_url_with_query() {
        let err = url_join("mailto:dev@example.com?subject=sync", "core").unwrap_err();
        assert!(matches!(err, Error::InvalidJoinBase { .. }));
        let err = url_join("data:text/plain#part", "core").unwrap_err();
        assert!(matches!(err, Error::InvalidJoinBase { .. }));
    }

    #[test]
    fn test_ensure_git_suffix() {
        assert_eq!(
            ensure_git_suffix("http://host/base/proj"),
            "http://host/base/proj.git"
        );
        assert_eq!(
            ensure_git_suffix("http://host/base/proj.git"),
            "http://host/base/proj.git"
        );
        assert_eq!(
            ensure_git_suffix("https://host/proj?token=abc"),
            "https://host/proj.git?token=abc"
        );
        assert_eq!(ensure_git_suffix("/srv/git/core"), "/srv/git/core.git");
        assert_eq!(
            ensure_git_suffix("git@github.com:acme/core"),
            "git@github.com:acme/core.git"
        );
    }
}
