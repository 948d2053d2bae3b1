//! Location resolution for import hrefs.
//!
//! Paths are resolved lexically: `.` and `..` segments are collapsed without
//! touching the filesystem, so two hrefs naming the same file through
//! different relative routes produce the same key in the import map.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Resolve `href` against the directory containing `base`.
pub fn resolve(base: &Path, href: &str) -> PathBuf {
    let dir = base.parent().unwrap_or(base);
    normalize(&dir.join(href))
}

/// Make `entry` absolute against the current directory and normalize it.
pub fn absolutize(entry: &Path) -> io::Result<PathBuf> {
    if entry.is_absolute() {
        Ok(normalize(entry))
    } else {
        Ok(normalize(&std::env::current_dir()?.join(entry)))
    }
}

/// Collapse `.` and `..` segments and repeated separators.
///
/// `..` never climbs above the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(prefix) => normalized.push(prefix.as_os_str()),
            Component::RootDir => normalized.push(Component::RootDir.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(segment) => normalized.push(segment),
        }
    }

    if normalized.as_os_str().is_empty() {
        normalized.push(".");
    }
    normalized
}

/// Whether `href` names a local (filesystem-relative) resource.
///
/// Absolute URIs (`scheme://...`, scheme matched case-insensitively) and
/// protocol-relative references (`//...`) are remote. An empty href is not
/// local either, so an import link with `href=""` is reported but never
/// followed.
pub fn is_local(href: &str) -> bool {
    if href.is_empty() || href.starts_with("//") {
        return false;
    }

    let scheme_len = href.bytes().take_while(u8::is_ascii_alphabetic).count();
    !(scheme_len > 0 && href[scheme_len..].starts_with("://"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_sibling() {
        let resolved = resolve(Path::new("/site/imports/a.html"), "b.html");
        assert_eq!(resolved, PathBuf::from("/site/imports/b.html"));
    }

    #[test]
    fn test_resolve_collapses_dot_segments() {
        let resolved = resolve(Path::new("/site/imports/a.html"), "./../shared/./c.html");
        assert_eq!(resolved, PathBuf::from("/site/shared/c.html"));
    }

    #[test]
    fn test_resolve_absolute_href_replaces_base() {
        let resolved = resolve(Path::new("/site/imports/a.html"), "/lib/x.html");
        assert_eq!(resolved, PathBuf::from("/lib/x.html"));
    }

    #[test]
    fn test_resolve_parent_stops_at_root() {
        let resolved = resolve(Path::new("/a.html"), "../../b.html");
        assert_eq!(resolved, PathBuf::from("/b.html"));
    }

    #[test]
    fn test_resolve_empty_href_is_directory() {
        let resolved = resolve(Path::new("/site/a.html"), "");
        assert_eq!(resolved, PathBuf::from("/site"));
    }

    #[test]
    fn test_normalize_relative_keeps_leading_parents() {
        assert_eq!(normalize(Path::new("../x/./y/..")), PathBuf::from("../x"));
        assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
    }

    #[test]
    fn test_absolutize_relative_entry() {
        let cwd = std::env::current_dir().unwrap();
        let entry = absolutize(Path::new("fixtures/../a.html")).unwrap();
        assert_eq!(entry, normalize(&cwd.join("a.html")));
        assert!(entry.is_absolute());
    }

    #[test]
    fn test_is_local_relative_paths() {
        assert!(is_local("b.html"));
        assert!(is_local("../b.html"));
        assert!(is_local("/abs/b.html"));
    }

    #[test]
    fn test_is_local_rejects_absolute_uris() {
        assert!(!is_local("http://example.com/x.html"));
        assert!(!is_local("HTTPS://example.com/x.html"));
        assert!(!is_local("ftp://example.com/x.html"));
    }

    #[test]
    fn test_is_local_rejects_protocol_relative() {
        assert!(!is_local("//cdn.example.com/x.html"));
    }

    #[test]
    fn test_is_local_empty_href() {
        assert!(!is_local(""));
    }

    #[test]
    fn test_is_local_scheme_must_be_letters() {
        // Only `[a-z]+://` is treated as a scheme.
        assert!(is_local("h2o://x.html"));
        assert!(is_local("://x.html"));
        assert!(is_local("mailto:someone@example.com"));
    }
}
