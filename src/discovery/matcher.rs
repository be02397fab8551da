use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::meta::{is_truthy, Meta};
use crate::discovery::walker;
use crate::error::RunError;

/// A directory whose descriptor matched a query, with its parsed descriptor.
#[derive(Debug, Clone)]
pub struct MetaMatch {
    pub directory: PathBuf,
    pub meta: Meta,
}

/// Walk every directory under `root` and collect those whose descriptor
/// matches `property` (dot-delimited for nested fields).
///
/// With no `value`, a directory matches when the resolved field is truthy.
/// With a `value`, it matches on strict equality, and the field must still
/// be truthy: searching for a literal `false` can never match. That quirk
/// is inherited behavior and deliberately preserved.
///
/// Results follow the walker's depth-first pre-order; callers needing
/// priority ordering sort afterward.
pub fn find_directories_matching(
    root: &Path,
    property: &str,
    value: Option<&Value>,
) -> Result<Vec<MetaMatch>, RunError> {
    let mut matches = Vec::new();
    for directory in walker::walk_all_subdirectories(root, &[]) {
        let meta = match Meta::load(&directory) {
            Ok(Some(meta)) => meta,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Skipping '{}': {}", directory.display(), e);
                continue;
            }
        };
        let resolved = match meta.lookup(property) {
            Some(v) => v,
            None => continue,
        };
        let selected = match value {
            None => is_truthy(resolved),
            Some(expected) => resolved == expected && is_truthy(resolved),
        };
        if selected {
            matches.push(MetaMatch { directory, meta });
        }
    }
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn seed(root: &Path, rel: &str, meta: &str) {
        let dir = root.join(rel);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("meta.json"), meta).unwrap();
    }

    #[test]
    fn matches_nested_property_by_value() {
        let tmp = tempdir().unwrap();
        seed(tmp.path(), "", r#"{"type": "project"}"#);
        seed(tmp.path(), "app1", r#"{"type": "cluster_app", "cluster": {"tls": true}}"#);
        seed(tmp.path(), "app2", r#"{"type": "cluster_app", "cluster": {"tls": false}}"#);

        let found =
            find_directories_matching(tmp.path(), "cluster.tls", Some(&json!(true))).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].directory, tmp.path().join("app1"));
        assert!(found[0].meta.cluster.as_ref().unwrap().tls);
    }

    #[test]
    fn descriptors_without_type_tag_still_match() {
        let tmp = tempdir().unwrap();
        seed(tmp.path(), "app1", r#"{"cluster": {"tls": true}}"#);
        seed(tmp.path(), "app2", r#"{"cluster": {"tls": false}}"#);

        let found =
            find_directories_matching(tmp.path(), "cluster.tls", Some(&json!(true))).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].directory, tmp.path().join("app1"));
        assert_eq!(found[0].meta.kind, None);
    }

    #[test]
    fn missing_intermediate_segment_excludes_without_error() {
        let tmp = tempdir().unwrap();
        seed(tmp.path(), "a", r#"{"type": "app"}"#);
        seed(tmp.path(), "b", r#"{"type": "app", "cluster": {}}"#);

        let found =
            find_directories_matching(tmp.path(), "cluster.tls", Some(&json!(true))).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn presence_query_selects_truthy_fields_only() {
        let tmp = tempdir().unwrap();
        seed(tmp.path(), "x", r#"{"type": "component", "terraform": {"path": "infra"}}"#);
        seed(tmp.path(), "y", r#"{"type": "app"}"#);
        seed(tmp.path(), "z", r#"{"type": "component", "terraform": false}"#);

        let found = find_directories_matching(tmp.path(), "terraform", None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].directory, tmp.path().join("x"));
    }

    #[test]
    fn explicit_false_value_never_matches() {
        // Inherited quirk: falsy values are excluded even when requested.
        let tmp = tempdir().unwrap();
        seed(tmp.path(), "a", r#"{"type": "cluster_app", "cluster": {"tls": false}}"#);
        let found =
            find_directories_matching(tmp.path(), "cluster.tls", Some(&json!(false))).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn directories_without_descriptor_are_skipped_silently() {
        let tmp = tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("bare/deeper")).unwrap();
        seed(tmp.path(), "bare/deeper/app", r#"{"type": "app", "docker": {"image": "x"}}"#);

        let found = find_directories_matching(tmp.path(), "docker.image", None).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].directory, tmp.path().join("bare/deeper/app"));
    }
}
