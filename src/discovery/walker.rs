use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories never worth descending into: dependency caches,
/// version-control metadata, build output, generated migrations.
pub const DENYLIST: &[&str] = &["node_modules", ".git", ".terraform", "target", "migrations"];

fn is_ignored(name: &str, ignore: &[&str]) -> bool {
    DENYLIST.contains(&name) || ignore.contains(&name)
}

/// Immediate child directory names of `dir`, denylist applied.
pub fn list_subdirectories(dir: &Path, ignore: &[&str]) -> Vec<String> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::debug!("Cannot read '{}': {}", dir.display(), e);
            return Vec::new();
        }
    };
    let mut names = Vec::new();
    for entry in entries.flatten() {
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if !is_dir {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !is_ignored(name, ignore) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    names
}

/// Every directory at every depth under `dir`, depth-first pre-order:
/// a parent always appears before its children. Symlinked directories
/// are not followed.
pub fn walk_all_subdirectories(dir: &Path, ignore: &[&str]) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            e.file_name()
                .to_str()
                .map(|name| !is_ignored(name, ignore))
                .unwrap_or(true)
        })
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_dir() => Some(e.into_path()),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("Skipping unreadable entry under '{}': {}", dir.display(), e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn mkdirs(root: &Path, paths: &[&str]) {
        for p in paths {
            std::fs::create_dir_all(root.join(p)).unwrap();
        }
    }

    #[test]
    fn denylisted_names_never_appear() {
        let tmp = tempdir().unwrap();
        mkdirs(
            tmp.path(),
            &["app", "node_modules/dep", ".git/objects", "migrations", "db/migrations"],
        );
        let names = list_subdirectories(tmp.path(), &[]);
        assert_eq!(names, vec!["app", "db"]);

        let all = walk_all_subdirectories(tmp.path(), &[]);
        assert!(all
            .iter()
            .all(|p| !p.to_string_lossy().contains("node_modules")
                && !p.to_string_lossy().contains(".git")
                && !p.ends_with("migrations")));
    }

    #[test]
    fn caller_ignore_list_is_honored() {
        let tmp = tempdir().unwrap();
        mkdirs(tmp.path(), &["app", "vendor"]);
        let names = list_subdirectories(tmp.path(), &["vendor"]);
        assert_eq!(names, vec!["app"]);
    }

    #[test]
    fn walk_returns_every_directory_exactly_once_parent_first() {
        let tmp = tempdir().unwrap();
        mkdirs(tmp.path(), &["a/b/c", "a/d", "e"]);
        let all = walk_all_subdirectories(tmp.path(), &[]);

        let expected: Vec<PathBuf> = ["a", "a/b", "a/b/c", "a/d", "e"]
            .iter()
            .map(|p| tmp.path().join(p))
            .collect();
        let mut sorted = all.clone();
        sorted.sort();
        let mut expected_sorted = expected.clone();
        expected_sorted.sort();
        assert_eq!(sorted, expected_sorted);

        // pre-order: no path before its own parent
        for path in &all {
            if let Some(parent) = path.parent() {
                if parent != tmp.path() {
                    let parent_pos = all.iter().position(|p| p == parent).unwrap();
                    let child_pos = all.iter().position(|p| p == path).unwrap();
                    assert!(parent_pos < child_pos);
                }
            }
        }
    }

    #[test]
    fn empty_tree_yields_empty_list() {
        let tmp = tempdir().unwrap();
        assert!(walk_all_subdirectories(tmp.path(), &[]).is_empty());
    }
}
