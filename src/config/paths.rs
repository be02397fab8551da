use std::path::{Path, PathBuf};

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("run")
}

pub fn global_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Strip a trailing `scripts` segment to find the real project root.
///
/// Commands are often launched from a `scripts/` subdirectory; the meta
/// descriptor lives one level up. Matches on substring containment, not
/// exact path segments, mirroring the original convention.
pub fn resolve_project_root(dir: &Path) -> PathBuf {
    let s = dir.to_string_lossy();
    if s.contains("scripts") {
        PathBuf::from(s.replacen("/scripts", "", 1))
    } else {
        dir.to_path_buf()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_scripts_segment() {
        assert_eq!(
            resolve_project_root(Path::new("/home/u/proj/scripts")),
            PathBuf::from("/home/u/proj")
        );
    }

    #[test]
    fn leaves_paths_without_scripts_unchanged() {
        assert_eq!(
            resolve_project_root(Path::new("/home/u/proj")),
            PathBuf::from("/home/u/proj")
        );
    }

    #[test]
    fn is_idempotent() {
        let once = resolve_project_root(Path::new("/home/u/proj/scripts"));
        let twice = resolve_project_root(&once);
        assert_eq!(once, twice);
    }
}
