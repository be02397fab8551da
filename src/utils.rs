use std::path::Path;

use crate::discovery::SecretEnv;
use crate::error::RunError;

/// Generate a short opaque identifier for descriptors and state prefixes.
pub fn short_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// Last path component, used as a fallback name for unnamed units.
pub fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string()
}

/// Serialize an environment back to dotenv format.
pub fn write_env_file(path: &Path, env: &SecretEnv) -> Result<(), RunError> {
    let mut content = String::new();
    for (key, value) in env {
        if value.chars().any(|c| c.is_whitespace() || c == '#') {
            content.push_str(&format!("{}=\"{}\"\n", key, value));
        } else {
            content.push_str(&format!("{}={}\n", key, value));
        }
    }
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_ids_are_short_and_unique() {
        let a = short_id();
        let b = short_id();
        assert_eq!(a.len(), 12);
        assert_ne!(a, b);
    }

    #[test]
    fn env_file_round_trips_through_dotenv() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(".env.local");
        let mut env = SecretEnv::new();
        env.insert("PLAIN".into(), "value".into());
        env.insert("SPACED".into(), "two words".into());
        write_env_file(&path, &env).unwrap();

        let read: SecretEnv = dotenvy::from_path_iter(&path)
            .unwrap()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(read, env);
    }
}
