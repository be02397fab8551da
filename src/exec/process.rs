use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::RunError;

/// An external CLI invocation with an explicit working directory.
///
/// The working directory is always threaded through here as a parameter;
/// the process-global current directory is never changed.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    program: String,
    args: Vec<String>,
    dir: PathBuf,
    envs: BTreeMap<String, String>,
}

/// Outcome of a captured invocation, including the non-zero case, for
/// call sites that branch on known benign failures.
#[derive(Debug)]
pub struct CommandResult {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            dir: dir.into(),
            envs: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.insert(key.into(), value.into());
        self
    }

    pub fn envs(mut self, envs: &BTreeMap<String, String>) -> Self {
        self.envs
            .extend(envs.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).current_dir(&self.dir).envs(&self.envs);
        cmd
    }

    /// Run to completion, capturing output. Non-zero exit is an error
    /// carrying the program, directory and stderr.
    pub async fn capture(&self) -> Result<String, RunError> {
        let result = self.capture_result().await?;
        if !result.success {
            return Err(RunError::CommandFailed {
                program: self.program.clone(),
                dir: self.dir.clone(),
                stderr: result.stderr.trim().to_string(),
            });
        }
        Ok(result.stdout)
    }

    /// Run to completion, capturing output without treating non-zero exit
    /// as an error. Used where a failure signature is inspected.
    pub async fn capture_result(&self) -> Result<CommandResult, RunError> {
        tracing::debug!("{} {} (in {})", self.program, self.args.join(" "), self.dir.display());
        let output = self.command().output().await.map_err(|e| RunError::Spawn {
            program: self.program.clone(),
            source: e,
        })?;
        Ok(CommandResult {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Run with inherited stdio, for interactive or long-lived tools
    /// (terraform apply, hasura console, cloudflared).
    pub async fn streamed(&self) -> Result<(), RunError> {
        tracing::debug!("{} {} (in {})", self.program, self.args.join(" "), self.dir.display());
        let status = self
            .command()
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| RunError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;
        if !status.success() {
            return Err(RunError::CommandFailed {
                program: self.program.clone(),
                dir: self.dir.clone(),
                stderr: format!("exited with {}", status),
            });
        }
        Ok(())
    }

}

/// Benign "does not exist" signatures from kubectl delete and
/// docker manifest inspect.
pub fn is_not_found(stderr: &str) -> bool {
    let s = stderr.to_lowercase();
    s.contains("not found") || s.contains("no such manifest") || s.contains("notfound")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn capture_returns_stdout() {
        let out = CommandSpec::new("echo", std::env::temp_dir())
            .args(["hello", "world"])
            .capture()
            .await
            .unwrap();
        assert_eq!(out.trim(), "hello world");
    }

    #[tokio::test]
    async fn nonzero_exit_surfaces_as_command_failed() {
        let err = CommandSpec::new("false", std::env::temp_dir())
            .capture()
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::CommandFailed { .. }));
    }

    #[tokio::test]
    async fn capture_result_does_not_error_on_nonzero() {
        let result = CommandSpec::new("false", std::env::temp_dir())
            .capture_result()
            .await
            .unwrap();
        assert!(!result.success);
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let err = CommandSpec::new("definitely-not-a-real-binary", std::env::temp_dir())
            .capture()
            .await
            .unwrap_err();
        assert!(matches!(err, RunError::Spawn { .. }));
    }

    #[test]
    fn not_found_signatures() {
        assert!(is_not_found("Error from server (NotFound): secrets \"tls\" not found"));
        assert!(is_not_found("no such manifest: ghcr.io/x/y:latest"));
        assert!(!is_not_found("connection refused"));
    }
}
