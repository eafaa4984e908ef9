// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::command::DockerRun;
use crate::errors::{LaunchError, Result};
use log::debug;
use std::fmt;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of a finished runtime command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Exit code; `-1` when the process was killed by a signal.
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Container state as reported by `docker inspect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerStatus {
    Created,
    Running,
    Restarting,
    Paused,
    Exited,
    Dead,
    Other(String),
}

impl ContainerStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "created" => ContainerStatus::Created,
            "running" => ContainerStatus::Running,
            "restarting" => ContainerStatus::Restarting,
            "paused" => ContainerStatus::Paused,
            "exited" => ContainerStatus::Exited,
            "dead" => ContainerStatus::Dead,
            other => ContainerStatus::Other(other.to_string()),
        }
    }

    /// The container stopped and will not come back on its own.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ContainerStatus::Exited | ContainerStatus::Dead)
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerStatus::Created => write!(f, "created"),
            ContainerStatus::Running => write!(f, "running"),
            ContainerStatus::Restarting => write!(f, "restarting"),
            ContainerStatus::Paused => write!(f, "paused"),
            ContainerStatus::Exited => write!(f, "exited"),
            ContainerStatus::Dead => write!(f, "dead"),
            ContainerStatus::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Port to the container runtime. The launcher only ever talks to the
/// runtime through this trait.
#[allow(async_fn_in_trait)]
pub trait ContainerRuntime {
    /// Execute the assembled `docker run` and wait for the CLI to return.
    async fn run(&self, cmd: &DockerRun) -> Result<RunOutput>;

    /// Current status of the named container, or `None` if it does not exist.
    async fn status(&self, name: &str) -> Result<Option<ContainerStatus>>;

    /// Force-remove the named container.
    async fn remove(&self, name: &str) -> Result<()>;
}

/// [`ContainerRuntime`] backed by the `docker` command-line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    bin: String,
}

impl DockerCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    async fn exec<I, S>(&self, program: &str, args: I) -> Result<RunOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| LaunchError::io(format!("failed to execute {program}"), e))?;

        Ok(RunOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

impl ContainerRuntime for DockerCli {
    async fn run(&self, cmd: &DockerRun) -> Result<RunOutput> {
        self.exec(&self.bin, cmd.args()).await
    }

    async fn status(&self, name: &str) -> Result<Option<ContainerStatus>> {
        let out = self
            .exec(
                &self.bin,
                ["inspect", "--type", "container", "--format", "{{.State.Status}}", name],
            )
            .await?;
        if !out.success() {
            debug!("[{name}] inspect returned {}: {}", out.exit_code, out.stderr.trim());
            return Ok(None);
        }
        Ok(Some(ContainerStatus::parse(&out.stdout)))
    }

    async fn remove(&self, name: &str) -> Result<()> {
        let out = self.exec(&self.bin, ["rm", "-f", name]).await?;
        if !out.success() {
            return Err(LaunchError::RemoveFailed {
                name: name.to_string(),
                stderr: out.stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::config::{LaunchConfig, RawInputs};
    use crate::patterns::PatternFile;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    /// Write an executable shell script standing in for the docker client.
    fn fake_docker(dir: &Path, body: &str) -> String {
        let path = dir.join("docker");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(ContainerStatus::parse("running\n"), ContainerStatus::Running);
        assert_eq!(ContainerStatus::parse("exited"), ContainerStatus::Exited);
        assert!(ContainerStatus::parse("dead").is_terminal());
        assert!(!ContainerStatus::parse("restarting").is_terminal());
        assert_eq!(
            ContainerStatus::parse("removing"),
            ContainerStatus::Other("removing".into())
        );
    }

    #[tokio::test]
    async fn test_exec_captures_output() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_docker(dir.path(), "echo \"$@\"; echo oops >&2; exit 3");
        let cli = DockerCli::new(&bin);

        let out = cli.exec(&bin, ["a", "b"]).await.unwrap();
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stdout, "a b\n");
        assert_eq!(out.stderr, "oops\n");
        assert!(!out.success());
    }

    #[tokio::test]
    async fn test_exec_missing_binary() {
        let cli = DockerCli::new("/nonexistent/docker");
        assert!(matches!(
            cli.exec("/nonexistent/docker", ["ps"]).await,
            Err(LaunchError::Io { .. })
        ));
    }

    #[tokio::test]
    async fn test_status_running() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_docker(dir.path(), "echo running");
        let status = DockerCli::new(bin).status("roc").await.unwrap();
        assert_eq!(status, Some(ContainerStatus::Running));
    }

    #[tokio::test]
    async fn test_status_no_such_container() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_docker(dir.path(), "echo 'Error: No such object: roc' >&2; exit 1");
        let status = DockerCli::new(bin).status("roc").await.unwrap();
        assert_eq!(status, None);
    }

    #[tokio::test]
    async fn test_run_uses_runtime_binary() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_docker(dir.path(), "echo \"$@\"");
        let config = LaunchConfig::from_inputs(RawInputs {
            server_url: Some("https://roc.example.com".into()),
            api_key: Some("k".into()),
            patterns_yaml: Some("p: 1\n".into()),
            docker_bin: Some("/nonexistent/docker".into()),
            ..Default::default()
        })
        .unwrap();
        let patterns = PatternFile {
            host_path: dir.path().join("pattern.yaml"),
            container_path: "/tmp/roc-config/pattern.yaml".into(),
        };
        let cmd = DockerRun::build(&config, &[], &patterns);

        let out = DockerCli::new(bin).run(&cmd).await.unwrap();
        assert!(out.success());
        assert!(out.stdout.starts_with("run -d --name roc-action-container"));
    }

    #[tokio::test]
    async fn test_remove_failure() {
        let dir = tempfile::tempdir().unwrap();
        let bin = fake_docker(dir.path(), "echo 'permission denied' >&2; exit 1");
        match DockerCli::new(bin).remove("roc").await {
            Err(LaunchError::RemoveFailed { name, stderr }) => {
                assert_eq!(name, "roc");
                assert_eq!(stderr, "permission denied");
            }
            other => panic!("expected RemoveFailed, got {other:?}"),
        }
    }
}
