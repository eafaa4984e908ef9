// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const CONTAINER_ID: &str = "4f1c2d3e5a6b";

/// How the mock `docker` answers `docker run`.
pub enum RunBehavior {
    Succeed,
    Fail { code: i32, stderr: &'static str },
}

/// A scratch workspace with a mock `docker` executable. The mock appends every
/// invocation to `calls.log`, stores the argv of `docker run` one argument per
/// line in `run-args`, and reports the container as running once started.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new(run: RunBehavior) -> Self {
        Self::build(run, false)
    }

    /// Same as [`Sandbox::new`], but a container with the requested name
    /// already exists before the launcher runs.
    pub fn with_existing_container(run: RunBehavior) -> Self {
        Self::build(run, true)
    }

    fn build(run: RunBehavior, existing: bool) -> Self {
        let dir = TempDir::new().unwrap();
        let state = dir.path().join("state");
        fs::create_dir_all(&state).unwrap();
        fs::create_dir_all(dir.path().join("workspace")).unwrap();
        if existing {
            fs::write(state.join("started"), "").unwrap();
        }

        let run_body = match run {
            RunBehavior::Succeed => format!(
                "touch \"{state}/started\"\n    echo {CONTAINER_ID}\n    exit 0",
                state = state.display()
            ),
            RunBehavior::Fail { code, stderr } => {
                format!("echo \"{stderr}\" >&2\n    exit {code}")
            }
        };

        let script = format!(
            r#"#!/bin/sh
printf '%s\n' "$*" >> "{state}/calls.log"
case "$1" in
  inspect)
    if [ -f "{state}/started" ]; then
      echo running
      exit 0
    fi
    echo "Error: No such container" >&2
    exit 1
    ;;
  rm)
    rm -f "{state}/started"
    exit 0
    ;;
  run)
    printf '%s\n' "$@" > "{state}/run-args"
    {run_body}
    ;;
esac
exit 2
"#,
            state = state.display()
        );

        let bin = dir.path().join("docker");
        fs::write(&bin, script).unwrap();
        fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();

        Self { dir }
    }

    pub fn workspace(&self) -> PathBuf {
        self.dir.path().join("workspace")
    }

    pub fn docker_bin(&self) -> PathBuf {
        self.dir.path().join("docker")
    }

    pub fn output_file(&self) -> PathBuf {
        self.dir.path().join("github-output")
    }

    /// Directory with no SSL libraries in it, so the probe result does not
    /// depend on the host.
    pub fn empty_lib_dir(&self) -> PathBuf {
        self.dir.path().join("state")
    }

    /// Every mock invocation, one line each.
    pub fn calls(&self) -> Vec<String> {
        read_lines(&self.dir.path().join("state/calls.log"))
    }

    /// The argv of the last `docker run`, without the program name.
    pub fn run_args(&self) -> Vec<String> {
        read_lines(&self.dir.path().join("state/run-args"))
    }

    pub fn outputs(&self) -> String {
        fs::read_to_string(self.output_file()).unwrap_or_default()
    }

    /// A launcher command with a clean environment pointed at this sandbox.
    pub fn launcher(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_roc-launcher"));
        cmd.env_clear()
            .env("PATH", "/usr/bin:/bin")
            .env("GITHUB_WORKSPACE", self.workspace())
            .env("GITHUB_OUTPUT", self.output_file())
            .env("INPUT_DOCKER_BIN", self.docker_bin())
            .env("INPUT_SSL_LIB_PATH", self.empty_lib_dir())
            .env("INPUT_READINESS_TIMEOUT", "2");
        cmd
    }
}

fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn run(cmd: &mut Command) -> Output {
    let output = cmd.output().expect("failed to execute roc-launcher");
    eprintln!("[stdout] {}", String::from_utf8_lossy(&output.stdout));
    eprintln!("[stderr] {}", String::from_utf8_lossy(&output.stderr));
    output
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// stdout and stderr together; where log lines land depends on the logger setup.
pub fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}
