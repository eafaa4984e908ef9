// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::LaunchConfig;
use crate::mounts::{CONTAINER_OUTPUT_DIR, MountSpec};
use crate::patterns::PatternFile;

const REDACTED: &str = "***";

/// A fully assembled `docker run` invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct DockerRun {
    /// Shown in logs and dry runs; [`crate::runtime::DockerCli`] runs its own binary.
    program: String,
    args: Vec<String>,
    /// Index into `args` of the API key value.
    secret_index: usize,
}

impl DockerRun {
    pub fn build(config: &LaunchConfig, mounts: &[MountSpec], patterns: &PatternFile) -> Self {
        let mut args: Vec<String> = vec![
            "run".into(),
            "-d".into(),
            "--name".into(),
            config.container_name.clone(),
            "--privileged".into(),
            "--pid=host".into(),
            "--network=host".into(),
        ];

        for mount in mounts {
            args.push("-v".into());
            args.push(mount.to_string());
        }

        args.extend(
            config
                .extra_args
                .iter()
                .filter(|a| !a.is_empty())
                .cloned(),
        );

        args.push(config.docker_image.clone());
        args.push("--server-url".into());
        args.push(config.server_url.clone());
        args.push("--api-key".into());
        let secret_index = args.len();
        args.push(config.api_key.expose().to_string());
        if let Some(ref project) = config.project_name {
            args.push("--project-name".into());
            args.push(project.clone());
        }
        args.push("--patterns".into());
        args.push(patterns.container_path.to_string_lossy().into_owned());
        args.push("--watch".into());
        args.push(CONTAINER_OUTPUT_DIR.into());

        Self {
            program: config.docker_bin.clone(),
            args,
            secret_index,
        }
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<&str> {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect()
    }

    /// Space-joined command line with the API key masked, for logging.
    pub fn redacted(&self) -> String {
        let mut line = self.program.clone();
        for (i, arg) in self.args.iter().enumerate() {
            line.push(' ');
            line.push_str(if i == self.secret_index { REDACTED } else { arg.as_str() });
        }
        line
    }
}

impl std::fmt::Debug for DockerRun {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("DockerRun").field(&self.redacted()).finish()
    }
}
