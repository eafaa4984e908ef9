// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("pattern file not found or empty: {}", path.display())]
    MissingPatternFile { path: PathBuf },

    #[error("docker run failed with exit code {exit_code}{}", format_stderr(stderr))]
    LaunchFailure { exit_code: i32, stderr: String },

    #[error("a container named '{name}' already exists (set replace-existing to remove it)")]
    ContainerExists { name: String },

    #[error("failed to remove existing container '{name}'{}", format_stderr(stderr))]
    RemoveFailed { name: String, stderr: String },

    #[error("container '{name}' is not ready: {reason}")]
    NotReady { name: String, reason: String },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl LaunchError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        LaunchError::Io {
            context: context.into(),
            source,
        }
    }
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

pub type Result<T> = std::result::Result<T, LaunchError>;
