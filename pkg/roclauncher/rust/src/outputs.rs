// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::errors::{LaunchError, Result};
use log::info;
use std::io::Write;
use std::path::PathBuf;

pub const OUTPUT_ENV: &str = "GITHUB_OUTPUT";
pub const CONTAINER_NAME_OUTPUT: &str = "container_name";
pub const CONTAINER_ID_OUTPUT: &str = "container-id";

const MULTILINE_DELIMITER: &str = "ROC_LAUNCHER_EOF";

/// Destination for the step's named outputs.
pub trait OutputSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Appends `name=value` records to the runner's output file, or only logs
/// them when no output file is configured.
#[derive(Debug, Clone, Default)]
pub struct StepOutputs {
    file: Option<PathBuf>,
}

impl StepOutputs {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    pub fn from_env() -> Self {
        Self::new(
            std::env::var_os(OUTPUT_ENV)
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        )
    }
}

impl OutputSink for StepOutputs {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        info!("output {name}={value}");
        let Some(ref path) = self.file else {
            return Ok(());
        };

        let record = if value.contains('\n') {
            format!("{name}<<{MULTILINE_DELIMITER}\n{value}\n{MULTILINE_DELIMITER}\n")
        } else {
            format!("{name}={value}\n")
        };

        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut f| f.write_all(record.as_bytes()))
            .map_err(|e| LaunchError::io(format!("writing output to {}", path.display()), e))
    }
}

/// Escape a message for a workflow command (`::error::...`).
fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Workflow command that fails the step with `message` in the job summary.
pub fn error_annotation(message: &str) -> String {
    format!("::error::{}", escape_data(message))
}

/// Workflow command that hides `secret` from every later log line.
pub fn add_mask(secret: &str) -> String {
    format!("::add-mask::{}", escape_data(secret))
}
