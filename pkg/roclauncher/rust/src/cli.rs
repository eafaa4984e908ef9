// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::RawInputs;
use clap::Parser;
use std::path::PathBuf;

/// Command-line flags. Every launch input can also be given as a CI step
/// input (`INPUT_<NAME>`) or in the YAML file named by `--config-file`;
/// flags take precedence over both.
#[derive(Parser, Debug, Default)]
#[command(name = "roc-launcher")]
#[command(about = "Launch the ROC monitoring agent container for a CI job", long_about = None)]
#[command(version)]
pub struct Cli {
    /// YAML file with launch inputs (kebab-case keys, e.g. `server-url`)
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    /// Workspace root; overrides GITHUB_WORKSPACE
    #[arg(long)]
    pub workspace: Option<PathBuf>,

    /// Prepare the directories and pattern file, print the docker command, and exit
    #[arg(long)]
    pub dry_run: bool,

    /// trace, debug, info, warn or error
    #[arg(long)]
    pub log_level: Option<String>,

    #[arg(long)]
    pub server_url: Option<String>,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub project_name: Option<String>,

    /// Inline pattern file content
    #[arg(long)]
    pub patterns_yaml: Option<String>,

    /// Pattern file path, relative to the config directory
    #[arg(long)]
    pub patterns: Option<String>,

    #[arg(long)]
    pub config_dir: Option<String>,

    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long)]
    pub docker_image: Option<String>,

    /// Extra `docker run` arguments, whitespace separated
    #[arg(long, allow_hyphen_values = true)]
    pub args: Option<String>,

    #[arg(long)]
    pub ssl_lib_path: Option<String>,

    #[arg(long)]
    pub ssl_lib_version: Option<String>,

    #[arg(long)]
    pub libssl_host_path: Option<String>,

    #[arg(long)]
    pub libcrypto_host_path: Option<String>,

    #[arg(long)]
    pub container_name: Option<String>,

    #[arg(long)]
    pub require_project_name: bool,

    /// `poll` (default) or `delay`
    #[arg(long)]
    pub readiness: Option<String>,

    /// Seconds to wait for the container
    #[arg(long)]
    pub readiness_timeout: Option<u64>,

    /// Remove an existing container with the same name before launching
    #[arg(long)]
    pub replace_existing: bool,

    #[arg(long)]
    pub docker_bin: Option<String>,
}

impl Cli {
    /// The launch inputs given on the command line. Switches that were not
    /// passed stay unset so lower layers can still enable them.
    pub fn inputs(&self) -> RawInputs {
        RawInputs {
            server_url: self.server_url.clone(),
            api_key: self.api_key.clone(),
            project_name: self.project_name.clone(),
            patterns_yaml: self.patterns_yaml.clone(),
            patterns: self.patterns.clone(),
            config_dir: self.config_dir.clone(),
            output_dir: self.output_dir.clone(),
            docker_image: self.docker_image.clone(),
            args: self.args.clone(),
            ssl_lib_path: self.ssl_lib_path.clone(),
            ssl_lib_version: self.ssl_lib_version.clone(),
            libssl_host_path: self.libssl_host_path.clone(),
            libcrypto_host_path: self.libcrypto_host_path.clone(),
            container_name: self.container_name.clone(),
            require_project_name: self.require_project_name.then_some(true),
            readiness: self.readiness.clone(),
            readiness_timeout: self.readiness_timeout,
            replace_existing: self.replace_existing.then_some(true),
            docker_bin: self.docker_bin.clone(),
        }
    }

    /// Priority: --log-level > INPUT_LOG_LEVEL > RUNNER_DEBUG=1 (debug) > info
    pub fn log_level(&self) -> log::Level {
        if let Some(ref level) = self.log_level {
            return parse_log_level(level);
        }
        if let Some(level) = std::env::var("INPUT_LOG_LEVEL")
            .ok()
            .filter(|l| !l.trim().is_empty())
        {
            return parse_log_level(&level);
        }
        if std::env::var("RUNNER_DEBUG").is_ok_and(|v| v == "1") {
            return log::Level::Debug;
        }
        log::Level::Info
    }
}

fn parse_log_level(level: &str) -> log::Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "info" => log::Level::Info,
        "warn" | "warning" => log::Level::Warn,
        "error" | "critical" | "off" => log::Level::Error,
        _ => log::Level::Info,
    }
}
