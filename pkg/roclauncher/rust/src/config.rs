// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::errors::{LaunchError, Result};
use crate::libraries::SslLibraries;
use crate::readiness::Readiness;
use log::debug;
use serde::Deserialize;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_DOCKER_IMAGE: &str = "hanshal785/roc:v5";
pub const DEFAULT_CONTAINER_NAME: &str = "roc-action-container";
pub const DEFAULT_CONFIG_DIR: &str = "roc-config";
pub const DEFAULT_OUTPUT_DIR: &str = "roc-output";
pub const DEFAULT_DOCKER_BIN: &str = "docker";
pub const DEFAULT_READINESS_TIMEOUT_SECS: u64 = 20;

/// Prefix of the environment variables a CI runner uses to hand inputs to a step.
const INPUT_ENV_PREFIX: &str = "INPUT_";

/// Unvalidated inputs. Every layer (YAML file, CI environment, command line)
/// produces one of these; layers are merged with [`RawInputs::overlay`].
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawInputs {
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub project_name: Option<String>,
    pub patterns_yaml: Option<String>,
    pub patterns: Option<String>,
    pub config_dir: Option<String>,
    pub output_dir: Option<String>,
    pub docker_image: Option<String>,
    pub args: Option<String>,
    pub ssl_lib_path: Option<String>,
    pub ssl_lib_version: Option<String>,
    pub libssl_host_path: Option<String>,
    pub libcrypto_host_path: Option<String>,
    pub container_name: Option<String>,
    pub require_project_name: Option<bool>,
    pub readiness: Option<String>,
    pub readiness_timeout: Option<u64>,
    pub replace_existing: Option<bool>,
    pub docker_bin: Option<String>,
}

macro_rules! overlay_fields {
    ($low:ident, $high:ident, $($field:ident),+ $(,)?) => {
        RawInputs {
            $($field: $high.$field.or($low.$field),)+
        }
    };
}

impl RawInputs {
    /// Parse a YAML file of inputs (keys in kebab-case, e.g. `server-url`).
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LaunchError::io(format!("reading {}", path.display()), e))?;
        let inputs: RawInputs = serde_yaml::from_str(&contents).map_err(|e| {
            LaunchError::Configuration(format!("parsing {}: {e}", path.display()))
        })?;
        debug!("loaded inputs from {}", path.display());
        Ok(inputs.without_blanks())
    }

    /// Read CI step inputs through `lookup`, which maps an environment variable
    /// name to its value. Both `INPUT_SERVER_URL` and `INPUT_SERVER-URL` spellings
    /// are accepted. Blank values are treated as unset, since runners export every
    /// declared input even when the workflow leaves it empty.
    pub fn from_env_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Option<String> {
            let upper = name.to_ascii_uppercase();
            let underscored = format!("{INPUT_ENV_PREFIX}{}", upper.replace('-', "_"));
            lookup(&underscored)
                .or_else(|| lookup(&format!("{INPUT_ENV_PREFIX}{upper}")))
                .filter(|v| !v.trim().is_empty())
        };

        let inputs = RawInputs {
            server_url: get("server-url"),
            api_key: get("api-key"),
            project_name: get("project-name"),
            patterns_yaml: get("patterns-yaml"),
            patterns: get("patterns"),
            config_dir: get("config-dir"),
            output_dir: get("output-dir"),
            docker_image: get("docker-image"),
            args: get("args"),
            ssl_lib_path: get("ssl-lib-path"),
            ssl_lib_version: get("ssl-lib-version"),
            libssl_host_path: get("libssl-host-path"),
            libcrypto_host_path: get("libcrypto-host-path"),
            container_name: get("container-name"),
            require_project_name: get("require-project-name")
                .map(|v| parse_bool("require-project-name", &v))
                .transpose()?,
            readiness: get("readiness"),
            readiness_timeout: get("readiness-timeout")
                .map(|v| parse_secs("readiness-timeout", &v))
                .transpose()?,
            replace_existing: get("replace-existing")
                .map(|v| parse_bool("replace-existing", &v))
                .transpose()?,
            docker_bin: get("docker-bin"),
        };
        Ok(inputs)
    }

    /// Read CI step inputs from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_env_lookup(|name| std::env::var(name).ok())
    }

    /// Merge two layers; values set in `higher` win. `patterns-yaml` and
    /// `patterns` are a single choice: a layer that sets either one replaces
    /// both.
    pub fn overlay(mut self, higher: RawInputs) -> RawInputs {
        if higher.patterns_yaml.is_some() || higher.patterns.is_some() {
            self.patterns_yaml = None;
            self.patterns = None;
        }
        let low = self;
        overlay_fields!(
            low,
            higher,
            server_url,
            api_key,
            project_name,
            patterns_yaml,
            patterns,
            config_dir,
            output_dir,
            docker_image,
            args,
            ssl_lib_path,
            ssl_lib_version,
            libssl_host_path,
            libcrypto_host_path,
            container_name,
            require_project_name,
            readiness,
            readiness_timeout,
            replace_existing,
            docker_bin,
        )
    }

    fn without_blanks(self) -> Self {
        let blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        RawInputs {
            server_url: blank(self.server_url),
            api_key: blank(self.api_key),
            project_name: blank(self.project_name),
            patterns_yaml: blank(self.patterns_yaml),
            patterns: blank(self.patterns),
            config_dir: blank(self.config_dir),
            output_dir: blank(self.output_dir),
            docker_image: blank(self.docker_image),
            args: blank(self.args),
            ssl_lib_path: blank(self.ssl_lib_path),
            ssl_lib_version: blank(self.ssl_lib_version),
            libssl_host_path: blank(self.libssl_host_path),
            libcrypto_host_path: blank(self.libcrypto_host_path),
            container_name: blank(self.container_name),
            readiness: blank(self.readiness),
            docker_bin: blank(self.docker_bin),
            ..self
        }
    }
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        other => Err(LaunchError::Configuration(format!(
            "{name}: expected a boolean, got '{other}'"
        ))),
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64> {
    value.trim().parse::<u64>().map_err(|_| {
        LaunchError::Configuration(format!(
            "{name}: expected a number of seconds, got '{}'",
            value.trim()
        ))
    })
}

/// API key wrapper that never prints its value.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Where the agent's pattern file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternSource {
    /// YAML content written to `pattern.yaml` inside the config directory.
    Inline(String),
    /// An existing file, relative to the config directory.
    File(PathBuf),
}

/// What to do when a container with the configured name already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    Fail,
    Replace,
}

/// Validated launch configuration.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub server_url: String,
    pub api_key: ApiKey,
    pub project_name: Option<String>,
    pub patterns: PatternSource,
    pub config_dir: String,
    pub output_dir: String,
    pub docker_image: String,
    pub container_name: String,
    pub extra_args: Vec<String>,
    pub ssl: SslLibraries,
    pub readiness: Readiness,
    pub conflict: ConflictPolicy,
    pub docker_bin: String,
}

impl LaunchConfig {
    pub fn from_inputs(inputs: RawInputs) -> Result<Self> {
        let server_url = required(inputs.server_url, "server-url")?;
        let api_key = ApiKey::new(required(inputs.api_key, "api-key")?);

        let project_name = optional(inputs.project_name);
        if inputs.require_project_name.unwrap_or(false) && project_name.is_none() {
            return Err(missing("project-name"));
        }

        let patterns = match (inputs.patterns_yaml, optional(inputs.patterns)) {
            (Some(content), _) if !content.trim().is_empty() => PatternSource::Inline(content),
            (_, Some(path)) => PatternSource::File(validate_pattern_path(&path)?),
            _ => {
                return Err(LaunchError::Configuration(
                    "missing required input: patterns-yaml or patterns".to_string(),
                ));
            }
        };

        let container_name =
            optional(inputs.container_name).unwrap_or_else(|| DEFAULT_CONTAINER_NAME.to_string());
        validate_container_name(&container_name)?;

        let readiness_timeout = Duration::from_secs(
            inputs
                .readiness_timeout
                .unwrap_or(DEFAULT_READINESS_TIMEOUT_SECS),
        );
        let readiness = match optional(inputs.readiness).as_deref() {
            None | Some("poll") => Readiness::poll(readiness_timeout),
            Some("delay") => Readiness::Delay(readiness_timeout),
            Some(other) => {
                return Err(LaunchError::Configuration(format!(
                    "readiness: expected 'poll' or 'delay', got '{other}'"
                )));
            }
        };

        let ssl = SslLibraries::from_inputs(
            optional(inputs.ssl_lib_path),
            optional(inputs.ssl_lib_version),
            optional(inputs.libssl_host_path),
            optional(inputs.libcrypto_host_path),
        );

        Ok(LaunchConfig {
            server_url,
            api_key,
            project_name,
            patterns,
            config_dir: optional(inputs.config_dir).unwrap_or_else(|| DEFAULT_CONFIG_DIR.into()),
            output_dir: optional(inputs.output_dir).unwrap_or_else(|| DEFAULT_OUTPUT_DIR.into()),
            docker_image: optional(inputs.docker_image)
                .unwrap_or_else(|| DEFAULT_DOCKER_IMAGE.into()),
            container_name,
            extra_args: split_extra_args(inputs.args.as_deref().unwrap_or_default()),
            ssl,
            readiness,
            conflict: if inputs.replace_existing.unwrap_or(false) {
                ConflictPolicy::Replace
            } else {
                ConflictPolicy::Fail
            },
            docker_bin: optional(inputs.docker_bin).unwrap_or_else(|| DEFAULT_DOCKER_BIN.into()),
        })
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, name: &str) -> Result<String> {
    optional(value).ok_or_else(|| missing(name))
}

fn missing(name: &str) -> LaunchError {
    LaunchError::Configuration(format!("missing required input: {name}"))
}

/// Split user-supplied docker arguments on whitespace. Empty tokens never survive.
pub fn split_extra_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(String::from).collect()
}

/// The pattern file is mounted through the config directory, so its path must
/// stay inside it.
fn validate_pattern_path(path: &str) -> Result<PathBuf> {
    let path = PathBuf::from(path.strip_prefix("./").unwrap_or(path));
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(LaunchError::Configuration(format!(
            "patterns: '{}' must be a path relative to the config directory",
            path.display()
        )));
    }
    Ok(path)
}

/// Docker accepts `[a-zA-Z0-9][a-zA-Z0-9_.-]*` as a container name.
fn validate_container_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_first = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if valid_first && valid_rest {
        Ok(())
    } else {
        Err(LaunchError::Configuration(format!(
            "container-name: '{name}' is not a valid container name"
        )))
    }
}
