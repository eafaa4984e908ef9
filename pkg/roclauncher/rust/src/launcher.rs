// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::command::DockerRun;
use crate::config::{ConflictPolicy, LaunchConfig};
use crate::errors::{LaunchError, Result};
use crate::libraries::LibraryProbe;
use crate::mounts::{MountSpec, mount_list};
use crate::outputs::{CONTAINER_ID_OUTPUT, CONTAINER_NAME_OUTPUT, OutputSink};
use crate::patterns::{self, PatternFile};
use crate::readiness::wait_ready;
use crate::runtime::ContainerRuntime;
use crate::workspace::WorkspaceContext;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// Lookup-only reference to the launched container. The container runs
/// detached; nothing here owns or stops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerHandle {
    pub name: String,
    /// Id printed by `docker run -d`, or the name if none was printed.
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchResult {
    pub exit_code: i32,
    pub container: ContainerHandle,
}

/// Everything resolved before the container runtime is touched.
#[derive(Debug)]
pub struct LaunchPlan {
    pub host_config_dir: PathBuf,
    pub host_output_dir: PathBuf,
    pub pattern_file: PatternFile,
    pub ssl: LibraryProbe,
    pub mounts: Vec<MountSpec>,
    pub command: DockerRun,
}

/// Create the host directories, materialize the pattern file, probe the SSL
/// libraries and assemble the command.
pub async fn prepare(config: &LaunchConfig, ctx: &WorkspaceContext) -> Result<LaunchPlan> {
    let host_config_dir = ctx.resolve(&config.config_dir);
    let host_output_dir = ctx.resolve(&config.output_dir);
    ensure_dir(&host_config_dir).await?;
    ensure_dir(&host_output_dir).await?;
    info!("host config dir: {}", host_config_dir.display());
    info!("host output dir: {}", host_output_dir.display());

    let pattern_file = patterns::resolve(&config.patterns, &host_config_dir).await?;

    let ssl = config.ssl.probe();
    let mounts = mount_list(&host_output_dir, &host_config_dir, &ssl);
    let command = DockerRun::build(config, &mounts, &pattern_file);

    Ok(LaunchPlan {
        host_config_dir,
        host_output_dir,
        pattern_file,
        ssl,
        mounts,
        command,
    })
}

/// Run the full launch: prepare, start the container, wait for it, and
/// publish its name and id.
pub async fn launch<R, O>(
    config: &LaunchConfig,
    ctx: &WorkspaceContext,
    runtime: &R,
    outputs: &mut O,
) -> Result<LaunchResult>
where
    R: ContainerRuntime,
    O: OutputSink,
{
    let plan = prepare(config, ctx).await?;
    start(config, &plan, runtime, outputs).await
}

/// Start the container described by `plan`. Outputs are only written once
/// the container is ready.
pub async fn start<R, O>(
    config: &LaunchConfig,
    plan: &LaunchPlan,
    runtime: &R,
    outputs: &mut O,
) -> Result<LaunchResult>
where
    R: ContainerRuntime,
    O: OutputSink,
{
    let name = config.container_name.as_str();
    if plan.ssl.is_degraded() {
        debug!("[{name}] starting in degraded mode without SSL library mounts");
    }

    resolve_conflict(runtime, name, config.conflict).await?;

    info!("running docker command: {}", plan.command.redacted());
    let out = runtime.run(&plan.command).await?;
    for line in out.stderr.lines().filter(|l| !l.trim().is_empty()) {
        info!("[{name}] docker: {line}");
    }
    if !out.success() {
        return Err(LaunchError::LaunchFailure {
            exit_code: out.exit_code,
            stderr: out.stderr,
        });
    }

    let id = out
        .stdout
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .unwrap_or(name)
        .to_string();
    info!("[{name}] started (id={id})");

    wait_ready(runtime, name, config.readiness).await?;

    let container = ContainerHandle {
        name: name.to_string(),
        id,
    };
    outputs.set_output(CONTAINER_NAME_OUTPUT, &container.name)?;
    outputs.set_output(CONTAINER_ID_OUTPUT, &container.id)?;
    info!("[{name}] container started and ready for external interaction");

    Ok(LaunchResult {
        exit_code: out.exit_code,
        container,
    })
}

async fn resolve_conflict<R: ContainerRuntime>(
    runtime: &R,
    name: &str,
    policy: ConflictPolicy,
) -> Result<()> {
    let Some(status) = runtime.status(name).await? else {
        return Ok(());
    };
    match policy {
        ConflictPolicy::Fail => Err(LaunchError::ContainerExists {
            name: name.to_string(),
        }),
        ConflictPolicy::Replace => {
            warn!("[{name}] removing existing {status} container");
            runtime.remove(name).await
        }
    }
}

async fn ensure_dir(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|e| LaunchError::io(format!("creating directory {}", path.display()), e))
}
