// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use roc_launcher::cli::Cli;
use roc_launcher::outputs::{StepOutputs, add_mask, error_annotation};
use roc_launcher::{DockerCli, LaunchConfig, RawInputs, WorkspaceContext, launch, prepare};
use std::process::ExitCode;

#[allow(clippy::print_stdout, clippy::print_stderr)]
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = simple_logger::init_with_level(cli.log_level()) {
        eprintln!("failed to initialize logger: {e}");
    }
    info!(
        "roc-launcher starting (version {})",
        env!("CARGO_PKG_VERSION")
    );

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            println!("{}", error_annotation(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::print_stdout)]
async fn run(cli: &Cli) -> Result<()> {
    let file_inputs = match cli.config_file {
        Some(ref path) => RawInputs::from_yaml_file(path)
            .with_context(|| format!("loading config file {}", path.display()))?,
        None => RawInputs::default(),
    };
    let env_inputs = RawInputs::from_env().context("reading step inputs")?;
    let inputs = file_inputs.overlay(env_inputs).overlay(cli.inputs());

    let config = LaunchConfig::from_inputs(inputs)?;
    if std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
        println!("{}", add_mask(config.api_key.expose()));
    }

    let ctx = WorkspaceContext::detect(cli.workspace.clone());
    info!("workspace: {}", ctx.root().display());

    if cli.dry_run {
        let plan = prepare(&config, &ctx).await?;
        println!("{}", plan.command.redacted());
        return Ok(());
    }

    let runtime = DockerCli::new(config.docker_bin.clone());
    let mut outputs = StepOutputs::from_env();
    let result = launch(&config, &ctx, &runtime, &mut outputs).await?;
    info!(
        "launched '{}' (id={}, exit code {})",
        result.container.name, result.container.id, result.exit_code
    );
    Ok(())
}
