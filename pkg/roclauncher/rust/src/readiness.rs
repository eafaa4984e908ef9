// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::errors::{LaunchError, Result};
use crate::runtime::{ContainerRuntime, ContainerStatus};
use log::{debug, info};
use tokio::time::{Duration, Instant, sleep};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How the launcher decides the agent container is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Sleep unconditionally, then report success.
    Delay(Duration),
    /// Query the runtime until the container is running, bounded by `timeout`.
    Poll { timeout: Duration, interval: Duration },
}

impl Readiness {
    pub fn poll(timeout: Duration) -> Self {
        Readiness::Poll {
            timeout,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

pub async fn wait_ready<R: ContainerRuntime>(
    runtime: &R,
    name: &str,
    readiness: Readiness,
) -> Result<()> {
    match readiness {
        Readiness::Delay(delay) => {
            info!("[{name}] waiting {}s for the agent to settle", delay.as_secs());
            sleep(delay).await;
            Ok(())
        }
        Readiness::Poll { timeout, interval } => poll(runtime, name, timeout, interval).await,
    }
}

async fn poll<R: ContainerRuntime>(
    runtime: &R,
    name: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let status = runtime.status(name).await?;
        debug!(
            "[{name}] status: {}",
            status.as_ref().map_or("missing".to_string(), |s| s.to_string())
        );
        match status {
            Some(ContainerStatus::Running) => {
                info!("[{name}] container is running");
                return Ok(());
            }
            Some(s) if s.is_terminal() => {
                return Err(not_ready(name, format!("container {s} after start")));
            }
            None => {
                return Err(not_ready(name, "container no longer exists".to_string()));
            }
            Some(s) => {
                if Instant::now() >= deadline {
                    return Err(not_ready(
                        name,
                        format!("still {s} after {}s", timeout.as_secs()),
                    ));
                }
            }
        }
        sleep(interval).await;
    }
}

fn not_ready(name: &str, reason: String) -> LaunchError {
    LaunchError::NotReady {
        name: name.to_string(),
        reason,
    }
}
