// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::libraries::LibraryProbe;
use std::fmt;
use std::path::{Path, PathBuf};

pub const CONTAINER_OUTPUT_DIR: &str = "/tmp/roc-output";
pub const CONTAINER_CONFIG_DIR: &str = "/tmp/roc-config";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountSpec {
    pub host_path: PathBuf,
    pub container_path: PathBuf,
    pub read_only: bool,
}

impl MountSpec {
    pub fn read_write(host: impl Into<PathBuf>, container: impl Into<PathBuf>) -> Self {
        Self {
            host_path: host.into(),
            container_path: container.into(),
            read_only: false,
        }
    }

    pub fn read_only(host: impl Into<PathBuf>, container: impl Into<PathBuf>) -> Self {
        Self {
            read_only: true,
            ..Self::read_write(host, container)
        }
    }
}

/// Renders the `-v` value: `host:container[:ro]`.
impl fmt::Display for MountSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}",
            self.host_path.display(),
            self.container_path.display()
        )?;
        if self.read_only {
            f.write_str(":ro")?;
        }
        Ok(())
    }
}

/// Build the mount list in its fixed order: `/proc`, `/sys`, the SSL
/// libraries when the probe found both, the output directory, then the
/// read-only config directory.
pub fn mount_list(
    host_output_dir: &Path,
    host_config_dir: &Path,
    ssl: &LibraryProbe,
) -> Vec<MountSpec> {
    let mut mounts = vec![
        MountSpec::read_write("/proc", "/proc"),
        MountSpec::read_write("/sys", "/sys"),
    ];
    mounts.extend_from_slice(ssl.mounts());
    mounts.push(MountSpec::read_write(host_output_dir, CONTAINER_OUTPUT_DIR));
    mounts.push(MountSpec::read_only(host_config_dir, CONTAINER_CONFIG_DIR));
    mounts
}
