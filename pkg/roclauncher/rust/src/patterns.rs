// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::config::PatternSource;
use crate::errors::{LaunchError, Result};
use crate::mounts::CONTAINER_CONFIG_DIR;
use log::info;
use std::path::{Path, PathBuf};

/// File name used for inline pattern content.
pub const INLINE_PATTERN_FILE: &str = "pattern.yaml";

/// A pattern file that exists on the host and is non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternFile {
    pub host_path: PathBuf,
    /// Where the agent sees the file through the read-only config mount.
    pub container_path: PathBuf,
}

/// Materialize the pattern file inside `host_config_dir`, which must already exist.
pub async fn resolve(source: &PatternSource, host_config_dir: &Path) -> Result<PatternFile> {
    let relative = match source {
        PatternSource::Inline(content) => {
            let path = host_config_dir.join(INLINE_PATTERN_FILE);
            if content.trim().is_empty() {
                return Err(LaunchError::MissingPatternFile { path });
            }
            tokio::fs::write(&path, content)
                .await
                .map_err(|e| LaunchError::io(format!("writing {}", path.display()), e))?;
            info!("patterns file written to {}", path.display());
            PathBuf::from(INLINE_PATTERN_FILE)
        }
        PatternSource::File(relative) => relative.clone(),
    };

    let host_path = host_config_dir.join(&relative);
    match tokio::fs::metadata(&host_path).await {
        Ok(meta) if meta.is_file() && meta.len() > 0 => {}
        _ => return Err(LaunchError::MissingPatternFile { path: host_path }),
    }

    // Symlinks are followed on the host but not through the mount, so the
    // agent is pointed at the real file, which must live in the config dir.
    let relative = contained_path(&host_path, host_config_dir).await?;
    let host_path = host_config_dir.join(&relative);
    info!("using patterns file {}", host_path.display());

    Ok(PatternFile {
        host_path,
        container_path: Path::new(CONTAINER_CONFIG_DIR).join(relative),
    })
}

/// Path of `host_path`'s real target relative to the real `host_config_dir`.
async fn contained_path(host_path: &Path, host_config_dir: &Path) -> Result<PathBuf> {
    let real_file = canonicalize(host_path).await?;
    let real_dir = canonicalize(host_config_dir).await?;

    match real_file.strip_prefix(&real_dir) {
        Ok(relative) => Ok(relative.to_path_buf()),
        Err(_) => Err(LaunchError::Configuration(format!(
            "patterns: {} resolves to {}, outside the config directory {}",
            host_path.display(),
            real_file.display(),
            real_dir.display()
        ))),
    }
}

async fn canonicalize(path: &Path) -> Result<PathBuf> {
    tokio::fs::canonicalize(path)
        .await
        .map_err(|e| LaunchError::io(format!("resolving {}", path.display()), e))
}
