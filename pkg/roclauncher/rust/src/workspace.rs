// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use log::warn;
use std::path::{Path, PathBuf};

pub const WORKSPACE_ENV: &str = "GITHUB_WORKSPACE";

/// The root directory that relative config/output directories are resolved
/// against. Passed explicitly so the builder never reads the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceContext {
    root: PathBuf,
}

impl WorkspaceContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the workspace root: `explicit`, then `GITHUB_WORKSPACE`, then
    /// the current directory.
    pub fn detect(explicit: Option<PathBuf>) -> Self {
        if let Some(root) = explicit {
            return Self::new(root);
        }
        if let Some(root) = std::env::var_os(WORKSPACE_ENV).filter(|v| !v.is_empty()) {
            return Self::new(root);
        }
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        warn!(
            "{WORKSPACE_ENV} is not set, using current directory {} as workspace",
            cwd.display()
        );
        Self::new(cwd)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join a user-supplied directory onto the workspace root. A leading `./`
    /// is dropped; absolute paths are kept as-is.
    pub fn resolve(&self, dir: &str) -> PathBuf {
        let trimmed = dir.trim();
        let relative = trimmed.strip_prefix("./").unwrap_or(trimmed);
        if relative.is_empty() || relative == "." {
            return self.root.clone();
        }
        self.root.join(relative)
    }
}
