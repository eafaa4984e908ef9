// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Optional SSL/crypto library mounts.
//!
//! The agent image expects OpenSSL at `/usr/lib64`. When the runner ships
//! matching libraries they are bind-mounted in; when it does not, the agent
//! still starts but without TLS inspection support.

use crate::mounts::MountSpec;
use log::{info, warn};
use std::path::{Path, PathBuf};

pub const DEFAULT_SSL_LIB_DIR: &str = "/lib/x86_64-linux-gnu";
pub const DEFAULT_SSL_LIB_VERSION: &str = "3";
const CONTAINER_LIB_DIR: &str = "/usr/lib64";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SslLibraries {
    dir: PathBuf,
    version: String,
    libssl_override: Option<PathBuf>,
    libcrypto_override: Option<PathBuf>,
}

impl Default for SslLibraries {
    fn default() -> Self {
        Self::from_inputs(None, None, None, None)
    }
}

impl SslLibraries {
    pub fn from_inputs(
        dir: Option<String>,
        version: Option<String>,
        libssl_host_path: Option<String>,
        libcrypto_host_path: Option<String>,
    ) -> Self {
        Self {
            dir: PathBuf::from(dir.unwrap_or_else(|| DEFAULT_SSL_LIB_DIR.to_string())),
            version: version.unwrap_or_else(|| DEFAULT_SSL_LIB_VERSION.to_string()),
            libssl_override: libssl_host_path.map(PathBuf::from),
            libcrypto_override: libcrypto_host_path.map(PathBuf::from),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn libssl_host_path(&self) -> PathBuf {
        self.libssl_override
            .clone()
            .unwrap_or_else(|| self.dir.join(self.soname("libssl")))
    }

    pub fn libcrypto_host_path(&self) -> PathBuf {
        self.libcrypto_override
            .clone()
            .unwrap_or_else(|| self.dir.join(self.soname("libcrypto")))
    }

    fn soname(&self, lib: &str) -> String {
        format!("{lib}.so.{}", self.version)
    }

    fn container_path(&self, lib: &str) -> PathBuf {
        Path::new(CONTAINER_LIB_DIR).join(self.soname(lib))
    }

    /// Check that both libraries exist on the host. Never fails: missing
    /// libraries are reported as [`LibraryProbe::Missing`] and logged.
    pub fn probe(&self) -> LibraryProbe {
        let libssl = self.libssl_host_path();
        let libcrypto = self.libcrypto_host_path();

        let missing: Vec<PathBuf> = [&libssl, &libcrypto]
            .into_iter()
            .filter(|p| !p.is_file())
            .cloned()
            .collect();

        if !missing.is_empty() {
            let probe = LibraryProbe::Missing(missing);
            probe.log();
            return probe;
        }

        let probe = LibraryProbe::Present([
            MountSpec::read_write(libssl, self.container_path("libssl")),
            MountSpec::read_write(libcrypto, self.container_path("libcrypto")),
        ]);
        probe.log();
        probe
    }
}

/// Outcome of [`SslLibraries::probe`]. `Missing` is the library probe warning:
/// the launch continues without the mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryProbe {
    Present([MountSpec; 2]),
    Missing(Vec<PathBuf>),
}

impl LibraryProbe {
    pub fn mounts(&self) -> &[MountSpec] {
        match self {
            LibraryProbe::Present(mounts) => mounts,
            LibraryProbe::Missing(_) => &[],
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, LibraryProbe::Missing(_))
    }

    fn log(&self) {
        match self {
            LibraryProbe::Present(mounts) => {
                for m in mounts {
                    info!("found SSL library {}", m.host_path.display());
                }
            }
            LibraryProbe::Missing(paths) => {
                let list: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
                warn!(
                    "SSL libraries not found ({}); launching without SSL library mounts",
                    list.join(", ")
                );
            }
        }
    }
}
