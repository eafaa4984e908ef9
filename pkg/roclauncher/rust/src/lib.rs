// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

// Correctness
#![deny(clippy::string_slice)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::indexing_slicing)]
// Panicking code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::unimplemented)]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]

pub mod cli;
pub mod command;
pub mod config;
mod errors;
pub mod launcher;
pub mod libraries;
pub mod mounts;
pub mod outputs;
pub mod patterns;
pub mod readiness;
pub mod runtime;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export the public API
pub use config::{LaunchConfig, RawInputs};
pub use errors::{LaunchError, Result};
pub use launcher::{ContainerHandle, LaunchPlan, LaunchResult, launch, prepare, start};
pub use runtime::{ContainerRuntime, DockerCli};
pub use workspace::WorkspaceContext;
