// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! In-memory container runtime for unit tests.
#![allow(clippy::unwrap_used)]

use crate::command::DockerRun;
use crate::errors::Result;
use crate::runtime::{ContainerRuntime, ContainerStatus, RunOutput};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

/// Records every call. Before `run` succeeds, `status` reports the
/// pre-existing container (none by default); afterwards it replays the
/// scripted statuses, repeating the last one, and defaults to running.
pub struct FakeRuntime {
    run_output: RunOutput,
    existing: RefCell<Option<ContainerStatus>>,
    started: Cell<bool>,
    statuses: RefCell<VecDeque<Option<ContainerStatus>>>,
    status_calls: Cell<usize>,
    runs: RefCell<Vec<Vec<String>>>,
    removed: RefCell<Vec<String>>,
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self {
            run_output: RunOutput {
                exit_code: 0,
                stdout: "4f1c2d3e5a6b\n".to_string(),
                stderr: String::new(),
            },
            existing: RefCell::new(None),
            started: Cell::new(false),
            statuses: RefCell::new(VecDeque::new()),
            status_calls: Cell::new(0),
            runs: RefCell::new(Vec::new()),
            removed: RefCell::new(Vec::new()),
        }
    }
}

impl FakeRuntime {
    /// Script the statuses reported once the container has started.
    pub fn with_statuses(
        self,
        statuses: impl IntoIterator<Item = Option<ContainerStatus>>,
    ) -> Self {
        *self.statuses.borrow_mut() = statuses.into_iter().collect();
        self
    }

    /// Behave as if `run` already succeeded.
    pub fn already_started(self) -> Self {
        self.started.set(true);
        self
    }

    pub fn with_existing(self, status: ContainerStatus) -> Self {
        *self.existing.borrow_mut() = Some(status);
        self
    }

    pub fn with_run_output(mut self, exit_code: i32, stdout: &str, stderr: &str) -> Self {
        self.run_output = RunOutput {
            exit_code,
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
        };
        self
    }

    pub fn runs(&self) -> Vec<Vec<String>> {
        self.runs.borrow().clone()
    }

    pub fn removed(&self) -> Vec<String> {
        self.removed.borrow().clone()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.get()
    }
}

impl ContainerRuntime for FakeRuntime {
    async fn run(&self, cmd: &DockerRun) -> Result<RunOutput> {
        self.runs
            .borrow_mut()
            .push(cmd.argv().into_iter().map(String::from).collect());
        if self.run_output.success() {
            self.started.set(true);
        }
        Ok(self.run_output.clone())
    }

    async fn status(&self, _name: &str) -> Result<Option<ContainerStatus>> {
        self.status_calls.set(self.status_calls.get() + 1);
        if !self.started.get() {
            return Ok(self.existing.borrow().clone());
        }
        let mut statuses = self.statuses.borrow_mut();
        let status = if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses
                .front()
                .cloned()
                .unwrap_or(Some(ContainerStatus::Running))
        };
        Ok(status)
    }

    async fn remove(&self, name: &str) -> Result<()> {
        self.removed.borrow_mut().push(name.to_string());
        *self.existing.borrow_mut() = None;
        Ok(())
    }
}

/// Output sink that keeps records in memory.
impl crate::outputs::OutputSink for Vec<(String, String)> {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        self.push((name.to_string(), value.to_string()));
        Ok(())
    }
}
