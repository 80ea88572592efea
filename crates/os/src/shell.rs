use std::io;

use kernel::Runtime;
use loader::{LoadError, Loader};
use thiserror::Error;
use types::TaskId;
use vm::Status;

use crate::Environment;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("cannot open {name}: {source}")]
    Open { name: String, source: io::Error },

    #[error("cannot load {name}: {source}")]
    Load { name: String, source: LoadError },
}

/// Result of launching a batch of programs.
#[derive(Debug, Default)]
pub struct LaunchSummary {
    pub launched: Vec<(String, TaskId)>,
    pub failed: Vec<LaunchError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every task finished.
    Completed,
    /// Tasks remain, all of them Idle.
    Wedged,
    /// The configured pass limit ran out.
    PassLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveReport {
    pub reason: StopReason,
    pub passes: u64,
    pub steps: u64,
    /// Tasks that finished, in completion order.
    pub finished: Vec<TaskId>,
    /// Tasks still in the runtime when driving stopped.
    pub remaining: Vec<TaskId>,
}

/// Launches programs named on the command line and drives the runtime.
#[derive(Debug)]
pub struct Shell<'env> {
    env: &'env Environment,
    runtime: Runtime,
}

impl<'env> Shell<'env> {
    pub fn new(env: &'env Environment) -> Self {
        let mut runtime = Runtime::with_loader(Loader::new(env.config.load_config()));
        runtime.set_trace(env.config.trace);
        Self { env, runtime }
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    pub fn runtime_mut(&mut self) -> &mut Runtime {
        &mut self.runtime
    }

    /// Opens and launches one program at the configured default priority.
    pub fn launch(&mut self, name: &str) -> Result<TaskId, LaunchError> {
        let mut stream = self.env.open(name).map_err(|source| LaunchError::Open {
            name: name.to_string(),
            source,
        })?;
        let id = self
            .runtime
            .launch(&mut stream)
            .map_err(|source| LaunchError::Load {
                name: name.to_string(),
                source,
            })?;
        self.runtime.set_priority(id, self.env.config.default_priority);
        Ok(id)
    }

    /// Launches every program in order. A failure is recorded and the rest
    /// are still launched.
    pub fn launch_all<I, S>(&mut self, names: I) -> LaunchSummary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut summary = LaunchSummary::default();
        for name in names {
            let name = name.as_ref();
            match self.launch(name) {
                Ok(id) => summary.launched.push((name.to_string(), id)),
                Err(err) => {
                    tracing::warn!("{}", err);
                    summary.failed.push(err);
                }
            }
        }
        summary
    }

    /// Runs passes until the runtime is empty, wedged, or the pass limit is hit.
    pub fn drive(&mut self) -> DriveReport {
        let mut passes = 0;
        let mut steps = 0;
        let mut finished = Vec::new();

        let reason = loop {
            if self.runtime.is_empty() {
                break StopReason::Completed;
            }
            if self.runtime.is_wedged() {
                break StopReason::Wedged;
            }
            if passes >= self.env.config.max_passes {
                break StopReason::PassLimit;
            }

            let report = self.runtime.run_pass();
            passes += 1;
            steps += report.stepped;
            for id in &report.reaped {
                tracing::info!(task = %id, pass = passes, "finished");
            }
            finished.extend(report.reaped);
        };

        if reason == StopReason::Wedged {
            for vm in self.runtime.tasks().filter(|vm| vm.status() == Status::Idle) {
                tracing::warn!(task = %vm.id(), "idle with no way to resume");
            }
        }

        DriveReport {
            reason,
            passes,
            steps,
            finished,
            remaining: self.runtime.tasks().map(|vm| vm.id()).collect(),
        }
    }
}
