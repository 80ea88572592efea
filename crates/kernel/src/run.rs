use types::TaskId;
use vm::Status;

use crate::Runtime;

/// What a single pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Instructions executed across all tasks.
    pub stepped: u64,
    /// Tasks that finished during the pass, in the order they were removed.
    pub reaped: Vec<TaskId>,
}

impl Runtime {
    /// Visits every task once in insertion order.
    ///
    /// An Active task runs until its priority quota is spent or it stops
    /// being Active, whichever comes first. A task that ends its slice
    /// Finished is removed; later tasks shift down and are still visited in
    /// this pass.
    pub fn run_pass(&mut self) -> PassReport {
        let mut report = PassReport::default();

        self.tasks.retain_mut(|vm| {
            if vm.status() == Status::Active {
                for _ in 0..vm.priority().get() {
                    vm.step();
                    report.stepped += 1;
                    if vm.status() != Status::Active {
                        break;
                    }
                }
            }

            if vm.status() == Status::Finished {
                tracing::debug!(task = %vm.id(), steps = vm.stats().steps, "reaped");
                report.reaped.push(vm.id());
                return false;
            }
            true
        });

        report
    }

    /// Runs passes until no task is left, the runtime wedges, or
    /// `max_passes` have run. Returns the number of passes executed.
    pub fn run_until_settled(&mut self, max_passes: u64) -> u64 {
        let mut passes = 0;
        while passes < max_passes && !self.is_empty() && !self.is_wedged() {
            self.run_pass();
            passes += 1;
        }
        passes
    }
}
