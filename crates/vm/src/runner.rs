use std::fmt::Write;

use crate::vm::{Status, VM};

impl VM {
    /// Steps the VM until it stops being Active or `max_steps` is used up, then
    /// returns a dump of the final state.
    pub fn run_with_trace(&mut self, max_steps: usize) -> String {
        let verbose = self.cpu.verbose;
        self.cpu.verbose = true;

        tracing::trace!(task = %self.id(), "begin execution trace");
        for _ in 0..max_steps {
            if self.status() != Status::Active {
                break;
            }
            self.step();
        }
        tracing::trace!(task = %self.id(), status = ?self.status(), "end execution trace");

        self.cpu.verbose = verbose;
        self.dump_stack()
    }

    pub fn dump_stack(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "task {} status={:?} current=0x{:08x} steps={} faults={}",
            self.id(),
            self.status(),
            self.current(),
            self.stats().steps,
            self.stats().faults
        );
        if let Some(fault) = self.last_fault() {
            let _ = writeln!(out, "last fault: {}", fault);
        }
        let _ = writeln!(out, "stack ({} values, top first):", self.stack().len());
        for (depth, value) in self.stack().iter().rev().enumerate() {
            let _ = writeln!(out, "  [{:>3}] 0x{:016x} ({})", depth, value, *value as i64);
        }
        for index in 0..self.var_count() {
            if let Some(value) = self.variable(index) {
                let _ = writeln!(out, "  var{:<3} = 0x{:016x} ({})", index, value, value as i64);
            }
        }
        out
    }
}
