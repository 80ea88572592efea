use std::num::NonZeroU8;

use crate::cpu::{Effect, CPU};
use crate::fault::Fault;
use crate::memory_page::MemoryRegion;
use types::{ArrayList, TaskId, WORD_SIZE};

/// Lifecycle of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Runnable; the scheduler grants it steps.
    Active,
    /// Yielded via `BRK`; waits for an external resume.
    Idle,
    /// Halted. Terminal.
    Finished,
}

/// Placement of the variable table, entry point and error handler inside a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub var_count: u64,
    pub entry: usize,
    pub error: usize,
}

impl Layout {
    /// The variable table, entry point and error address must all fit in `len` bytes.
    pub fn fits(&self, len: usize) -> bool {
        let table = usize::try_from(self.var_count)
            .ok()
            .and_then(|n| n.checked_mul(WORD_SIZE));
        matches!(table, Some(table) if table <= len)
            && self.entry < len
            && self.error < len
    }
}

/// Counters maintained across every call to [`VM::step`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionStats {
    /// Instructions attempted, faulting ones included.
    pub steps: u64,
    pub faults: u64,
}

/// One VMIL process: owns its memory region and operand stack exclusively.
#[derive(Debug)]
pub struct VM {
    pub cpu: CPU,
    memory: MemoryRegion,
    id: TaskId,
    priority: NonZeroU8,
    status: Status,
    var_count: u64,
    stats: ExecutionStats,
    last_fault: Option<Fault>,
}

impl VM {
    /// Builds an Active VM with priority 1 positioned at `layout.entry`.
    /// Returns `None` if the layout does not fit the region.
    pub fn new(id: TaskId, memory: MemoryRegion, layout: Layout) -> Option<Self> {
        if !layout.fits(memory.len()) {
            return None;
        }
        Some(Self {
            cpu: CPU::new(layout.entry, layout.error),
            memory,
            id,
            priority: NonZeroU8::MIN,
            status: Status::Active,
            var_count: layout.var_count,
            stats: ExecutionStats::default(),
            last_fault: None,
        })
    }

    /// Executes exactly one instruction.
    ///
    /// Only an Active VM executes; stepping an Idle or Finished VM does nothing.
    /// A fault moves the cursor to the error address and leaves the status as is.
    pub fn step(&mut self) {
        if self.status != Status::Active {
            return;
        }
        self.stats.steps += 1;

        match self.cpu.step(&mut self.memory, self.var_count) {
            Ok(Effect::Continue) => {}
            Ok(Effect::Halt) => {
                tracing::debug!(task = %self.id, "halted");
                self.status = Status::Finished;
            }
            Ok(Effect::Yield) => {
                tracing::debug!(task = %self.id, "yielded");
                self.status = Status::Idle;
            }
            Err(fault) => self.fault(fault),
        }
    }

    fn fault(&mut self, fault: Fault) {
        tracing::debug!(
            task = %self.id,
            at = self.cpu.current,
            handler = self.cpu.error,
            "fault: {}",
            fault
        );
        self.stats.faults += 1;
        self.last_fault = Some(fault);
        self.cpu.current = self.cpu.error;
    }

    /// Idle -> Active. Returns false (and changes nothing) from any other state.
    pub fn resume(&mut self) -> bool {
        if self.status != Status::Idle {
            return false;
        }
        self.status = Status::Active;
        true
    }

    pub fn set_priority(&mut self, priority: NonZeroU8) {
        self.priority = priority;
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.cpu.verbose = verbose;
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn priority(&self) -> NonZeroU8 {
        self.priority
    }

    pub fn current(&self) -> usize {
        self.cpu.current
    }

    pub fn start(&self) -> usize {
        self.cpu.start
    }

    pub fn error(&self) -> usize {
        self.cpu.error
    }

    pub fn var_count(&self) -> u64 {
        self.var_count
    }

    pub fn stack(&self) -> &ArrayList<u64> {
        &self.cpu.stack
    }

    /// Value of variable slot `index`, if it exists.
    pub fn variable(&self, index: u64) -> Option<u64> {
        if index >= self.var_count {
            return None;
        }
        let addr = usize::try_from(index).ok()?.checked_mul(WORD_SIZE)?;
        self.memory.read_u64_le(addr)
    }

    pub fn memory(&self) -> &MemoryRegion {
        &self.memory
    }

    pub fn stats(&self) -> ExecutionStats {
        self.stats
    }

    pub fn last_fault(&self) -> Option<Fault> {
        self.last_fault
    }
}
