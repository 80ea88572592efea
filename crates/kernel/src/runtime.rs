use std::num::NonZeroU8;

use loader::Loader;
use types::{ArrayList, TaskId};
use vm::{Status, VM};

/// The task collection plus what is needed to admit new tasks.
#[derive(Debug, Default)]
pub struct Runtime {
    pub(crate) tasks: ArrayList<VM>,
    pub(crate) loader: Loader,
    pub(crate) next_id: TaskId,
    pub(crate) trace: bool,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loader(loader: Loader) -> Self {
        Self {
            loader,
            ..Self::default()
        }
    }

    /// Tasks launched from now on trace every instruction they execute.
    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, id: TaskId) -> Option<&VM> {
        self.tasks.iter().find(|vm| vm.id() == id)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut VM> {
        self.tasks.iter_mut().find(|vm| vm.id() == id)
    }

    /// Live tasks in scheduling order.
    pub fn tasks(&self) -> impl Iterator<Item = &VM> {
        self.tasks.iter()
    }

    /// Returns false if no live task has this id.
    pub fn set_priority(&mut self, id: TaskId, priority: NonZeroU8) -> bool {
        match self.task_mut(id) {
            Some(vm) => {
                vm.set_priority(priority);
                true
            }
            None => false,
        }
    }

    /// Reactivates an Idle task. Returns false if the task is unknown or not Idle.
    pub fn resume(&mut self, id: TaskId) -> bool {
        let resumed = self.task_mut(id).is_some_and(|vm| vm.resume());
        if resumed {
            tracing::debug!(task = %id, "resumed");
        }
        resumed
    }

    /// Tasks remain but none of them can make progress without a resume.
    pub fn is_wedged(&self) -> bool {
        !self.tasks.is_empty() && self.tasks.iter().all(|vm| vm.status() != Status::Active)
    }
}
