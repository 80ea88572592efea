use loader::{ByteStream, LoadError};
use types::TaskId;

use crate::Runtime;

impl Runtime {
    /// Loads one image from `stream` and appends it to the task collection.
    ///
    /// The stream is closed whether or not the load succeeds. A failed load
    /// consumes no id and leaves the collection untouched.
    pub fn launch<S>(&mut self, stream: &mut S) -> Result<TaskId, LoadError>
    where
        S: ByteStream + ?Sized,
    {
        let id = self.next_id;
        let loaded = self.loader.load(stream, id);
        stream.close();

        let mut vm = match loaded {
            Ok(vm) => vm,
            Err(err) => {
                tracing::warn!("launch failed: {}", err);
                return Err(err);
            }
        };
        vm.set_verbose(self.trace);

        tracing::info!(
            task = %id,
            image_len = vm.memory().len(),
            entry = vm.start(),
            "launched"
        );
        self.next_id = id.next();
        self.tasks.add(vm);
        Ok(id)
    }
}
