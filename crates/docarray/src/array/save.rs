use super::DocumentArray;
use crate::delta::{translate, UpdateOp};

impl DocumentArray {
    /// Pending atomics as partial update commands, in recording order.
    pub fn update_ops(&self) -> Vec<UpdateOp> {
        self.log
            .atomics()
            .values()
            .map(|op| translate(op, &self.path, &self.elements))
            .collect()
    }

    /// Run one save cycle through `persist`.
    ///
    /// The atomics are backed up first. On success they are cleared; on
    /// failure the backup is restored so a retry sends the same update.
    /// `persist` is not called when nothing is pending.
    pub fn save_with<F, E>(&mut self, persist: F) -> Result<(), E>
    where
        F: FnOnce(&[UpdateOp]) -> Result<(), E>,
    {
        self.log.snapshot();
        let ops = self.update_ops();
        if ops.is_empty() {
            self.log.clear();
            return Ok(());
        }
        match persist(&ops) {
            Ok(()) => {
                log::debug!("saved {} update ops for {:?}", ops.len(), self.path);
                self.log.clear();
                Ok(())
            }
            Err(err) => {
                log::debug!("save of {:?} failed; restoring atomics", self.path);
                self.log.restore();
                Err(err)
            }
        }
    }
}
