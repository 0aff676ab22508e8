//! Update trackers, export, and patch application.

use crate::elemental::diff::DiffId;
use crate::elemental::export::{ModelSnapshot, ModelUpdate};

use super::error::ModelError;
use super::Model;

impl Model {
    /// Register an update tracker; it observes every mutation from now on.
    pub fn add_update_tracker(&mut self) -> DiffId {
        self.store.add_diff()
    }

    /// Export what a tracker saw since its checkpoint, or `None` when
    /// nothing changed (so consumers can skip a re-solve).
    ///
    /// Exporting does not move the checkpoint; call
    /// [`advance_checkpoint`](Model::advance_checkpoint) once the update
    /// has been consumed.
    pub fn export_update(
        &self,
        tracker: DiffId,
        remove_names: bool,
    ) -> Result<Option<ModelUpdate>, ModelError> {
        Ok(self.store.export_update(tracker, remove_names)?)
    }

    /// Mark everything up to now as seen by the tracker.
    pub fn advance_checkpoint(&mut self, tracker: DiffId) -> Result<(), ModelError> {
        Ok(self.store.advance_diff(tracker)?)
    }

    /// Remove a tracker; any later use of its id fails loudly.
    pub fn remove_update_tracker(&mut self, tracker: DiffId) -> Result<(), ModelError> {
        Ok(self.store.remove_diff(tracker)?)
    }

    pub fn num_update_trackers(&self) -> usize {
        self.store.num_diffs()
    }

    /// Export the whole model, stably ordered.
    pub fn export(&self, remove_names: bool) -> ModelSnapshot {
        self.store.export(remove_names)
    }

    /// Mirror a patch produced against a copy of this model.
    pub fn apply_update(&mut self, update: &ModelUpdate) -> Result<(), ModelError> {
        Ok(self.store.apply_update(update)?)
    }
}
