use crate::{
    api::NutritionApi,
    errors::{api_message, StoreError, StoreResult},
    LocalFile,
};
use std::sync::{Arc, Mutex};

/// A queued file awaiting commit, keyed by [`LocalFile::upload_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub id: String,
    pub file: LocalFile,
}

/// Manages the pending local files plus free-text medical-condition notes on
/// the document upload page, committing them to the backend in one save
/// action.
pub struct UploadCoordinator {
    api: Arc<dyn NutritionApi>,
    pending: Mutex<Vec<PendingUpload>>,
}

impl UploadCoordinator {
    #[must_use]
    pub fn new(api: Arc<dyn NutritionApi>) -> Self {
        Self {
            api,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Queue a file. Selecting the same file again (same name, size, and
    /// modification time) is ignored; insertion order is preserved for
    /// display. Returns whether the file was queued.
    pub fn enqueue(&self, file: LocalFile) -> bool {
        let id = file.upload_id();
        let mut pending = self.pending.lock().expect("upload state poisoned");
        if pending.iter().any(|upload| upload.id == id) {
            tracing::debug!(%id, "duplicate file selection ignored");
            return false;
        }
        pending.push(PendingUpload { id, file });
        true
    }

    /// Remove a queued file. Absent ids are a no-op.
    pub fn remove(&self, id: &str) {
        self.pending
            .lock()
            .expect("upload state poisoned")
            .retain(|upload| upload.id != id);
    }

    /// The queued files in insertion order.
    #[must_use]
    pub fn pending(&self) -> Vec<PendingUpload> {
        self.pending.lock().expect("upload state poisoned").clone()
    }

    /// Commit the medical-conditions text and the pending file in one save
    /// action.
    ///
    /// Preconditions are checked before any network call: an absent session
    /// yields [`StoreError::NotAuthenticated`], more than one pending file
    /// yields [`StoreError::TooManyFiles`] (the backend accepts exactly one
    /// file per commit). Non-blank text is saved first; a failure there
    /// aborts the commit and no upload is attempted. On full success the
    /// pending set is cleared. The text is durable profile-adjacent state
    /// and is never cleared by the coordinator.
    pub async fn commit(
        &self,
        user_id: Option<&str>,
        medical_conditions_text: &str,
    ) -> StoreResult<()> {
        let Some(user_id) = user_id else {
            return Err(StoreError::NotAuthenticated);
        };

        let pending = self.pending();
        if pending.len() > 1 {
            return Err(StoreError::TooManyFiles);
        }

        if !medical_conditions_text.trim().is_empty() {
            self.api
                .update_medical_conditions(user_id, medical_conditions_text)
                .await
                .map_err(|error| {
                    StoreError::MedicalConditionsSaveFailed(api_message(
                        &error,
                        "Failed to save medical conditions",
                    ))
                })?;
        }

        if let Some(upload) = pending.first() {
            self.api
                .process_file(user_id, &upload.file)
                .await
                .map_err(|error| {
                    StoreError::FileUploadFailed(api_message(&error, "Failed to upload file"))
                })?;
        }

        self.pending.lock().expect("upload state poisoned").clear();
        tracing::debug!(user_id, "upload commit complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockApi;

    fn file(name: &str, bytes: usize, last_modified: u64) -> LocalFile {
        LocalFile {
            name: name.to_string(),
            last_modified,
            bytes: vec![0u8; bytes],
        }
    }

    fn coordinator() -> UploadCoordinator {
        UploadCoordinator::new(Arc::new(MockApi::new()))
    }

    #[test]
    fn enqueue_is_idempotent_for_the_same_file() {
        let uploads = coordinator();
        assert!(uploads.enqueue(file("report.pdf", 42, 1000)));
        assert!(!uploads.enqueue(file("report.pdf", 42, 1000)));
        assert_eq!(uploads.pending().len(), 1);
    }

    #[test]
    fn enqueue_preserves_insertion_order() {
        let uploads = coordinator();
        uploads.enqueue(file("a.pdf", 1, 1));
        uploads.enqueue(file("b.pdf", 2, 2));
        let names: Vec<_> = uploads.pending().into_iter().map(|u| u.file.name).collect();
        assert_eq!(names, vec!["a.pdf", "b.pdf"]);
    }

    #[test]
    fn remove_is_a_no_op_for_absent_ids() {
        let uploads = coordinator();
        uploads.enqueue(file("a.pdf", 1, 1));
        uploads.remove("missing|0|0");
        assert_eq!(uploads.pending().len(), 1);

        uploads.remove("a.pdf|1|1");
        assert!(uploads.pending().is_empty());
    }
}
