//! Run archive - sessions stored as export documents in a [`KvStore`]

use tracing::debug;

use super::KvStore;
use crate::experiment::ReadingLog;
use crate::export::{ExperimentMeta, ExportDocument};
use crate::Result;

/// Key namespace for archived sessions.
pub const SESSION_KEY_PREFIX: &str = "ps_session:";

/// Storage key for an experiment's session.
#[must_use]
pub fn session_key(experiment_id: &str) -> String {
    format!("{SESSION_KEY_PREFIX}{experiment_id}")
}

/// Saves and restores reading logs through a key-value backend.
#[derive(Debug, Default)]
pub struct RunArchive<S> {
    store: S,
}

impl<S: KvStore> RunArchive<S> {
    /// Wrap a backend.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Underlying backend.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Store `document` under the experiment's session key.
    ///
    /// # Errors
    ///
    /// Serialization or backend failures.
    pub async fn save(&self, experiment_id: &str, document: &ExportDocument) -> Result<()> {
        let bytes = serde_json::to_vec(document)?;
        debug!(experiment_id, bytes = bytes.len(), "session archived");
        self.store.set(&session_key(experiment_id), bytes).await
    }

    /// Archive a log. Returns `false` (storing nothing) when it is empty.
    ///
    /// # Errors
    ///
    /// Serialization or backend failures.
    pub async fn save_log(
        &self,
        experiment_id: &str,
        meta: &ExperimentMeta,
        log: &ReadingLog,
    ) -> Result<bool> {
        match ExportDocument::new(meta, log.current(), log.runs()) {
            Some(document) => {
                self.save(experiment_id, &document).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Load the archived document, if any.
    ///
    /// # Errors
    ///
    /// Backend failures, or `Error::Serialization` for a corrupt entry.
    pub async fn load(&self, experiment_id: &str) -> Result<Option<ExportDocument>> {
        match self.store.get(&session_key(experiment_id)).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Append the archived runs to `log`. Returns how many were restored.
    ///
    /// # Errors
    ///
    /// Same as [`RunArchive::load`].
    pub async fn restore_into(&self, experiment_id: &str, log: &mut ReadingLog) -> Result<usize> {
        let Some(document) = self.load(experiment_id).await? else {
            return Ok(0);
        };
        let runs = document.into_runs();
        let restored = runs.len();
        log.restore_runs(runs);
        debug!(experiment_id, restored, "session restored");
        Ok(restored)
    }

    /// Drop the archived session.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub async fn remove(&self, experiment_id: &str) -> Result<()> {
        self.store.delete(&session_key(experiment_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryKvStore;
    use crate::Error;

    fn log_with_run() -> ReadingLog {
        let mut log = ReadingLog::new();
        log.record(
            [("knownR", 10.0)].into_iter().collect(),
            [("balancePoint", 40.0)].into_iter().collect(),
        );
        log.save_as_run("Trial");
        log
    }

    #[tokio::test]
    async fn test_save_and_restore() {
        let archive = RunArchive::new(MemoryKvStore::new());
        let log = log_with_run();
        assert!(archive
            .save_log("meter-bridge", &ExperimentMeta::default(), &log)
            .await
            .unwrap());
        assert!(archive.store().exists("ps_session:meter-bridge").await.unwrap());

        let mut restored = ReadingLog::new();
        let count = archive.restore_into("meter-bridge", &mut restored).await.unwrap();
        assert_eq!(count, 1);
        assert_eq!(restored.runs()[0].label(), "Trial");
        assert_eq!(restored.runs()[0].readings(), log.runs()[0].readings());
    }

    #[tokio::test]
    async fn test_empty_log_not_archived() {
        let archive = RunArchive::new(MemoryKvStore::new());
        let saved = archive
            .save_log("x", &ExperimentMeta::default(), &ReadingLog::new())
            .await
            .unwrap();
        assert!(!saved);
        assert!(archive.load("x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_error() {
        let archive = RunArchive::new(MemoryKvStore::new());
        archive
            .store()
            .set(&session_key("bad"), b"not json".to_vec())
            .await
            .unwrap();
        let err = archive.load("bad").await.unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));

        archive.remove("bad").await.unwrap();
        assert!(archive.load("bad").await.unwrap().is_none());
    }
}
