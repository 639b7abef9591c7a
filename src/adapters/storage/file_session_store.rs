//! File-based Session Store Adapter
//!
//! Stores each session as `<base_path>/<session_id>.yaml`. Writes go to a
//! temporary file first and are then renamed into place.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::SessionId;
use crate::domain::interview::InterviewSession;
use crate::ports::{SessionStore, SessionStoreError};

/// File-based storage for interview sessions
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    /// Create a new file store rooted at `base_path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileSessionStore::new("./data/interviews");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn session_path(&self, id: SessionId) -> PathBuf {
        self.base_path.join(format!("{}.yaml", id))
    }

    fn temp_path(&self, id: SessionId) -> PathBuf {
        self.base_path.join(format!(".{}.yaml.tmp", id))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn save(&self, session: &InterviewSession) -> Result<(), SessionStoreError> {
        fs::create_dir_all(&self.base_path)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;

        let yaml = serde_yaml::to_string(session)
            .map_err(|e| SessionStoreError::SerializationFailed(e.to_string()))?;

        let temp = self.temp_path(session.id);
        fs::write(&temp, yaml)
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;
        fs::rename(&temp, self.session_path(session.id))
            .await
            .map_err(|e| SessionStoreError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn load(&self, id: SessionId) -> Result<Option<InterviewSession>, SessionStoreError> {
        let yaml = match fs::read_to_string(self.session_path(id)).await {
            Ok(yaml) => yaml,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionStoreError::IoError(e.to_string())),
        };

        let session = serde_yaml::from_str(&yaml)
            .map_err(|e| SessionStoreError::DeserializationFailed(e.to_string()))?;

        Ok(Some(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Score, UserId};
    use crate::domain::interview::{
        CandidateFacts, Competency, CompetencyEvidence, InterviewSettings, ModuleKind,
        ModuleUpdate,
    };
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn populated_session() -> InterviewSession {
        let mut session =
            InterviewSession::new(UserId::new("user-1").unwrap(), InterviewSettings::default(), 6);
        session.record_assistant_message("Welcome!");
        session.record_user_message("Hi, I'm Dana").unwrap();
        session.record_focus(ModuleKind::Profile);
        session.apply_update(&ModuleUpdate::Profile(CandidateFacts {
            name: Some("Dana".to_string()),
            skills: vec!["Rust".to_string()],
            ..Default::default()
        }));
        session.apply_update(&ModuleUpdate::Competency(CompetencyEvidence {
            scores: BTreeMap::from([(Competency::Communication, Score::from(4))]),
        }));
        session.record_extraction_failure(ModuleKind::Personality);
        session
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        let session = populated_session();

        store.save(&session).await.unwrap();
        let loaded = store.load(session.id).await.unwrap().unwrap();

        assert_eq!(loaded, session);
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path().join("nested").join("interviews"));
        let session = populated_session();

        store.save(&session).await.unwrap();
        assert!(dir
            .path()
            .join("nested/interviews")
            .join(format!("{}.yaml", session.id))
            .exists());
    }

    #[tokio::test]
    async fn load_missing_session_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());

        assert!(store.load(SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_file_is_deserialization_error() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(dir.path());
        let id = SessionId::new();
        std::fs::write(dir.path().join(format!("{}.yaml", id)), "::: not yaml").unwrap();

        assert!(matches!(
            store.load(id).await,
            Err(SessionStoreError::DeserializationFailed(_))
        ));
    }
}
