//! The single active back-office session: agency settings, the three entity
//! collections and the CV Studio document.
//!
//! Commands never hold the session lock across a store call. They read what
//! they need, await the store, and only then take the write lock to apply
//! the confirmed change.

use crate::database::{RecordStore, Table};
use crate::error::{Error, Result};
use crate::models::candidate::Candidate;
use crate::models::cv::CvDocument;
use crate::models::placement::Placement;
use crate::models::settings::AppSettings;
use crate::models::vacancy::Vacancy;
use crate::transform::{self, text};

pub const UNKNOWN_CANDIDATE: &str = "Unknown";

/// The document being edited and the candidate it belongs to, if any.
#[derive(Debug, Clone, Default)]
pub struct CvStudio {
    pub candidate_id: Option<String>,
    pub document: CvDocument,
    /// Bumped whenever the document is replaced, so late AI results can be recognised.
    pub generation: u64,
}

impl CvStudio {
    pub fn replace(&mut self, candidate_id: Option<String>, document: CvDocument) {
        self.candidate_id = candidate_id;
        self.document = document;
        self.generation += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub settings: AppSettings,
    /// Store identifier of the settings row; `None` when running on in-memory defaults.
    pub settings_id: Option<String>,
    pub candidates: Vec<Candidate>,
    pub vacancies: Vec<Vacancy>,
    pub placements: Vec<Placement>,
    pub studio: CvStudio,
    /// True once a bulk load from the current store has succeeded.
    pub loaded: bool,
    pub load_error: Option<String>,
}

/// Result of one bulk load, applied to the session in a single step.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub settings: AppSettings,
    pub settings_id: Option<String>,
    pub candidates: Vec<Candidate>,
    pub vacancies: Vec<Vacancy>,
    pub placements: Vec<Placement>,
}

impl Session {
    /// Reads all four collections concurrently. Any failure fails the whole
    /// load, reported with the name of the collection that failed.
    pub async fn load(store: &dyn RecordStore) -> Result<LoadedData> {
        let (candidates, vacancies, placements, settings) = tokio::try_join!(
            read_all(store, Table::Candidates, "Candidates"),
            read_all(store, Table::Vacancies, "Vacancies"),
            read_all(store, Table::Placements, "Placements"),
            read_settings(store),
        )?;

        let (settings, settings_id) = match settings {
            Some(record) => (transform::settings::from_record(&record), non_empty_id(&record)),
            None => provision_settings(store).await,
        };

        let data = LoadedData {
            settings,
            settings_id,
            candidates: candidates.iter().map(transform::candidate::from_record).collect(),
            vacancies: vacancies.iter().map(transform::vacancy::from_record).collect(),
            placements: placements.iter().map(transform::placement::from_record).collect(),
        };
        tracing::info!(
            candidates = data.candidates.len(),
            vacancies = data.vacancies.len(),
            placements = data.placements.len(),
            "Session data loaded"
        );
        Ok(data)
    }

    /// Replaces settings and collections wholesale; the CV Studio is left alone.
    pub fn apply_loaded(&mut self, data: LoadedData) {
        self.settings = data.settings;
        self.settings_id = data.settings_id;
        self.candidates = data.candidates;
        self.vacancies = data.vacancies;
        self.placements = data.placements;
        self.loaded = true;
        self.load_error = None;
    }

    /// Drops everything read from the previous store. The studio document is
    /// replaced rather than recreated so its generation keeps counting up.
    pub fn reset(&mut self) {
        let mut studio = std::mem::take(&mut self.studio);
        studio.replace(None, CvDocument::default());
        *self = Session {
            studio,
            ..Default::default()
        };
    }

    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn candidate_mut(&mut self, id: &str) -> Option<&mut Candidate> {
        self.candidates.iter_mut().find(|c| c.id == id)
    }

    pub fn vacancy(&self, id: &str) -> Option<&Vacancy> {
        self.vacancies.iter().find(|v| v.id == id)
    }

    pub fn placement_mut(&mut self, id: &str) -> Option<&mut Placement> {
        self.placements.iter_mut().find(|p| p.id == id)
    }

    pub fn candidate_name(&self, id: &str) -> &str {
        self.candidate(id)
            .map(|c| c.full_name.as_str())
            .unwrap_or(UNKNOWN_CANDIDATE)
    }
}

async fn read_all(
    store: &dyn RecordStore,
    table: Table,
    label: &str,
) -> Result<Vec<serde_json::Value>> {
    store.select_all(table).await.map_err(|e| prefixed(label, e))
}

async fn read_settings(store: &dyn RecordStore) -> Result<Option<serde_json::Value>> {
    store
        .select_one(Table::Settings)
        .await
        .map_err(|e| prefixed("Settings", e))
}

fn prefixed(label: &str, err: Error) -> Error {
    match err {
        Error::Store { status, message } => Error::Store {
            status,
            message: format!("{}: {}", label, message),
        },
        Error::NotConnected(message) => Error::NotConnected(format!("{}: {}", label, message)),
        other => Error::Internal(format!("{}: {}", label, other)),
    }
}

fn non_empty_id(record: &serde_json::Value) -> Option<String> {
    Some(text(record, &["id"])).filter(|id| !id.is_empty())
}

/// First run against an empty settings table: write the defaults. A failed
/// write is not fatal, the session runs on in-memory defaults instead.
async fn provision_settings(store: &dyn RecordStore) -> (AppSettings, Option<String>) {
    let defaults = AppSettings::default();
    match store
        .insert(Table::Settings, transform::settings::to_record(&defaults))
        .await
    {
        Ok(record) => {
            tracing::info!("Provisioned default agency settings");
            (transform::settings::from_record(&record), non_empty_id(&record))
        }
        Err(e) => {
            tracing::warn!("Could not provision default settings, using in-memory defaults: {}", e);
            (defaults, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use serde_json::json;

    #[test]
    fn load_prefixes_failing_collection() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store.reject_reads(Table::Vacancies).await;
            let err = Session::load(&store).await.unwrap_err();
            assert!(err.to_string().contains("Vacancies: "), "{}", err);
        });
    }

    #[test]
    fn load_provisions_missing_settings() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            let data = Session::load(&store).await.unwrap();
            assert_eq!(data.settings, AppSettings::default());
            assert!(data.settings_id.is_some());
            assert_eq!(store.rows(Table::Settings).await.len(), 1);
        });
    }

    #[test]
    fn failed_provision_falls_back_to_defaults() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store.reject_writes(Table::Settings).await;
            let data = Session::load(&store).await.unwrap();
            assert_eq!(data.settings, AppSettings::default());
            assert!(data.settings_id.is_none());
        });
    }

    #[test]
    fn apply_loaded_keeps_studio() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store
                .seed(Table::Candidates, json!({"id": "c1", "full_name": "Gita", "mobile": "98"}))
                .await;
            let mut session = Session::default();
            session.studio.replace(None, CvDocument {
                summary: "draft".into(),
                ..Default::default()
            });
            session.load_error = Some("earlier failure".into());

            session.apply_loaded(Session::load(&store).await.unwrap());

            assert_eq!(session.candidates.len(), 1);
            assert_eq!(session.candidate_name("c1"), "Gita");
            assert_eq!(session.studio.document.summary, "draft");
            assert!(session.load_error.is_none());
            assert!(session.loaded);
        });
    }

    #[test]
    fn reset_clears_data_but_advances_generation() {
        let mut session = Session::default();
        session.studio.replace(Some("c1".into()), CvDocument::default());
        session.candidates.push(crate::transform::candidate::from_record(
            &json!({"id": "c1", "full_name": "Gita"}),
        ));
        session.loaded = true;

        session.reset();

        assert!(session.candidates.is_empty());
        assert!(!session.loaded);
        assert_eq!(session.studio.candidate_id, None);
        assert_eq!(session.studio.generation, 2);
    }
}
