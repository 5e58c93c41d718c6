use crate::{
    error::{LogoError, Result},
    models::HistoryEntry,
    storage::traits::KeyValueStore,
};
use std::sync::Arc;

pub const HISTORY_KEY: &str = "logo-history";
pub const HISTORY_LIMIT: usize = 20;

/// Bounded, newest-first list of past generations.
///
/// Loaded once when opened and flushed to the backend after every mutation.
pub struct HistoryStore {
    backend: Arc<dyn KeyValueStore>,
    entries: Vec<HistoryEntry>,
    last_fault: Option<LogoError>,
}

impl HistoryStore {
    pub fn open(backend: Arc<dyn KeyValueStore>) -> Self {
        let mut store = Self {
            backend,
            entries: Vec::new(),
            last_fault: None,
        };
        store.load();
        store
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Unreadable or corrupt data leaves the history empty. The fault is
    /// logged and kept in [`HistoryStore::last_fault`].
    pub fn load(&mut self) {
        self.last_fault = None;
        self.entries = match self.read_persisted() {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Discarding unreadable logo history: {}", e);
                self.last_fault = Some(e);
                Vec::new()
            }
        };

        if self.entries.len() > HISTORY_LIMIT {
            log::debug!(
                "Persisted history has {} entries, keeping the newest {}",
                self.entries.len(),
                HISTORY_LIMIT
            );
            self.entries.truncate(HISTORY_LIMIT);
        }
    }

    fn read_persisted(&self) -> Result<Vec<HistoryEntry>> {
        let raw = match self.backend.read(HISTORY_KEY)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(Vec::new()),
        };
        serde_json::from_str(&raw).map_err(|e| LogoError::MalformedPersistedState(e.to_string()))
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string(&self.entries)?;
        self.backend.write(HISTORY_KEY, &json)
    }

    pub fn append(&mut self, entry: HistoryEntry) -> Result<()> {
        log::debug!("Adding {} to history", entry.id);
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
        self.save()
    }

    /// Drop every entry. Asking the user first is the caller's job.
    pub fn clear(&mut self) -> Result<()> {
        log::info!("Clearing {} history entries", self.entries.len());
        self.entries.clear();
        self.backend.remove(HISTORY_KEY)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last_fault(&self) -> Option<&LogoError> {
        self.last_fault.as_ref()
    }
}
