//! Event store persisted as a JSON file.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::{EventPatch, EventStore, MemoryStore, NewEvent};
use crate::error::{HubCalError, HubCalResult};
use crate::event::BaseEvent;

/// Events kept in memory and written back to a JSON array after every change.
///
/// A missing file is an empty store; it is created on the first write.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: MemoryStore,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> HubCalResult<Self> {
        let path = path.into();

        let events: Vec<BaseEvent> = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    HubCalError::Store(format!("Could not read {}: {e}", path.display()))
                })?
            }
        } else {
            Vec::new()
        };

        debug!(path = %path.display(), events = events.len(), "Opened event store");

        Ok(JsonFileStore {
            path,
            inner: MemoryStore::with_events(events),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> HubCalResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self.inner.events())?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl EventStore for JsonFileStore {
    fn list(&self, owner_id: &str) -> HubCalResult<Vec<BaseEvent>> {
        self.inner.list(owner_id)
    }

    fn get(&self, id: &str) -> HubCalResult<BaseEvent> {
        self.inner.get(id)
    }

    fn create(&mut self, new: NewEvent) -> HubCalResult<BaseEvent> {
        let event = self.inner.create(new)?;
        self.save()?;
        Ok(event)
    }

    fn update(&mut self, id: &str, patch: EventPatch) -> HubCalResult<BaseEvent> {
        let event = self.inner.update(id, patch)?;
        self.save()?;
        Ok(event)
    }

    fn delete(&mut self, id: &str) -> HubCalResult<()> {
        self.inner.delete(id)?;
        self.save()
    }
}
