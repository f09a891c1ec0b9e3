//! This module persists the meeting list into a local key-value store
//!
//! The whole list is stored as a JSON array, in a single slot, and is rewritten on every change.
//! Storage never takes the dashboard down: a corrupt value is read as an empty list, and a store
//! that stops working turns the session into an in-memory one.

mod file_store;
pub use file_store::FileStore;
mod memory_store;
pub use memory_store::MemoryStore;

use crate::error::{Error, Result};
use crate::meeting::Meeting;
use crate::traits::KeyValueStore;

/// The slot meetings are stored in, unless configured otherwise
pub const DEFAULT_STORAGE_KEY: &str = "meetings";


/// Loads and saves the meeting list
pub struct MeetingStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
    in_memory_only: bool,
}

impl MeetingStore {
    pub fn new(backend: Box<dyn KeyValueStore>, key: &str) -> Self {
        Self {
            backend,
            key: key.to_string(),
            in_memory_only: false,
        }
    }

    /// A store that forgets everything when the session ends
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStore::new()), DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the backend has failed, and changes are no longer persisted
    pub fn is_in_memory_only(&self) -> bool {
        self.in_memory_only
    }

    /// Read the stored list.
    ///
    /// Nothing stored (or a stored `null`) is an empty list. A value that is not a list of
    /// meetings is a [`Error::StorageCorrupt`].
    pub fn try_load(&self) -> Result<Vec<Meeting>> {
        let raw = match self.backend.get(&self.key)? {
            None => return Ok(Vec::new()),
            Some(raw) => raw,
        };
        let meetings: Option<Vec<Meeting>> = serde_json::from_str(&raw)?;
        Ok(meetings.unwrap_or_default())
    }

    /// Read the stored list, falling back to an empty list on any error
    pub fn load(&mut self) -> Vec<Meeting> {
        match self.try_load() {
            Ok(meetings) => {
                log::debug!("Loaded {} meeting(s) from slot {:?}", meetings.len(), self.key);
                meetings
            },
            Err(err @ Error::StorageCorrupt(_)) => {
                log::warn!("{}. Starting with an empty meeting list", err);
                Vec::new()
            },
            Err(err) => {
                log::warn!("{}. Meetings will only be kept for this session", err);
                self.in_memory_only = true;
                Vec::new()
            },
        }
    }

    /// Replace the stored list with `meetings`
    pub fn try_save(&mut self, meetings: &[Meeting]) -> Result<()> {
        let serialized = serde_json::to_string(meetings)?;
        self.backend.set(&self.key, &serialized)
    }

    /// Replace the stored list with `meetings`.
    ///
    /// After the first failure, the session is in-memory only and nothing is written anymore.
    pub fn save(&mut self, meetings: &[Meeting]) {
        if self.in_memory_only {
            log::trace!("Not saving {} meeting(s): session is in-memory only", meetings.len());
            return;
        }

        if let Err(err) = self.try_save(meetings) {
            log::warn!("Unable to save meetings: {}. Further changes will only be kept for this session", err);
            self.in_memory_only = true;
        }
    }
}

impl std::fmt::Debug for MeetingStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeetingStore")
            .field("key", &self.key)
            .field("in_memory_only", &self.in_memory_only)
            .finish()
    }
}
