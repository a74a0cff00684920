//! Process-local mapping store.

use crate::domain::entities::{Mapping, NewMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

/// In-memory implementation of [`MappingRepository`] using DashMap.
///
/// Reservation goes through the entry API, which holds the shard lock for the
/// duration of the check and the insert, so it is atomic within the process.
/// Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryMappingStore {
    storage: DashMap<String, Mapping>,
}

impl InMemoryMappingStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        debug!("Using in-memory mapping store");
        Self {
            storage: DashMap::new(),
        }
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingStore {
    async fn reserve(&self, new_mapping: &NewMapping) -> Result<bool, AppError> {
        match self.storage.entry(new_mapping.code.clone()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(new_mapping.clone().into_mapping());
                Ok(true)
            }
        }
    }

    async fn lookup(&self, code: &str) -> Result<Option<Mapping>, AppError> {
        Ok(self.storage.get(code).map(|entry| entry.value().clone()))
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
