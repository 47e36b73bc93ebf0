use std::sync::Mutex;

use anyhow::Result;

use super::{PriceSnapshot, RecordStore};

/// In-memory [`RecordStore`] used by tests and local dry runs.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<PriceSnapshot>>,
}

impl MemoryStore {
    /// Seeds a row directly, bypassing the repository's id assignment.
    pub fn push(&self, snapshot: PriceSnapshot) {
        self.rows.lock().unwrap().push(snapshot);
    }

    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryStore {
    async fn scan(&self) -> Result<Vec<PriceSnapshot>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn insert(&self, snapshot: &PriceSnapshot) -> Result<()> {
        self.rows.lock().unwrap().push(snapshot.clone());
        Ok(())
    }
}
