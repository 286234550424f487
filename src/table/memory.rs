use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{SubmissionTable, TableError};
use crate::model::SubmissionRecord;

/// In-process table for tests: records land in a Vec, and the next insert
/// can be armed to fail to exercise the insert-failure path.
#[derive(Default)]
pub struct MemoryTable {
    rows: Mutex<Vec<SubmissionRecord>>,
    fail_next: AtomicBool,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next insert return a backend error.
    pub fn fail_next_insert(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Vec<SubmissionRecord> {
        self.rows.lock().expect("rows lock poisoned").clone()
    }
}

#[async_trait]
impl SubmissionTable for MemoryTable {
    async fn insert(&self, record: &SubmissionRecord) -> Result<(), TableError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(TableError::Backend("simulated insert failure".to_string()));
        }
        self.rows
            .lock()
            .expect("rows lock poisoned")
            .push(record.clone());
        Ok(())
    }
}
