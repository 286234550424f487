mod memory;
mod supabase;

pub use memory::MemoryTable;
pub use supabase::SupabaseTable;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::SubmissionRecord;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Append-only view of the hosted submissions table. The client never reads,
/// updates or deletes rows; moderation happens server-side.
#[async_trait]
pub trait SubmissionTable: Send + Sync {
    async fn insert(&self, record: &SubmissionRecord) -> Result<(), TableError>;
}
