mod local;
mod supabase;

pub use local::LocalStore;
pub use supabase::SupabaseStore;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Object already exists: {0}")]
    AlreadyExists(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Abstraction over the hosted wallpaper bucket.
///
/// Keys carry meaning here (`{category}/{timestamp}-{slug}.{ext}`), so writes
/// are create-only: a key collision is an error, never a silent replace.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload `data` under `key`, failing with `AlreadyExists` if the key is
    /// taken.
    async fn put_new(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError>;

    async fn exists(&self, key: &str) -> Result<bool, ObjectStoreError>;

    /// Public retrieval URL for `key`. Derived locally, no network round trip.
    fn public_url(&self, key: &str) -> String;
}
