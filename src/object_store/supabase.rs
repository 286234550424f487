use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;

use super::{ObjectStore, ObjectStoreError};
use crate::config::BackendConfig;

/// Hosted storage backend, speaking the storage REST API of the backend
/// platform. Authenticated with the public anon key; write restrictions are
/// enforced server-side.
pub struct SupabaseStore {
    endpoint: String,
    bucket: String,
    anon_key: String,
    client: Client,
}

impl SupabaseStore {
    pub fn new(config: &BackendConfig, client: Client) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            anon_key: config.anon_key.clone(),
            client,
        }
    }

    fn upload_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.endpoint,
            encode_segment(&self.bucket),
            encode_key(key)
        )
    }

    fn object_info_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/info/public/{}/{}",
            self.endpoint,
            encode_segment(&self.bucket),
            encode_key(key)
        )
    }
}

#[async_trait]
impl ObjectStore for SupabaseStore {
    async fn put_new(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        let resp = self
            .client
            .post(self.upload_url(key))
            .bearer_auth(&self.anon_key)
            .header("apikey", &self.anon_key)
            .header("Content-Type", content_type)
            .header("cache-control", "3600")
            // Create-only: the server rejects an existing key instead of
            // replacing it.
            .header("x-upsert", "false")
            .body(data)
            .send()
            .await
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::CONFLICT {
            return Err(ObjectStoreError::AlreadyExists(key.to_string()));
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ObjectStoreError::Backend(format!(
                "Storage upload failed ({status}): {body}"
            )));
        }

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, ObjectStoreError> {
        let resp = self
            .client
            .get(self.object_info_url(key))
            .bearer_auth(&self.anon_key)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| ObjectStoreError::Backend(e.to_string()))?;

        Ok(resp.status().is_success())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.endpoint,
            encode_segment(&self.bucket),
            encode_key(key)
        )
    }
}

/// Percent-encode one path segment (bucket names may contain spaces).
fn encode_segment(segment: &str) -> String {
    segment
        .bytes()
        .map(|b| match b {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// Encode an object key, preserving the `/` separators between segments.
fn encode_key(key: &str) -> String {
    key.split('/').map(encode_segment).collect::<Vec<_>>().join("/")
}
