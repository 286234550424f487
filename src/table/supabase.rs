use async_trait::async_trait;
use reqwest::Client;

use super::{SubmissionTable, TableError};
use crate::config::BackendConfig;
use crate::model::SubmissionRecord;

/// Hosted table backend, inserting rows through the REST data API.
pub struct SupabaseTable {
    endpoint: String,
    table: String,
    anon_key: String,
    client: Client,
}

impl SupabaseTable {
    pub fn new(config: &BackendConfig, client: Client) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            table: config.table.clone(),
            anon_key: config.anon_key.clone(),
            client,
        }
    }

    fn insert_url(&self) -> String {
        format!("{}/rest/v1/{}", self.endpoint, self.table)
    }
}

#[async_trait]
impl SubmissionTable for SupabaseTable {
    async fn insert(&self, record: &SubmissionRecord) -> Result<(), TableError> {
        // The data API takes a JSON array of rows even for a single insert.
        let body = serde_json::to_vec(&[record])?;

        let resp = self
            .client
            .post(self.insert_url())
            .bearer_auth(&self.anon_key)
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .header("Prefer", "return=minimal")
            .body(body)
            .send()
            .await
            .map_err(|e| TableError::Backend(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TableError::Backend(format!(
                "Row insert failed ({status}): {body}"
            )));
        }

        Ok(())
    }
}
