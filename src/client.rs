use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::object_store::{ObjectStore, SupabaseStore};
use crate::table::{SubmissionTable, SupabaseTable};

/// Delay before the single reconnect attempt.
const RETRY_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Backend endpoint unreachable: {0}")]
    Unavailable(String),
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Handle to the hosted backend: object storage plus the submissions table,
/// sharing one HTTP client. Constructed explicitly and handed to the
/// workflow; there is no process-global slot.
pub struct BackendClient {
    store: Arc<dyn ObjectStore>,
    table: Arc<dyn SubmissionTable>,
    http: Client,
}

impl BackendClient {
    /// Connect to the hosted backend. The endpoint is probed once; if it
    /// does not answer, exactly one more attempt is made after a fixed
    /// 500 ms delay before giving up. No backoff beyond that.
    pub async fn connect(config: &Config) -> Result<Self, BackendError> {
        let http = Client::builder().build()?;

        let probe_url = format!(
            "{}/rest/v1/",
            config.backend.endpoint.trim_end_matches('/')
        );

        if let Err(first) = probe(&http, &probe_url, &config.backend.anon_key).await {
            warn!(error = %first, "Backend probe failed, retrying once");
            tokio::time::sleep(RETRY_DELAY).await;
            probe(&http, &probe_url, &config.backend.anon_key)
                .await
                .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        }

        info!(endpoint = %config.backend.endpoint, "Backend client ready");

        Ok(Self {
            store: Arc::new(SupabaseStore::new(&config.backend, http.clone())),
            table: Arc::new(SupabaseTable::new(&config.backend, http.clone())),
            http,
        })
    }

    /// Assemble a client from explicit parts, used by tests and embedders
    /// that bring their own backends.
    pub fn from_parts(
        store: Arc<dyn ObjectStore>,
        table: Arc<dyn SubmissionTable>,
        http: Client,
    ) -> Self {
        Self { store, table, http }
    }

    pub fn store(&self) -> &dyn ObjectStore {
        self.store.as_ref()
    }

    pub fn table(&self) -> &dyn SubmissionTable {
        self.table.as_ref()
    }

    pub fn http(&self) -> &Client {
        &self.http
    }
}

/// Any HTTP response counts as reachable; only transport failures do not.
async fn probe(client: &Client, url: &str, anon_key: &str) -> Result<(), reqwest::Error> {
    client
        .get(url)
        .header("apikey", anon_key)
        .timeout(Duration::from_secs(10))
        .send()
        .await?;
    Ok(())
}
