//! Submission orchestration: staging, guards, upload, record insert.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::client::BackendClient;
use crate::config::Config;
use crate::hooks::{SubmitOutcome, UiHooks};
use crate::intake::{StagedFile, ValidationError};
use crate::ip::lookup_caller_ip;
use crate::model::{object_key, Category, SubmissionRecord, SubmissionStatus};
use crate::notify::Notifier;
use crate::object_store::ObjectStoreError;
use crate::table::TableError;

/// How often the cosmetic progress ticker advances, and by how much.
const TICK_INTERVAL: Duration = Duration::from_millis(200);
const TICK_STEP: u8 = 10;
/// The ticker holds here until the real upload call settles.
const TICK_CAP: u8 = 90;
/// Pause between "Upload complete!" and the final result callback.
const SUCCESS_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Backend not configured. Submission is unavailable.")]
    BackendUnavailable,
    #[error(transparent)]
    Store(#[from] ObjectStoreError),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Observable workflow state. `Success` and `Failed` are transient; the
/// workflow always lands back in `Idle` after a submission settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitState {
    Idle,
    Validating,
    Uploading,
    Success,
    Failed,
}

/// User-entered form fields accompanying the staged file.
#[derive(Debug, Clone, Default)]
pub struct SubmissionFields {
    pub title: String,
    pub category: Option<Category>,
    /// Blank (after trim) becomes "Anonymous".
    pub submitter_name: String,
}

/// What a successful submission hands back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    pub object_key: String,
    pub image_url: String,
}

/// One form's worth of submission state. All mutation happens through the
/// owning task; the hosted services are reached via the injected
/// [`BackendClient`], which must be attached before `submit` will pass its
/// guards.
pub struct SubmissionWorkflow {
    max_upload_size: u64,
    ip_lookup_url: String,
    backend: Option<Arc<BackendClient>>,
    staged: Option<StagedFile>,
    state: SubmitState,
    notifier: Notifier,
    hooks: Arc<dyn UiHooks>,
}

impl SubmissionWorkflow {
    pub fn new(config: &Config, hooks: Arc<dyn UiHooks>) -> Self {
        Self {
            max_upload_size: config.max_upload_size,
            ip_lookup_url: config.ip_lookup_url.clone(),
            backend: None,
            staged: None,
            state: SubmitState::Idle,
            notifier: Notifier::new(),
            hooks,
        }
    }

    /// Attach the backend handle. Until this is called the workflow is in
    /// its "not yet ready" state and refuses to submit.
    pub fn attach_backend(&mut self, backend: Arc<BackendClient>) {
        self.backend = Some(backend);
    }

    pub fn is_ready(&self) -> bool {
        self.backend.is_some()
    }

    pub fn state(&self) -> SubmitState {
        self.state
    }

    pub fn staged_file(&self) -> Option<&StagedFile> {
        self.staged.as_ref()
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    /// Validate and stage a candidate file, replacing any previous draft.
    /// Rejections notify the user and leave the previous draft untouched.
    pub fn stage_file(
        &mut self,
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: bytes::Bytes,
    ) -> Result<(), ValidationError> {
        match StagedFile::stage(name, media_type, data, self.max_upload_size) {
            Ok(file) => {
                let preview = file.preview_data_url();
                let info = file.info_label();
                self.hooks.on_file_staged(&file, &preview, &info);
                debug!(name = %file.name, size = file.byte_size, "Staged file");
                self.staged = Some(file);
                Ok(())
            }
            Err(e) => {
                self.notify_error(e.to_string());
                Err(e)
            }
        }
    }

    /// Discard the draft and revert to the drop-zone state.
    pub fn remove_file(&mut self) {
        self.staged = None;
        self.state = SubmitState::Idle;
        self.hooks.on_file_removed();
    }

    /// Run one submission attempt end to end.
    ///
    /// Guard failures (no file, missing fields, no backend) notify and stay
    /// in `Idle` with the draft intact. Once past the guards, any failure
    /// notifies, fires a `Rejected` result, and fully resets the form; an
    /// already-uploaded object is not rolled back when the row insert fails.
    pub async fn submit(
        &mut self,
        fields: SubmissionFields,
    ) -> Result<SubmissionReceipt, SubmitError> {
        self.state = SubmitState::Validating;

        let staged = match self.staged.clone() {
            Some(staged) => staged,
            None => return self.fail_guard(ValidationError::NoFile.into()),
        };

        let title = fields.title.trim().to_string();
        let category = match fields.category {
            Some(category) if !title.is_empty() => category,
            _ => return self.fail_guard(ValidationError::MissingFields.into()),
        };

        let backend = match self.backend.clone() {
            Some(backend) => backend,
            None => return self.fail_guard(SubmitError::BackendUnavailable),
        };

        let submitter_name = match fields.submitter_name.trim() {
            "" => "Anonymous".to_string(),
            name => name.to_string(),
        };

        self.state = SubmitState::Uploading;
        self.hooks.on_progress(0, "Uploading... 0%");

        let timestamp = chrono::Utc::now().timestamp_millis();
        let key = object_key(category, timestamp, &title, &staged.name);

        // Cosmetic ticker: the storage API exposes no transfer-progress
        // events for single-shot uploads, so this is indeterminate-progress
        // UI, not a real percentage. Cancelled as soon as the call settles.
        let ticker = {
            let hooks = Arc::clone(&self.hooks);
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(TICK_INTERVAL);
                interval.tick().await;
                let mut percent = 0u8;
                loop {
                    interval.tick().await;
                    percent += TICK_STEP;
                    if percent > TICK_CAP {
                        break;
                    }
                    hooks.on_progress(percent, &format!("Uploading... {percent}%"));
                }
            })
        };

        let uploaded = backend
            .store()
            .put_new(&key, staged.data.clone(), &staged.media_type)
            .await;
        ticker.abort();

        if let Err(e) = uploaded {
            warn!(key = %key, error = %e, "Upload failed");
            return self.fail_and_reset(e.into());
        }

        let image_url = backend.store().public_url(&key);

        let ip_address = lookup_caller_ip(backend.http(), &self.ip_lookup_url).await;

        let record = SubmissionRecord {
            title,
            category,
            submitter_name,
            image_url: image_url.clone(),
            file_name: key.clone(),
            file_size: staged.byte_size,
            status: SubmissionStatus::Pending,
            ip_address,
        };

        if let Err(e) = backend.table().insert(&record).await {
            // The uploaded object is orphaned here; no compensating delete.
            warn!(key = %key, error = %e, "Record insert failed after upload");
            return self.fail_and_reset(e.into());
        }

        debug!(key = %key, url = %image_url, "Submission recorded");

        self.state = SubmitState::Success;
        self.hooks.on_progress(100, "Upload complete!");
        tokio::time::sleep(SUCCESS_DELAY).await;

        self.hooks.on_result(&SubmitOutcome::Accepted {
            image_url: image_url.clone(),
        });
        self.reset();

        Ok(SubmissionReceipt {
            object_key: key,
            image_url,
        })
    }

    fn fail_guard<T>(&mut self, error: SubmitError) -> Result<T, SubmitError> {
        self.notify_error(error.to_string());
        self.state = SubmitState::Idle;
        Err(error)
    }

    fn fail_and_reset<T>(&mut self, error: SubmitError) -> Result<T, SubmitError> {
        self.state = SubmitState::Failed;
        self.notify_error(error.to_string());
        self.hooks.on_result(&SubmitOutcome::Rejected {
            message: error.to_string(),
        });
        self.reset();
        Err(error)
    }

    /// Clear the draft and return to `Idle`, re-enabling submission.
    fn reset(&mut self) {
        self.staged = None;
        self.state = SubmitState::Idle;
        self.hooks.on_file_removed();
    }

    fn notify_error(&mut self, message: String) {
        let notification = self.notifier.error(message);
        self.hooks.on_notification(&notification);
    }
}
