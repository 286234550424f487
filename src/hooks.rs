//! Callback seam between the workflow and whatever surface renders it.
//!
//! The workflow never touches a page or terminal directly; it reports every
//! user-visible event through this trait so the orchestration is testable
//! against a recording implementation.

use crate::intake::StagedFile;
use crate::notify::Notification;

/// Outcome of one submission attempt, delivered exactly once per `submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Upload and insert both succeeded; carries the public URL.
    Accepted { image_url: String },
    Rejected { message: String },
}

/// UI callbacks. All methods default to no-ops so consumers implement only
/// what they render.
pub trait UiHooks: Send + Sync {
    /// A file passed validation and was staged; `preview` is a data URL of
    /// the staged bytes, `info` the human-readable name/size label.
    fn on_file_staged(&self, file: &StagedFile, preview: &str, info: &str) {
        let _ = (file, preview, info);
    }

    /// The staged file was removed and the form reverted to the drop zone.
    fn on_file_removed(&self) {}

    /// Progress display update. `percent` is cosmetic below 100 (see
    /// workflow docs); `label` is the accompanying text.
    fn on_progress(&self, percent: u8, label: &str) {
        let _ = (percent, label);
    }

    /// A notification was posted to the single-slot banner.
    fn on_notification(&self, notification: &Notification) {
        let _ = notification;
    }

    /// Final outcome of a submission attempt.
    fn on_result(&self, outcome: &SubmitOutcome) {
        let _ = outcome;
    }
}

/// Hook implementation that renders nothing.
pub struct NoopHooks;

impl UiHooks for NoopHooks {}
