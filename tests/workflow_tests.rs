use std::sync::{Arc, Mutex};

use bytes::Bytes;

use wall_submit::client::BackendClient;
use wall_submit::config::Config;
use wall_submit::hooks::{SubmitOutcome, UiHooks};
use wall_submit::intake::StagedFile;
use wall_submit::model::Category;
use wall_submit::notify::{Notification, NotifyKind};
use wall_submit::object_store::LocalStore;
use wall_submit::table::MemoryTable;
use wall_submit::workflow::{SubmissionFields, SubmissionWorkflow, SubmitError, SubmitState};

// ============================================================================
// Helpers
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Staged(String),
    Removed,
    Progress(u8),
    Notified(NotifyKind, String),
    Result(SubmitOutcome),
}

#[derive(Default)]
struct RecordingHooks {
    events: Mutex<Vec<Event>>,
}

impl RecordingHooks {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn results(&self) -> Vec<SubmitOutcome> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Result(outcome) => Some(outcome),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl UiHooks for RecordingHooks {
    fn on_file_staged(&self, _file: &StagedFile, _preview: &str, info: &str) {
        self.push(Event::Staged(info.to_string()));
    }

    fn on_file_removed(&self) {
        self.push(Event::Removed);
    }

    fn on_progress(&self, percent: u8, _label: &str) {
        self.push(Event::Progress(percent));
    }

    fn on_notification(&self, notification: &Notification) {
        self.push(Event::Notified(
            notification.kind,
            notification.message.clone(),
        ));
    }

    fn on_result(&self, outcome: &SubmitOutcome) {
        self.push(Event::Result(outcome.clone()));
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    // Unroutable lookup endpoint: the IP field must degrade to "unknown"
    config.ip_lookup_url = "http://127.0.0.1:9/json".to_string();
    config
}

struct TestRig {
    workflow: SubmissionWorkflow,
    hooks: Arc<RecordingHooks>,
    table: Arc<MemoryTable>,
    store_dir: tempfile::TempDir,
}

fn test_rig() -> TestRig {
    let config = test_config();
    let store_dir = tempfile::tempdir().unwrap();
    let store = Arc::new(LocalStore::new(store_dir.path()).unwrap());
    let table = Arc::new(MemoryTable::new());
    let backend = Arc::new(BackendClient::from_parts(
        store,
        Arc::clone(&table) as Arc<_>,
        reqwest::Client::new(),
    ));

    let hooks = Arc::new(RecordingHooks::default());
    let mut workflow = SubmissionWorkflow::new(&config, Arc::clone(&hooks) as Arc<_>);
    workflow.attach_backend(backend);

    TestRig {
        workflow,
        hooks,
        table,
        store_dir,
    }
}

fn png(bytes: usize) -> Bytes {
    Bytes::from(vec![0u8; bytes])
}

fn fields(title: &str, category: Option<Category>) -> SubmissionFields {
    SubmissionFields {
        title: title.to_string(),
        category,
        submitter_name: String::new(),
    }
}

fn stored_objects(dir: &tempfile::TempDir) -> Vec<String> {
    let mut objects = Vec::new();
    for entry in walk(dir.path()) {
        objects.push(entry);
    }
    objects
}

fn walk(path: &std::path::Path) -> Vec<String> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(path).unwrap() {
        let entry = entry.unwrap();
        if entry.path().is_dir() {
            out.extend(walk(&entry.path()));
        } else {
            out.push(entry.path().display().to_string());
        }
    }
    out
}

// ============================================================================
// Staging
// ============================================================================

#[tokio::test]
async fn test_disallowed_type_is_rejected_with_notification() {
    let mut rig = test_rig();

    let result = rig
        .workflow
        .stage_file("anim.gif", "image/gif", png(10));
    assert!(result.is_err());
    assert!(rig.workflow.staged_file().is_none());

    let current = rig.workflow.notifier_mut().current().unwrap().clone();
    assert_eq!(current.kind, NotifyKind::Error);
    assert_eq!(current.message, "Please upload a JPG, PNG, or WEBP image.");
}

#[tokio::test]
async fn test_oversized_file_is_rejected() {
    let config = test_config();
    let hooks = Arc::new(RecordingHooks::default());
    let mut workflow = SubmissionWorkflow::new(&config, Arc::clone(&hooks) as Arc<_>);

    let too_big = png(50 * 1024 * 1024 + 1);
    let result = workflow.stage_file("huge.png", "image/png", too_big);
    assert!(result.is_err());
    assert!(workflow.staged_file().is_none());

    let current = workflow.notifier_mut().current().unwrap().clone();
    assert_eq!(current.message, "File size must be 50MB or less.");
}

#[tokio::test]
async fn test_staging_fires_hook_with_info_label() {
    let mut rig = test_rig();

    rig.workflow
        .stage_file("sunset.png", "image/png", png(2048))
        .unwrap();

    assert_eq!(
        rig.hooks.events(),
        vec![Event::Staged("sunset.png \u{2022} 2.0 KB".to_string())]
    );
}

#[tokio::test]
async fn test_remove_file_reverts_to_drop_zone() {
    let mut rig = test_rig();

    rig.workflow
        .stage_file("sunset.png", "image/png", png(16))
        .unwrap();
    rig.workflow.remove_file();

    assert!(rig.workflow.staged_file().is_none());
    assert_eq!(rig.workflow.state(), SubmitState::Idle);
    assert!(rig.hooks.events().contains(&Event::Removed));
}

// ============================================================================
// Guards
// ============================================================================

#[tokio::test]
async fn test_submit_without_file_stays_idle() {
    let mut rig = test_rig();

    let result = rig
        .workflow
        .submit(fields("Sunset", Some(Category::Nature)))
        .await;

    assert!(matches!(result, Err(SubmitError::Validation(_))));
    assert_eq!(rig.workflow.state(), SubmitState::Idle);
    assert!(stored_objects(&rig.store_dir).is_empty());
    assert!(rig.table.rows().is_empty());
}

#[tokio::test]
async fn test_empty_title_never_reaches_the_store() {
    let mut rig = test_rig();
    rig.workflow
        .stage_file("sunset.png", "image/png", png(16))
        .unwrap();

    let result = rig
        .workflow
        .submit(fields("   ", Some(Category::Nature)))
        .await;

    assert!(matches!(result, Err(SubmitError::Validation(_))));
    assert!(stored_objects(&rig.store_dir).is_empty());
    // Draft survives a guard failure so the user can fix the fields
    assert!(rig.workflow.staged_file().is_some());
}

#[tokio::test]
async fn test_missing_category_never_reaches_the_store() {
    let mut rig = test_rig();
    rig.workflow
        .stage_file("sunset.png", "image/png", png(16))
        .unwrap();

    let result = rig.workflow.submit(fields("Sunset", None)).await;

    assert!(matches!(result, Err(SubmitError::Validation(_))));
    assert!(stored_objects(&rig.store_dir).is_empty());
    assert!(rig.table.rows().is_empty());
}

#[tokio::test]
async fn test_submit_without_backend_reports_unavailable() {
    let config = test_config();
    let hooks = Arc::new(RecordingHooks::default());
    let mut workflow = SubmissionWorkflow::new(&config, Arc::clone(&hooks) as Arc<_>);
    workflow
        .stage_file("sunset.png", "image/png", png(16))
        .unwrap();

    assert!(!workflow.is_ready());
    let result = workflow
        .submit(fields("Sunset", Some(Category::Nature)))
        .await;

    assert!(matches!(result, Err(SubmitError::BackendUnavailable)));
    assert_eq!(workflow.state(), SubmitState::Idle);
}

// ============================================================================
// Submission outcomes
// ============================================================================

#[tokio::test]
async fn test_successful_submission_ends_idle_with_one_acceptance() {
    let mut rig = test_rig();
    rig.workflow
        .stage_file("IMG_0042.PNG", "image/png", png(1024))
        .unwrap();

    let receipt = rig
        .workflow
        .submit(fields("Sunset Peak!!", Some(Category::Nature)))
        .await
        .unwrap();

    // Key: {category}/{timestamp}-{slug}.{ext}
    assert!(receipt.object_key.starts_with("nature/"));
    assert!(receipt.object_key.ends_with("-sunset-peak.png"));
    assert!(receipt.image_url.ends_with(&receipt.object_key));

    // Form fully reset
    assert_eq!(rig.workflow.state(), SubmitState::Idle);
    assert!(rig.workflow.staged_file().is_none());

    // Exactly one acceptance
    let results = rig.hooks.results();
    assert_eq!(results.len(), 1);
    assert_eq!(
        results[0],
        SubmitOutcome::Accepted {
            image_url: receipt.image_url.clone()
        }
    );

    // Progress reached completion
    assert!(rig.hooks.events().contains(&Event::Progress(100)));

    // One row, with the degraded IP and defaulted submitter
    let rows = rig.table.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Sunset Peak!!");
    assert_eq!(rows[0].submitter_name, "Anonymous");
    assert_eq!(rows[0].ip_address, "unknown");
    assert_eq!(rows[0].file_name, receipt.object_key);
    assert_eq!(rows[0].file_size, 1024);
    assert_eq!(rows[0].image_url, receipt.image_url);
}

#[tokio::test]
async fn test_submitter_name_is_trimmed_not_defaulted_when_present() {
    let mut rig = test_rig();
    rig.workflow
        .stage_file("city.jpg", "image/jpeg", png(64))
        .unwrap();

    rig.workflow
        .submit(SubmissionFields {
            title: "Neon Alley".to_string(),
            category: Some(Category::City),
            submitter_name: "  ada  ".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(rig.table.rows()[0].submitter_name, "ada");
}

#[tokio::test]
async fn test_insert_failure_resets_and_orphans_the_object() {
    let mut rig = test_rig();
    rig.workflow
        .stage_file("sunset.png", "image/png", png(64))
        .unwrap();
    rig.table.fail_next_insert();

    let result = rig
        .workflow
        .submit(fields("Sunset", Some(Category::Nature)))
        .await;

    assert!(matches!(result, Err(SubmitError::Table(_))));

    // Full reset so the user can retry from a clean state
    assert_eq!(rig.workflow.state(), SubmitState::Idle);
    assert!(rig.workflow.staged_file().is_none());

    // The uploaded object stays behind, unreferenced: no row points at it
    assert_eq!(stored_objects(&rig.store_dir).len(), 1);
    assert!(rig.table.rows().is_empty());

    // Error notification plus exactly one rejection
    let current = rig.workflow.notifier_mut().current().unwrap().clone();
    assert_eq!(current.kind, NotifyKind::Error);
    let results = rig.hooks.results();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], SubmitOutcome::Rejected { .. }));
}

#[tokio::test]
async fn test_second_notification_replaces_the_first() {
    let mut rig = test_rig();

    // Two guard failures in a row: only the latest notification is visible
    let _ = rig.workflow.stage_file("a.gif", "image/gif", png(4));
    let _ = rig
        .workflow
        .submit(fields("Sunset", Some(Category::Nature)))
        .await;

    let current = rig.workflow.notifier_mut().current().unwrap().clone();
    assert_eq!(current.message, "Please select an image to upload.");

    let notified: Vec<_> = rig
        .hooks
        .events()
        .into_iter()
        .filter(|e| matches!(e, Event::Notified(..)))
        .collect();
    assert_eq!(notified.len(), 2);
}
