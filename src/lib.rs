//! wall-submit - Submission client for a wallpaper-sharing site
//!
//! This crate implements the full submit-a-wallpaper workflow with:
//! - Client-side validation (media-type allow-list, size ceiling)
//! - Upload to a hosted object-storage bucket with create-only keys
//! - One metadata row inserted into a hosted submissions table
//! - Progress/notification feedback through an injectable callback seam
//!
//! The backend handle is constructed explicitly and passed into the
//! workflow; the workflow refuses to submit until one is attached.

pub mod client;
pub mod config;
pub mod hooks;
pub mod intake;
pub mod ip;
pub mod model;
pub mod notify;
pub mod object_store;
pub mod table;
pub mod workflow;

pub use client::BackendClient;
pub use config::Config;
pub use workflow::{SubmissionFields, SubmissionReceipt, SubmissionWorkflow};
