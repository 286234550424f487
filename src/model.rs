use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed category set offered by the submission form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Abstract,
    Anime,
    Cars,
    City,
    Games,
    Minimal,
    Nature,
    Space,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Abstract,
        Category::Anime,
        Category::Cars,
        Category::City,
        Category::Games,
        Category::Minimal,
        Category::Nature,
        Category::Space,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Abstract => "abstract",
            Category::Anime => "anime",
            Category::Cars => "cars",
            Category::City => "city",
            Category::Games => "games",
            Category::Minimal => "minimal",
            Category::Nature => "nature",
            Category::Space => "space",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s.to_lowercase())
            .copied()
            .ok_or_else(|| format!("unknown category '{s}'"))
    }
}

/// Submission status as stored in the hosted table. The client only ever
/// creates rows as `pending`; moderation transitions happen server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
}

/// One row in the hosted submissions table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub title: String,
    pub category: Category,
    pub submitter_name: String,
    pub image_url: String,
    /// Object key of the uploaded file within the storage bucket
    pub file_name: String,
    pub file_size: u64,
    pub status: SubmissionStatus,
    /// Best-effort caller address; "unknown" when the lookup failed
    pub ip_address: String,
}

/// Lowercase a title and collapse every non-alphanumeric run into a single
/// separator, trimming separators from both ends.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_sep = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// Derive the object key for an upload: `{category}/{timestamp}-{slug}.{ext}`.
///
/// Uniqueness is probabilistic only (millisecond timestamp plus title slug);
/// a collision surfaces as an upload error rather than being resolved here.
pub fn object_key(category: Category, timestamp_ms: i64, title: &str, original_name: &str) -> String {
    let extension = original_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    format!("{category}/{timestamp_ms}-{}.{extension}", slugify(title))
}
