//! Search records and the download tasks derived from them.

use serde::{Deserialize, Serialize};

use crate::url_model;

/// One post as returned by the search API (`json=1`).
///
/// Every field defaults so partially populated records still parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub preview_url: String,
    pub sample_url: String,
    pub file_url: String,
    pub directory: i64,
    pub hash: String,
    pub height: u32,
    pub id: u64,
    pub image: String,
    pub change: i64,
    pub owner: String,
    pub parent_id: u64,
    pub rating: String,
    pub sample: i64,
    pub sample_height: u32,
    pub sample_width: u32,
    pub score: i64,
    pub tags: String,
    pub width: u32,
}

/// A single unit of download work. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Stable identifier (post id); also the destination file stem.
    pub id: u64,
    /// Address the payload is fetched from.
    pub file_url: String,
    /// Extension hint with leading dot (e.g. `".jpg"`), empty if unknown.
    pub ext: String,
}

impl Task {
    pub fn new(id: u64, file_url: impl Into<String>) -> Self {
        let file_url = file_url.into();
        let ext = url_model::extension_hint(&file_url);
        Self { id, file_url, ext }
    }

    /// Builds a task from a post; `None` if the post has no payload address.
    pub fn from_post(post: &Post) -> Option<Self> {
        let url = post.file_url.trim();
        if url.is_empty() {
            return None;
        }
        Some(Self::new(post.id, url))
    }

    /// Destination file name: `<id><ext>`.
    pub fn file_name(&self) -> String {
        url_model::file_name(self.id, &self.ext)
    }
}
