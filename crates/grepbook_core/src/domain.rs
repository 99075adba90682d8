//! crates/grepbook_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application, plus the
//! in-memory mutations on them (chapter list edits and delta merges).
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};

use crate::ids::new_uid;
use crate::ports::{PortError, PortResult};

//=========================================================================================
// Book Reviews and Chapters
//=========================================================================================

/// A single chapter embedded in its owning `BookReview`.
///
/// Chapters have no storage key of their own. The `id` is assigned once and
/// stays stable across reorders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chapter {
    pub id: String,
    pub heading: String,
    pub html: String,
    pub delta: String,
}

impl Chapter {
    /// Creates a chapter with a freshly generated id.
    pub fn new(heading: impl Into<String>, html: impl Into<String>, delta: impl Into<String>) -> Self {
        Self {
            id: new_uid(),
            heading: heading.into(),
            html: html.into(),
            delta: delta.into(),
        }
    }
}

/// Splits a comma separated list of headings into fresh chapters.
/// Headings are trimmed and blank entries are skipped.
pub fn create_chapters(input: &str) -> Vec<Chapter> {
    input
        .split(',')
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(|h| Chapter::new(h, "", ""))
        .collect()
}

/// A book review: overview plus an ordered list of chapters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookReview {
    /// Storage key. Empty until the first save.
    pub uid: String,
    pub title: String,
    pub author: String,
    pub source_url: String,
    pub overview_html: String,
    pub overview_delta: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_ongoing: bool,
    /// Order is significant: index 0 is shown first.
    pub chapters: Vec<Chapter>,
}

/// The caller-supplied fields for a brand new review.
#[derive(Debug, Clone, Default)]
pub struct NewBookReview {
    pub title: String,
    pub author: String,
    pub source_url: String,
    pub overview_html: String,
    pub overview_delta: String,
    pub chapters: Vec<Chapter>,
}

/// Partial update for a single chapter. Only `Some` fields are written,
/// and a `Some("")` does clear the field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterDelta {
    pub heading: Option<String>,
    pub html: Option<String>,
    pub delta: Option<String>,
}

/// Partial update for a review's scalar fields.
///
/// A text field is written only when it is `Some` and non-empty, so a field
/// can never be cleared through a delta once it holds a value. `is_ongoing`
/// is written whenever it is `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookReviewDelta {
    pub title: Option<String>,
    pub author: Option<String>,
    pub source_url: Option<String>,
    pub overview_html: Option<String>,
    pub overview_delta: Option<String>,
    pub is_ongoing: Option<bool>,
}

impl BookReviewDelta {
    /// Builds a delta from a full review payload sent by a client: empty
    /// strings count as absent, the flag is always present.
    pub fn from_review(review: &BookReview) -> Self {
        fn present(s: &str) -> Option<String> {
            (!s.is_empty()).then(|| s.to_string())
        }
        Self {
            title: present(&review.title),
            author: present(&review.author),
            source_url: present(&review.source_url),
            overview_html: present(&review.overview_html),
            overview_delta: present(&review.overview_delta),
            is_ongoing: Some(review.is_ongoing),
        }
    }
}

impl BookReview {
    /// A review is new when neither the overview nor any chapter has content.
    pub fn is_new(&self) -> bool {
        self.overview_html.trim().is_empty()
            && self.chapters.iter().all(|c| c.html.trim().is_empty())
    }

    /// Looks a chapter up by id, returning its current index.
    pub fn get_chapter(&self, id: &str) -> Option<(usize, &Chapter)> {
        self.chapters.iter().enumerate().find(|(_, c)| c.id == id)
    }

    /// Inserts `chapter` at the head of the list. Its id must be non-empty
    /// and not already used by another chapter of this review.
    pub fn prepend_chapter(&mut self, chapter: Chapter) -> PortResult<()> {
        if chapter.id.is_empty() {
            return Err(PortError::Validation("chapter id cannot be empty".to_string()));
        }
        if self.get_chapter(&chapter.id).is_some() {
            return Err(PortError::Validation(format!(
                "chapter {} already exists",
                chapter.id
            )));
        }
        self.chapters.insert(0, chapter);
        Ok(())
    }

    /// Applies `delta` to the chapter with the given id.
    pub fn apply_chapter_delta(&mut self, id: &str, delta: ChapterDelta) -> PortResult<()> {
        let chapter = self
            .chapters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| PortError::NotFound(format!("Chapter {} not found", id)))?;

        if let Some(heading) = delta.heading {
            chapter.heading = heading;
        }
        if let Some(html) = delta.html {
            chapter.html = html;
        }
        if let Some(d) = delta.delta {
            chapter.delta = d;
        }
        Ok(())
    }

    /// Moves the chapter at `old_index` so that it ends up at `new_index`.
    ///
    /// `new_index` is a position in the list after the chapter has been taken
    /// out. Both indices must be below the chapter count; the list is left
    /// untouched when either is not.
    pub fn move_chapter(&mut self, old_index: usize, new_index: usize) -> PortResult<()> {
        let len = self.chapters.len();
        if old_index >= len || new_index >= len {
            return Err(PortError::Validation(format!(
                "chapter indices ({}, {}) out of range for {} chapters",
                old_index, new_index, len
            )));
        }
        let chapter = self.chapters.remove(old_index);
        self.chapters.insert(new_index, chapter);
        Ok(())
    }

    /// Removes the chapter with the given id and returns it.
    pub fn remove_chapter(&mut self, id: &str) -> PortResult<Chapter> {
        let (index, _) = self
            .get_chapter(id)
            .ok_or_else(|| PortError::ChapterNotFound(id.to_string()))?;
        Ok(self.chapters.remove(index))
    }

    /// Merges a partial update into this review. See `BookReviewDelta`.
    pub fn merge_delta(&mut self, delta: &BookReviewDelta) {
        fn merge(target: &mut String, incoming: &Option<String>) {
            if let Some(value) = incoming {
                if !value.is_empty() {
                    target.clone_from(value);
                }
            }
        }
        merge(&mut self.title, &delta.title);
        merge(&mut self.author, &delta.author);
        merge(&mut self.source_url, &delta.source_url);
        merge(&mut self.overview_html, &delta.overview_html);
        merge(&mut self.overview_delta, &delta.overview_delta);
        if let Some(ongoing) = delta.is_ongoing {
            self.is_ongoing = ongoing;
        }
    }
}

/// Index pair for a reorder request, as received from a client.
///
/// `validate` applies the boundary policy: equal indices are rejected, as is
/// the case where both indices are zero or below. Negative indices are also
/// rejected. Bounds against the chapter count are checked later by
/// `BookReview::move_chapter`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReorderRequest {
    pub old_index: i64,
    pub new_index: i64,
}

impl ReorderRequest {
    pub fn validate(&self) -> PortResult<(usize, usize)> {
        let (old, new) = (self.old_index, self.new_index);
        if old == new || (old <= 0 && new <= 0) {
            return Err(PortError::Validation(
                "old index and new index cannot both be the same, or <= 0".to_string(),
            ));
        }
        let old = usize::try_from(old)
            .map_err(|_| PortError::Validation(format!("negative old index {}", old)))?;
        let new = usize::try_from(new)
            .map_err(|_| PortError::Validation(format!("negative new index {}", new)))?;
        Ok((old, new))
    }
}

//=========================================================================================
// Users and Sessions
//=========================================================================================

/// Represents a user - used throughout app. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// Only used internally for login/signup - contains sensitive data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserCredentials {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl UserCredentials {
    pub fn into_user(self) -> User {
        User {
            id: self.id,
            name: self.name,
            email: self.email,
        }
    }
}

/// Partial update for a user. Values are trimmed; blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDelta {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

/// Represents a browser login session. Holding `key` resolves to the user
/// registered under `email`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub key: String,
    pub email: String,
}
