//! crates/grepbook_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the persistence layer.
//! These traits form the boundary of the hexagonal architecture: the web layer
//! calls through them, and the storage adapter implements them.
//!
//! All operations are synchronous. Each mutating call runs in its own
//! serializable transaction, but a read followed by a later save (chapter
//! edits, user updates) is not isolated: two writers working on the same
//! document race, and the last full-document save wins.

use chrono::{DateTime, Utc};

use crate::domain::{
    BookReview, BookReviewDelta, Chapter, ChapterDelta, NewBookReview, Session, User, UserDelta,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// The error taxonomy for all port operations. This layer only classifies;
/// callers decide how each kind is rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Chapter not found: {0}")]
    ChapterNotFound(String),
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Storage failure: {0}")]
    Storage(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Clock
//=========================================================================================

/// Source of UTC timestamps for `created_at`/`updated_at`.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

pub trait BookReviewService: Send + Sync {
    /// Stores a new review with a fresh uid, `created_at == updated_at == now`
    /// and `is_ongoing` set.
    fn create_book_review(&self, new: NewBookReview) -> PortResult<BookReview>;

    fn get_book_review(&self, uid: &str) -> PortResult<BookReview>;

    /// Deleting an absent uid succeeds.
    fn delete_book_review(&self, uid: &str) -> PortResult<()>;

    /// Every stored review, oldest `created_at` first.
    fn get_all_book_reviews(&self) -> PortResult<Vec<BookReview>>;

    /// Overwrites the stored document. An empty uid gets a fresh one and keeps
    /// its timestamps; otherwise `updated_at` is refreshed.
    fn save_book_review(&self, review: &mut BookReview) -> PortResult<()>;

    /// Prepends `chapter` and saves. Blank headings and ids already present in
    /// the review are rejected.
    fn add_chapter(&self, review: &mut BookReview, chapter: Chapter) -> PortResult<()> {
        if chapter.heading.trim().is_empty() {
            return Err(PortError::Validation("heading cannot be empty".to_string()));
        }
        review.prepend_chapter(chapter)?;
        self.save_book_review(review)
    }

    /// Applies the present fields of `delta` to chapter `id` and saves.
    fn update_chapter(&self, review: &mut BookReview, id: &str, delta: ChapterDelta) -> PortResult<()> {
        review.apply_chapter_delta(id, delta)?;
        self.save_book_review(review)
    }

    /// Moves a chapter (see `BookReview::move_chapter`) and saves.
    fn reorder_chapter(&self, review: &mut BookReview, old_index: usize, new_index: usize) -> PortResult<()> {
        review.move_chapter(old_index, new_index)?;
        self.save_book_review(review)
    }

    /// Removes chapter `id` and saves. An unknown id is `ChapterNotFound`.
    fn delete_chapter(&self, review: &mut BookReview, id: &str) -> PortResult<()> {
        review.remove_chapter(id)?;
        self.save_book_review(review)
    }

    /// Reads the stored review, merges `delta` into it and saves.
    fn update_book_review(&self, uid: &str, delta: &BookReviewDelta) -> PortResult<BookReview> {
        let mut review = self.get_book_review(uid)?;
        review.merge_delta(delta);
        self.save_book_review(&mut review)?;
        Ok(review)
    }
}

pub trait UserService: Send + Sync {
    fn create_user(&self, email: &str, password: &str) -> PortResult<User>;

    fn get_user(&self, email: &str) -> PortResult<User>;

    /// Changing the email moves the record to the new key.
    fn update_user(&self, email: &str, delta: UserDelta) -> PortResult<User>;

    /// `false` on any failure; never says which.
    fn is_password_correct(&self, email: &str, password: &str) -> bool;

    fn delete_user(&self, email: &str) -> PortResult<()>;

    fn does_any_user_exist(&self) -> bool;

    /// Name of the last user in key order, or empty.
    fn get_name(&self) -> PortResult<String>;
}

pub trait SessionService: Send + Sync {
    fn create_session_for_user(&self, email: &str) -> PortResult<Session>;

    /// Re-reads the live user on every call.
    fn get_user_by_session_key(&self, key: &str) -> PortResult<User>;

    fn delete_session(&self, key: &str) -> PortResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records saves in memory so the default chapter operations can be
    /// checked without a storage engine.
    #[derive(Default)]
    struct MemoryReviews {
        saved: Mutex<Vec<BookReview>>,
    }

    impl BookReviewService for MemoryReviews {
        fn create_book_review(&self, _new: NewBookReview) -> PortResult<BookReview> {
            unimplemented!()
        }

        fn get_book_review(&self, uid: &str) -> PortResult<BookReview> {
            self.saved
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|r| r.uid == uid)
                .cloned()
                .ok_or_else(|| PortError::NotFound(uid.to_string()))
        }

        fn delete_book_review(&self, _uid: &str) -> PortResult<()> {
            unimplemented!()
        }

        fn get_all_book_reviews(&self) -> PortResult<Vec<BookReview>> {
            unimplemented!()
        }

        fn save_book_review(&self, review: &mut BookReview) -> PortResult<()> {
            self.saved.lock().unwrap().push(review.clone());
            Ok(())
        }
    }

    fn review() -> BookReview {
        BookReview {
            uid: "r1".to_string(),
            title: "Old".to_string(),
            chapters: vec![Chapter::new("A", "", ""), Chapter::new("B", "", "")],
            ..Default::default()
        }
    }

    #[test]
    fn add_chapter_saves_prepended_list() {
        let store = MemoryReviews::default();
        let mut r = review();
        store.add_chapter(&mut r, Chapter::new("New", "", "")).unwrap();

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].chapters[0].heading, "New");
        assert_eq!(saved[0].chapters.len(), 3);
    }

    #[test]
    fn add_chapter_rejects_blank_heading() {
        let store = MemoryReviews::default();
        let mut r = review();
        let err = store.add_chapter(&mut r, Chapter::new("  ", "", "")).unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));
        assert_eq!(r.chapters.len(), 2);
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn add_chapter_rejects_duplicate_id() {
        let store = MemoryReviews::default();
        let mut r = review();
        let copy = r.chapters[0].clone();
        let err = store.add_chapter(&mut r, copy).unwrap_err();
        assert!(matches!(err, PortError::Validation(_)));
        assert_eq!(r.chapters.len(), 2);
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn failed_chapter_ops_do_not_save() {
        let store = MemoryReviews::default();
        let mut r = review();
        assert!(store.reorder_chapter(&mut r, 0, 2).is_err());
        assert!(matches!(
            store.delete_chapter(&mut r, "missing"),
            Err(PortError::ChapterNotFound(_))
        ));
        assert!(matches!(
            store.update_chapter(&mut r, "missing", ChapterDelta::default()),
            Err(PortError::NotFound(_))
        ));
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[test]
    fn update_book_review_merges_and_saves() {
        let store = MemoryReviews::default();
        store.save_book_review(&mut review()).unwrap();

        let delta = BookReviewDelta {
            title: Some("New".to_string()),
            author: Some(String::new()),
            ..Default::default()
        };
        let updated = store.update_book_review("r1", &delta).unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(store.get_book_review("r1").unwrap().title, "New");
    }
}
