//! Shared setup for the store integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use grepbook_core::domain::{create_chapters, BookReview, NewBookReview};
use grepbook_core::ports::{BookReviewService, Clock};
use store_lib::adapters::{DbAdapter, KvStore, PasswordHasher};
use store_lib::HashingConfig;
use tempfile::TempDir;

/// A clock that moves one second forward on every reading.
pub struct SteppingClock {
    base: DateTime<Utc>,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn new() -> Self {
        Self {
            base: Utc.with_ymd_and_hms(2016, 11, 5, 9, 0, 0).unwrap(),
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.base + Duration::seconds(tick)
    }
}

/// Argon2 parameters cheap enough for tests.
pub fn cheap_hashing() -> HashingConfig {
    HashingConfig {
        memory_kib: 8,
        iterations: 1,
        parallelism: 1,
    }
}

/// A fresh store in its own temporary directory. The directory lives as
/// long as the harness.
pub struct Harness {
    pub db: DbAdapter,
    pub dir: TempDir,
}

pub fn harness() -> Harness {
    let dir = TempDir::new().expect("create temp dir");
    let kv = KvStore::open(dir.path().join("test.redb")).expect("open store");
    let hasher = PasswordHasher::new(&cheap_hashing()).expect("hasher");
    let db = DbAdapter::new(kv, hasher).with_clock(Arc::new(SteppingClock::new()));
    Harness { db, dir }
}

pub fn create_test_book_review(db: &DbAdapter, chapters: &str) -> BookReview {
    db.create_book_review(NewBookReview {
        title: "Superintelligence".to_string(),
        author: "Nick Bostrom".to_string(),
        source_url: "https://www.amazon.com/Superintelligence-Dangers-Strategies-Nick-Bostrom/dp/1501227742"
            .to_string(),
        overview_html: String::new(),
        overview_delta: String::new(),
        chapters: create_chapters(chapters),
    })
    .expect("create book review")
}

pub fn headings(review: &BookReview) -> Vec<String> {
    review.chapters.iter().map(|c| c.heading.clone()).collect()
}
