//! services/store/src/adapters/book_reviews.rs
//!
//! `BookReviewService` over the `book_reviews` bucket. Each review is stored
//! whole, chapters included, under its uid. The chapter operations use the
//! port's default methods and land here through `save_book_review`.

use grepbook_core::domain::{BookReview, NewBookReview};
use grepbook_core::ids::new_uid;
use grepbook_core::ports::{BookReviewService, PortError, PortResult};
use grepbook_core::views::sort_chronologically;
use tracing::{debug, info};

use crate::adapters::codec::{decode_book_review, encode_book_review};
use crate::adapters::db::DbAdapter;
use crate::adapters::kv::{Buckets, KvError};

impl BookReviewService for DbAdapter {
    fn create_book_review(&self, new: NewBookReview) -> PortResult<BookReview> {
        let now = self.clock.now();
        let mut review = BookReview {
            uid: String::new(),
            title: new.title,
            author: new.author,
            source_url: new.source_url,
            overview_html: new.overview_html,
            overview_delta: new.overview_delta,
            created_at: now,
            updated_at: now,
            is_ongoing: true,
            chapters: new.chapters,
        };

        // An empty uid takes the first-save path, which leaves the timestamps alone.
        self.save_book_review(&mut review)?;
        info!("Created book review {}", review.uid);
        Ok(review)
    }

    fn get_book_review(&self, uid: &str) -> PortResult<BookReview> {
        let bytes = self
            .kv
            .get(Buckets::BOOK_REVIEWS, uid)?
            .ok_or_else(|| PortError::NotFound(format!("Book review {} not found", uid)))?;
        Ok(decode_book_review(&bytes).map_err(KvError::from)?)
    }

    fn delete_book_review(&self, uid: &str) -> PortResult<()> {
        self.kv.delete(Buckets::BOOK_REVIEWS, uid)?;
        debug!("Deleted book review {}", uid);
        Ok(())
    }

    fn get_all_book_reviews(&self) -> PortResult<Vec<BookReview>> {
        let rows = self.kv.scan(Buckets::BOOK_REVIEWS)?;
        let mut reviews = rows
            .iter()
            .map(|(_, value)| decode_book_review(value))
            .collect::<Result<Vec<_>, _>>()
            .map_err(KvError::from)?;
        sort_chronologically(&mut reviews);
        Ok(reviews)
    }

    fn save_book_review(&self, review: &mut BookReview) -> PortResult<()> {
        if review.uid.is_empty() {
            review.uid = new_uid();
        } else {
            review.updated_at = self.clock.now();
        }

        let bytes = encode_book_review(review).map_err(KvError::from)?;
        self.kv.put(Buckets::BOOK_REVIEWS, &review.uid, &bytes)?;
        debug!(
            uid = %review.uid,
            chapters = review.chapters.len(),
            "Saved book review"
        );
        Ok(())
    }
}
