//! crates/grepbook_core/src/views.rs
//!
//! Ordering helpers for review collections.

use crate::domain::BookReview;

/// Sorts ascending by `created_at`. Ties keep their input order.
pub fn sort_chronologically(reviews: &mut [BookReview]) {
    reviews.sort_by(|a, b| a.created_at.cmp(&b.created_at));
}

/// Splits reviews into `(ongoing, completed)`, each newest first.
pub fn partition_by_status(reviews: Vec<BookReview>) -> (Vec<BookReview>, Vec<BookReview>) {
    let (mut ongoing, mut completed): (Vec<_>, Vec<_>) =
        reviews.into_iter().partition(|r| r.is_ongoing);
    ongoing.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    completed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    (ongoing, completed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(offset_secs: i64, ongoing: bool) -> BookReview {
        let base = Utc.with_ymd_and_hms(2016, 11, 5, 12, 0, 0).unwrap();
        BookReview {
            uid: offset_secs.to_string(),
            created_at: base + Duration::seconds(offset_secs),
            is_ongoing: ongoing,
            ..Default::default()
        }
    }

    #[test]
    fn partition_orders_newest_first() {
        let reviews = vec![at(0, true), at(30, false), at(10, true), at(20, false)];
        let (ongoing, completed) = partition_by_status(reviews);

        let uids = |v: &[BookReview]| v.iter().map(|r| r.uid.clone()).collect::<Vec<_>>();
        assert_eq!(uids(&ongoing), vec!["10", "0"]);
        assert_eq!(uids(&completed), vec!["30", "20"]);
    }

    proptest! {
        #[test]
        fn sort_is_ascending(offsets in proptest::collection::vec(-1000i64..1000, 0..40)) {
            let mut reviews: Vec<_> = offsets.iter().map(|o| at(*o, true)).collect();
            sort_chronologically(&mut reviews);
            for pair in reviews.windows(2) {
                prop_assert!(pair[0].created_at <= pair[1].created_at);
            }
            prop_assert_eq!(reviews.len(), offsets.len());
        }
    }
}
