//! services/store/src/adapters/codec.rs
//!
//! JSON storage records for each bucket. Records are kept apart from the
//! domain types so the wire layout (field names, legacy aliases) stays in
//! one place. Every record tolerates missing and unknown fields.

use chrono::{DateTime, Utc};
use grepbook_core::domain::{BookReview, Chapter, Session, UserCredentials};
use serde::{Deserialize, Serialize};

//=========================================================================================
// "Impure" Storage Record Structs
//=========================================================================================

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct ChapterRecord {
    id: String,
    heading: String,
    html: String,
    delta: String,
}

impl ChapterRecord {
    fn to_domain(self) -> Chapter {
        Chapter {
            id: self.id,
            heading: self.heading,
            html: self.html,
            delta: self.delta,
        }
    }

    fn from_domain(chapter: &Chapter) -> Self {
        Self {
            id: chapter.id.clone(),
            heading: chapter.heading.clone(),
            html: chapter.html.clone(),
            delta: chapter.delta.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct BookReviewRecord {
    uid: String,
    title: String,
    book_author: String,
    book_url: String,
    html: String,
    delta: String,
    date_created: DateTime<Utc>,
    date_updated: DateTime<Utc>,
    is_ongoing: bool,
    /// Older rows may hold `null` here.
    chapters: Option<Vec<ChapterRecord>>,
}

impl BookReviewRecord {
    fn to_domain(self) -> BookReview {
        BookReview {
            uid: self.uid,
            title: self.title,
            author: self.book_author,
            source_url: self.book_url,
            overview_html: self.html,
            overview_delta: self.delta,
            created_at: self.date_created,
            updated_at: self.date_updated,
            is_ongoing: self.is_ongoing,
            chapters: self
                .chapters
                .unwrap_or_default()
                .into_iter()
                .map(ChapterRecord::to_domain)
                .collect(),
        }
    }

    fn from_domain(review: &BookReview) -> Self {
        Self {
            uid: review.uid.clone(),
            title: review.title.clone(),
            book_author: review.author.clone(),
            book_url: review.source_url.clone(),
            html: review.overview_html.clone(),
            delta: review.overview_delta.clone(),
            date_created: review.created_at,
            date_updated: review.updated_at,
            is_ongoing: review.is_ongoing,
            chapters: Some(review.chapters.iter().map(ChapterRecord::from_domain).collect()),
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct UserRecord {
    id: u64,
    /// Early rows stored the name under the key `string`.
    #[serde(alias = "string")]
    name: String,
    email: String,
    /// Argon2 PHC string. Never plaintext.
    password: String,
}

impl UserRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            name: self.name,
            email: self.email,
            password_hash: self.password,
        }
    }

    fn from_domain(user: &UserCredentials) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            password: user.password_hash.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
#[serde(default)]
struct SessionRecord {
    key: String,
    email: String,
}

impl SessionRecord {
    fn to_domain(self) -> Session {
        Session {
            key: self.key,
            email: self.email,
        }
    }

    fn from_domain(session: &Session) -> Self {
        Self {
            key: session.key.clone(),
            email: session.email.clone(),
        }
    }
}

//=========================================================================================
// Encode / Decode
//=========================================================================================

pub fn encode_book_review(review: &BookReview) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&BookReviewRecord::from_domain(review))
}

pub fn decode_book_review(bytes: &[u8]) -> serde_json::Result<BookReview> {
    serde_json::from_slice::<BookReviewRecord>(bytes).map(BookReviewRecord::to_domain)
}

pub fn encode_user(user: &UserCredentials) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&UserRecord::from_domain(user))
}

pub fn decode_user(bytes: &[u8]) -> serde_json::Result<UserCredentials> {
    serde_json::from_slice::<UserRecord>(bytes).map(UserRecord::to_domain)
}

pub fn encode_session(session: &Session) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&SessionRecord::from_domain(session))
}

pub fn decode_session(bytes: &[u8]) -> serde_json::Result<Session> {
    serde_json::from_slice::<SessionRecord>(bytes).map(SessionRecord::to_domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn review_uses_stored_field_names() {
        let created = Utc.with_ymd_and_hms(2016, 11, 5, 8, 30, 0).unwrap();
        let review = BookReview {
            uid: "abc".to_string(),
            title: "Superintelligence".to_string(),
            author: "Nick Bostrom".to_string(),
            source_url: "https://example.com/book".to_string(),
            overview_html: "<p>Hello</p>".to_string(),
            overview_delta: "{}".to_string(),
            created_at: created,
            updated_at: created,
            is_ongoing: true,
            chapters: vec![Chapter {
                id: "c1".to_string(),
                heading: "Intro".to_string(),
                ..Default::default()
            }],
        };

        let bytes = encode_book_review(&review).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["book_author"], "Nick Bostrom");
        assert_eq!(json["book_url"], "https://example.com/book");
        assert_eq!(json["html"], "<p>Hello</p>");
        assert_eq!(json["date_created"], "2016-11-05T08:30:00Z");
        assert_eq!(json["chapters"][0]["heading"], "Intro");

        assert_eq!(decode_book_review(&bytes).unwrap(), review);
    }

    #[test]
    fn missing_and_unknown_fields_decode_to_defaults() {
        let review = decode_book_review(br#"{"uid":"x","colour":"blue","chapters":null}"#).unwrap();
        assert_eq!(review.uid, "x");
        assert_eq!(review.title, "");
        assert!(!review.is_ongoing);
        assert!(review.chapters.is_empty());
        assert_eq!(review.created_at, DateTime::<Utc>::default());
    }

    #[test]
    fn go_zero_time_decodes() {
        let review =
            decode_book_review(br#"{"uid":"x","date_created":"0001-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(review.created_at.to_rfc3339(), "0001-01-01T00:00:00+00:00");
    }

    #[test]
    fn user_accepts_legacy_name_key() {
        let user = decode_user(br#"{"id":3,"string":"Cedric","email":"c@e.org","password":"h"}"#)
            .unwrap();
        assert_eq!(user.name, "Cedric");
        assert_eq!(user.password_hash, "h");

        let json: serde_json::Value = serde_json::from_slice(&encode_user(&user).unwrap()).unwrap();
        assert_eq!(json["name"], "Cedric");
    }

    #[test]
    fn session_decodes_partial_row() {
        let session = decode_session(br#"{"key":"k"}"#).unwrap();
        assert_eq!(session.key, "k");
        assert_eq!(session.email, "");
    }
}
