pub mod book_reviews;
pub mod codec;
pub mod db;
pub mod kv;
pub mod password;
pub mod sessions;
pub mod users;
pub mod validation;

pub use db::DbAdapter;
pub use kv::{Buckets, KvError, KvStore};
pub use password::PasswordHasher;
