//! services/store/src/adapters/validation.rs
//!
//! Input checks that run before any storage I/O.

use std::sync::OnceLock;

use grepbook_core::ports::{PortError, PortResult};
use regex::Regex;

// Local part per RFC 5322 "atext", domain made of dot-separated DNS labels.
const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern compiles"))
}

pub fn is_email(candidate: &str) -> bool {
    email_regex().is_match(candidate)
}

pub fn ensure_email(candidate: &str) -> PortResult<()> {
    if is_email(candidate) {
        Ok(())
    } else {
        Err(PortError::Validation(format!(
            "'{}' is not a valid email address",
            candidate
        )))
    }
}
