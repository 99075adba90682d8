mod common;

use common::harness;
use grepbook_core::domain::UserDelta;
use grepbook_core::ports::{PortError, SessionService, UserService};

const EMAIL: &str = "reader@example.com";

#[test]
fn session_resolves_to_its_user() {
    let h = harness();
    let user = h.db.create_user(EMAIL, "secret").unwrap();

    let session = h.db.create_session_for_user(EMAIL).unwrap();
    assert!(!session.key.is_empty());
    assert_eq!(session.email, EMAIL);
    assert_eq!(h.db.get_user_by_session_key(&session.key).unwrap(), user);
}

#[test]
fn each_login_gets_its_own_key() {
    let h = harness();
    h.db.create_user(EMAIL, "secret").unwrap();

    let a = h.db.create_session_for_user(EMAIL).unwrap();
    let b = h.db.create_session_for_user(EMAIL).unwrap();
    assert_ne!(a.key, b.key);
    assert_eq!(h.db.get_user_by_session_key(&a.key).unwrap().email, EMAIL);
    assert_eq!(h.db.get_user_by_session_key(&b.key).unwrap().email, EMAIL);
}

#[test]
fn invalid_email_is_rejected() {
    let h = harness();
    assert!(matches!(
        h.db.create_session_for_user("not an email"),
        Err(PortError::Validation(_))
    ));
}

#[test]
fn unknown_or_empty_key_is_not_found() {
    let h = harness();
    assert!(matches!(
        h.db.get_user_by_session_key(""),
        Err(PortError::NotFound(_))
    ));
    assert!(matches!(
        h.db.get_user_by_session_key("abc"),
        Err(PortError::NotFound(_))
    ));
}

#[test]
fn deleted_session_no_longer_resolves() {
    let h = harness();
    h.db.create_user(EMAIL, "secret").unwrap();
    let session = h.db.create_session_for_user(EMAIL).unwrap();

    h.db.delete_session(&session.key).unwrap();
    assert!(matches!(
        h.db.get_user_by_session_key(&session.key),
        Err(PortError::NotFound(_))
    ));
    h.db.delete_session(&session.key).unwrap();
}

#[test]
fn session_of_deleted_user_is_not_found() {
    let h = harness();
    h.db.create_user(EMAIL, "secret").unwrap();
    let session = h.db.create_session_for_user(EMAIL).unwrap();

    h.db.delete_user(EMAIL).unwrap();
    assert!(matches!(
        h.db.get_user_by_session_key(&session.key),
        Err(PortError::NotFound(_))
    ));
}

#[test]
fn session_follows_the_email_not_the_user() {
    let h = harness();
    h.db.create_user(EMAIL, "secret").unwrap();
    let session = h.db.create_session_for_user(EMAIL).unwrap();

    h.db.update_user(
        EMAIL,
        UserDelta {
            email: Some("moved@example.com".to_string()),
            ..UserDelta::default()
        },
    )
    .unwrap();
    assert!(matches!(
        h.db.get_user_by_session_key(&session.key),
        Err(PortError::NotFound(_))
    ));
}
