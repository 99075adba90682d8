//! crates/grepbook_core/src/ids.rs
//!
//! Short, URL-safe opaque identifiers.
//!
//! A random v4 UUID is rendered in base57 over an alphabet without look-alike
//! characters (no `0`, `O`, `1`, `I`, `l`), giving a fixed 22-character string.

use uuid::Uuid;

const ALPHABET: &[u8; 57] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// 57^22 > 2^128, so every UUID fits.
const ENCODED_LEN: usize = 22;

/// A new identifier for a book review or chapter.
pub fn new_uid() -> String {
    encode(Uuid::new_v4())
}

/// A new unguessable session token.
pub fn new_session_key() -> String {
    encode(Uuid::new_v4())
}

fn encode(id: Uuid) -> String {
    let base = ALPHABET.len() as u128;
    let mut n = id.as_u128();
    let mut digits = [0u8; ENCODED_LEN];
    for slot in digits.iter_mut().rev() {
        *slot = ALPHABET[(n % base) as usize];
        n /= base;
    }
    digits.iter().map(|&b| b as char).collect()
}
