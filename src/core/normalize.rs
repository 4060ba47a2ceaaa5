// src/core/normalize.rs
//
// Lookup keys for team names. Every key that can reach the durable stores
// must survive a round trip through both UTF-8 and ISO-8859-1, so characters
// outside Latin-1 are swapped for a placeholder instead of being rejected.

use crate::config::consts::{ NBSP, PLACEHOLDER, STRIPPED };

/// Full normalization: drop NBSP and `' " ,`, uppercase, trim, then force
/// the result into the Latin-1 range one character at a time.
///
/// Idempotent: `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != NBSP && !STRIPPED.contains(c))
        .collect();
    let upper = cleaned.to_uppercase();
    force_encodable(upper.trim())
}

/// `normalize`, with an empty result treated as "no name".
pub fn normalize_key(raw: &str) -> Option<String> {
    let key = normalize(raw);
    if key.is_empty() { None } else { Some(key) }
}

/// Canonical display names keep case and spacing; only `' " ,` go.
pub fn sanitize_canonical(name: &str) -> String {
    name.chars().filter(|c| !STRIPPED.contains(c)).collect()
}

/// True if every char is representable in UTF-8 and ISO-8859-1 alike.
/// A Rust `str` is always valid UTF-8, so this reduces to the Latin-1 check.
pub fn is_encodable(s: &str) -> bool {
    encoding_rs::mem::is_str_latin1(s)
}

#[inline]
fn char_encodable(c: char) -> bool {
    is_encodable(c.encode_utf8(&mut [0; 4]))
}

/// Replace each unencodable char with the placeholder; others are untouched.
pub fn force_encodable(s: &str) -> String {
    if is_encodable(s) {
        return s.to_owned();
    }
    s.chars()
        .map(|c| if char_encodable(c) { c } else { PLACEHOLDER })
        .collect()
}
