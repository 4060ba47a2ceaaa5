// src/core/latin1.rs
//
// The store files are ISO-8859-1: one byte per char, U+0000..=U+00FF.
// encoding_rs' WHATWG "latin1" label is windows-1252, so the exact mapping
// comes from its `mem` helpers instead of an `Encoding`.

use std::borrow::Cow;

use encoding_rs::mem;

/// Every byte sequence is valid Latin-1.
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    mem::decode_latin1(bytes)
}

/// `None` if `s` holds a char above U+00FF.
pub fn encode(s: &str) -> Option<Cow<'_, [u8]>> {
    if mem::is_str_latin1(s) {
        Some(mem::encode_latin1_lossy(s))
    } else {
        None
    }
}
