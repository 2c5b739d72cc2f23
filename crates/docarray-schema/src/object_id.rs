//! Object identifiers for sub-documents.
//!
//! Layout (12 bytes, rendered as 24 lowercase hex digits):
//! 4-byte big-endian seconds since the Unix epoch, 5 random bytes,
//! 3-byte big-endian counter seeded randomly per process.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

const OBJECT_ID_HEX_LEN: usize = 24;

fn counter() -> &'static AtomicU32 {
    static COUNTER: OnceLock<AtomicU32> = OnceLock::new();
    COUNTER.get_or_init(|| AtomicU32::new(rand::random::<u32>() & 0x00FF_FFFF))
}

/// Generate a fresh object id.
pub fn new_object_id() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as u32)
        .unwrap_or(0);
    let random: [u8; 5] = rand::random();
    let count = counter().fetch_add(1, Ordering::Relaxed) & 0x00FF_FFFF;

    let mut bytes = [0u8; 12];
    bytes[..4].copy_from_slice(&secs.to_be_bytes());
    bytes[4..9].copy_from_slice(&random);
    bytes[9..].copy_from_slice(&count.to_be_bytes()[1..]);

    let mut out = String::with_capacity(OBJECT_ID_HEX_LEN);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Check whether `s` is a 24 hex digit object id (either case).
pub fn is_object_id(s: &str) -> bool {
    s.len() == OBJECT_ID_HEX_LEN && s.bytes().all(|b| b.is_ascii_hexdigit())
}
