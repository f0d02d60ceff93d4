//! Identifier generation for records, pages, and bookmarks.

use rand::Rng;

/// Number of random bytes in a generated identifier (20 hex characters).
const ID_BYTES: usize = 10;

/// Prefix used for generated bookmark and bookmark-group identifiers.
pub const BOOKMARK_PREFIX: &str = "Bookmark";

/// Prefix used for generated page identifiers.
pub const PAGE_PREFIX: &str = "ReportSection";

/// Generate a fresh identifier: `prefix` followed by 20 lowercase hex chars.
///
/// Visual identifiers use an empty prefix; bookmarks and pages carry the
/// prefixes the document format expects.
pub fn generate_id(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(prefix.len() + ID_BYTES * 2);
    out.push_str(prefix);
    for _ in 0..ID_BYTES {
        let byte: u8 = rng.gen();
        out.push_str(&format!("{byte:02x}"));
    }
    out
}
