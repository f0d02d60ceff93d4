//! Dotted path expressions for report-layout records.
//!
//! A path expression addresses a single location inside a nested JSON record,
//! e.g. `config.layouts[0].position.x`. The step vocabulary is deliberately
//! small: object keys, fixed array indexes, and the wildcard-first-element
//! step `[*]` for the common "first element of an array" pattern. There is no
//! filtering, recursion, or multi-match - a path resolves to at most one
//! location.
//!
//! # Example
//!
//! ```
//! use layout_path::{parse, resolve};
//! use serde_json::json;
//!
//! let path = parse("config.layouts[0].position.x").unwrap();
//! let doc = json!({"config": {"layouts": [{"position": {"x": 10.0}}]}});
//! assert_eq!(resolve(&doc, &path), Some(&json!(10.0)));
//! ```

use thiserror::Error;

pub mod types;
pub use types::{Path, PathStep};

mod resolve;
pub use resolve::{resolve, resolve_mut, write};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("EMPTY_PATH")]
    EmptyPath,
    #[error("EMPTY_SEGMENT at offset {0}")]
    EmptySegment(usize),
    #[error("UNCLOSED_BRACKET at offset {0}")]
    UnclosedBracket(usize),
    #[error("INVALID_INDEX: {0:?}")]
    InvalidIndex(String),
    #[error("TRAILING_GARBAGE after bracket at offset {0}")]
    TrailingGarbage(usize),
}

/// Parse the textual dotted form into a [`Path`].
///
/// Segments are separated by `.`; a segment may carry one or more bracket
/// suffixes (`layouts[0]`, `rows[0][1]`). A bare bracket segment is allowed
/// after a separator (`a.[0].b`), matching how the schema tables are written.
///
/// # Errors
///
/// Empty paths, empty segments, unclosed brackets, and non-numeric indexes
/// other than `*` are rejected.
///
/// # Example
///
/// ```
/// use layout_path::{parse, PathStep};
///
/// let path = parse("a.b[2].c[*]").unwrap();
/// assert_eq!(
///     path,
///     vec![
///         PathStep::Key("a".into()),
///         PathStep::Key("b".into()),
///         PathStep::Index(2),
///         PathStep::Key("c".into()),
///         PathStep::First,
///     ]
/// );
/// ```
pub fn parse(expr: &str) -> Result<Path, PathError> {
    if expr.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let mut steps: Path = Vec::new();
    let bytes = expr.as_bytes();
    let mut pos = 0;

    while pos < bytes.len() {
        // Key portion, up to the next '.' or '['. May be empty when the
        // segment starts with a bracket ("a.[0]" style).
        let key_start = pos;
        while pos < bytes.len() && bytes[pos] != b'.' && bytes[pos] != b'[' {
            pos += 1;
        }
        let key = &expr[key_start..pos];
        let at_bracket = pos < bytes.len() && bytes[pos] == b'[';
        if key.is_empty() && !at_bracket {
            return Err(PathError::EmptySegment(key_start));
        }
        if !key.is_empty() {
            steps.push(PathStep::Key(key.to_string()));
        }

        // Any number of bracket suffixes.
        while pos < bytes.len() && bytes[pos] == b'[' {
            let open = pos;
            let close = match expr[pos..].find(']') {
                Some(off) => pos + off,
                None => return Err(PathError::UnclosedBracket(open)),
            };
            let inner = &expr[pos + 1..close];
            if inner == "*" {
                steps.push(PathStep::First);
            } else {
                let idx: usize = inner
                    .parse()
                    .map_err(|_| PathError::InvalidIndex(inner.to_string()))?;
                steps.push(PathStep::Index(idx));
            }
            pos = close + 1;
        }

        // After the brackets: either end of input or a separator.
        if pos < bytes.len() {
            if bytes[pos] != b'.' {
                return Err(PathError::TrailingGarbage(pos));
            }
            pos += 1;
            if pos == bytes.len() {
                return Err(PathError::EmptySegment(pos));
            }
        }
    }

    if steps.is_empty() {
        return Err(PathError::EmptyPath);
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_keys() {
        assert_eq!(
            parse("a.b.c").unwrap(),
            vec![
                PathStep::Key("a".into()),
                PathStep::Key("b".into()),
                PathStep::Key("c".into()),
            ]
        );
    }

    #[test]
    fn parse_indexed_segment() {
        assert_eq!(
            parse("layouts[0].position").unwrap(),
            vec![
                PathStep::Key("layouts".into()),
                PathStep::Index(0),
                PathStep::Key("position".into()),
            ]
        );
    }

    #[test]
    fn parse_dot_before_bracket() {
        // The schema tables occasionally write "a.[0].b".
        assert_eq!(
            parse("a.[0].b").unwrap(),
            vec![
                PathStep::Key("a".into()),
                PathStep::Index(0),
                PathStep::Key("b".into()),
            ]
        );
    }

    #[test]
    fn parse_wildcard_first() {
        assert_eq!(
            parse("labels[*].properties").unwrap(),
            vec![
                PathStep::Key("labels".into()),
                PathStep::First,
                PathStep::Key("properties".into()),
            ]
        );
    }

    #[test]
    fn parse_chained_brackets() {
        assert_eq!(
            parse("m[1][2]").unwrap(),
            vec![
                PathStep::Key("m".into()),
                PathStep::Index(1),
                PathStep::Index(2),
            ]
        );
    }

    #[test]
    fn parse_keys_with_spaces() {
        // Document keys carry spaces and non-ASCII freely.
        assert_eq!(
            parse("queryMetadata.Select[0].Name").unwrap().len(),
            4
        );
        assert_eq!(
            parse("objects.données[0]").unwrap()[1],
            PathStep::Key("données".into())
        );
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(parse(""), Err(PathError::EmptyPath));
        assert!(matches!(parse("a..b"), Err(PathError::EmptySegment(_))));
        assert!(matches!(parse("a."), Err(PathError::EmptySegment(_))));
    }

    #[test]
    fn parse_rejects_malformed_brackets() {
        assert!(matches!(parse("a[1"), Err(PathError::UnclosedBracket(_))));
        assert!(matches!(parse("a[x]"), Err(PathError::InvalidIndex(_))));
        assert!(matches!(parse("a[-1]"), Err(PathError::InvalidIndex(_))));
        assert!(matches!(parse("a[0]b"), Err(PathError::TrailingGarbage(_))));
    }

    #[test]
    fn parse_display_roundtrip() {
        for expr in ["a.b.c", "layouts[0].position.x", "labels[*].properties", "m[1][2]"] {
            let path = parse(expr).unwrap();
            let rendered = types::format(&path);
            assert_eq!(parse(&rendered).unwrap(), path, "failed for {expr:?}");
        }
    }
}
