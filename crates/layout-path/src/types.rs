//! Type definitions for path expressions.

use std::fmt;

/// A single step in a path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// Object member access by key.
    Key(String),
    /// Array element access by fixed index.
    Index(usize),
    /// First element of an array (`[*]` in the textual form).
    First,
}

/// A parsed path expression: an ordered sequence of steps.
pub type Path = Vec<PathStep>;

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(key) => write!(f, "{key}"),
            PathStep::Index(idx) => write!(f, "[{idx}]"),
            PathStep::First => write!(f, "[*]"),
        }
    }
}

/// Render a path back to its textual dotted form.
pub fn format(path: &[PathStep]) -> String {
    let mut out = String::new();
    for step in path {
        match step {
            PathStep::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            // Brackets attach to the previous segment without a separator.
            PathStep::Index(idx) => out.push_str(&format!("[{idx}]")),
            PathStep::First => out.push_str("[*]"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_mixed_steps() {
        let path = vec![
            PathStep::Key("config".into()),
            PathStep::Key("layouts".into()),
            PathStep::Index(0),
            PathStep::Key("position".into()),
            PathStep::Key("x".into()),
        ];
        assert_eq!(format(&path), "config.layouts[0].position.x");
    }

    #[test]
    fn format_leading_bracket() {
        let path = vec![PathStep::Index(2), PathStep::Key("a".into())];
        assert_eq!(format(&path), "[2].a");
    }
}
