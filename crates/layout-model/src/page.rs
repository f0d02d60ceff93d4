//! Pages: ordered containers of visuals plus page-level metadata.

use serde_json::Value;

use crate::error::ModelError;
use crate::id::{generate_id, PAGE_PREFIX};

/// One report page (a "section" in the wire format).
///
/// The page holds its section record with the visual containers drained out;
/// the visuals themselves live in the document root's collection, tagged
/// with this page's identity. Pages are referenced by identifier only.
#[derive(Debug, Clone)]
pub struct Page {
    record: Value,
}

/// Position, name, and size information about one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSummary {
    pub ordinal: i64,
    pub display_name: String,
    pub name: String,
    pub visual_count: usize,
}

impl Page {
    /// Wrap a section record whose `visualContainers` has already been
    /// drained by the document root.
    pub(crate) fn new(record: Value) -> Result<Self, ModelError> {
        if !record.is_object() {
            return Err(ModelError::NotAnObject);
        }
        Ok(Self { record })
    }

    /// The stable page identifier (`name` in the wire format).
    pub fn name(&self) -> &str {
        self.record["name"].as_str().unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        self.record["displayName"].as_str().unwrap_or_default()
    }

    pub fn ordinal(&self) -> i64 {
        self.record["ordinal"].as_i64().unwrap_or_default()
    }

    pub(crate) fn set_ordinal(&mut self, ordinal: i64) {
        self.record["ordinal"] = Value::from(ordinal);
    }

    /// Clone this page's record under a fresh identifier, a ` copy` display
    /// name, and the given ordinal. The visual containers stay empty; the
    /// caller re-populates them with re-identified visuals.
    pub(crate) fn duplicate(&self, ordinal: i64) -> Self {
        let mut record = self.record.clone();
        record["name"] = Value::String(generate_id(PAGE_PREFIX));
        record["displayName"] = Value::String(format!("{} copy", self.display_name()));
        record["ordinal"] = Value::from(ordinal);
        Self { record }
    }

    /// The section record with the given containers restored, ready for
    /// serialization.
    pub(crate) fn to_section(&self, containers: Vec<Value>) -> Value {
        let mut record = self.record.clone();
        record["visualContainers"] = Value::Array(containers);
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> Page {
        Page::new(json!({
            "name": "ReportSection1234",
            "displayName": "Overview",
            "ordinal": 2,
            "visualContainers": []
        }))
        .unwrap()
    }

    #[test]
    fn metadata_accessors() {
        let page = page();
        assert_eq!(page.name(), "ReportSection1234");
        assert_eq!(page.display_name(), "Overview");
        assert_eq!(page.ordinal(), 2);
    }

    #[test]
    fn duplicate_renames_and_reorders() {
        let page = page();
        let copy = page.duplicate(3);
        assert_ne!(copy.name(), page.name());
        assert!(copy.name().starts_with("ReportSection"));
        assert_eq!(copy.display_name(), "Overview copy");
        assert_eq!(copy.ordinal(), 3);
    }

    #[test]
    fn to_section_restores_containers() {
        let page = page();
        let section = page.to_section(vec![json!({"x": 1.0})]);
        assert_eq!(section["visualContainers"][0]["x"], json!(1.0));
        assert_eq!(section["displayName"], json!("Overview"));
    }
}
