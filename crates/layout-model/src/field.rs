//! Field references and the attribute value union.

use std::fmt;

use serde_json::Value;

/// A reference to a model field: the owning table plus the field name.
///
/// Field-reference attributes fan a single assignment out across several
/// textual forms of the same reference, so the decomposition is required up
/// front rather than re-derived from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    table: String,
    field: String,
}

impl FieldRef {
    pub fn new(table: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            field: field.into(),
        }
    }

    /// The owning table name, e.g. `Sales`.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The bare field name, e.g. `Total`.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The composite `Table.Field` form used by query references.
    pub fn dotted(&self) -> String {
        format!("{}.{}", self.table, self.field)
    }

    /// The fully qualified `'Table'[Field]` form.
    pub fn qualified(&self) -> String {
        format!("'{}'[{}]", self.table, self.field)
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified())
    }
}

/// A value assigned to a record attribute.
///
/// Plain attributes take [`AttrValue::Json`]; field-reference attributes
/// require [`AttrValue::Field`] and reject anything else.
#[derive(Debug, Clone)]
pub enum AttrValue {
    Json(Value),
    Field(FieldRef),
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::Json(value)
    }
}

impl From<FieldRef> for AttrValue {
    fn from(field: FieldRef) -> Self {
        AttrValue::Field(field)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Json(Value::String(s.to_string()))
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Json(Value::from(n))
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Json(Value::from(n))
    }
}
