//! Error type for the layout model.

use thiserror::Error;

/// Errors surfaced by the layout model.
///
/// Everything here is deterministic and in-memory; there is nothing to retry.
/// All variants propagate to the document-root caller that triggered them.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A layered field held text that is not valid JSON. Fatal for the
    /// record: a corrupt document must not be silently repaired.
    #[error("layered field {field:?} holds malformed JSON text: {source}")]
    MalformedLayer {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// A layered field could not be serialized back to text.
    #[error("layered field {field:?} could not be re-encoded: {source}")]
    EncodeLayer {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// The layout document itself failed to parse.
    #[error("layout document is not valid JSON: {0}")]
    MalformedDocument(#[source] serde_json::Error),

    /// The layout document could not be serialized back to text.
    #[error("layout document could not be serialized: {0}")]
    SerializeDocument(#[source] serde_json::Error),

    /// A record was expected to be a JSON object.
    #[error("expected a JSON object record")]
    NotAnObject,

    #[error("page {0:?} was not found in the report")]
    PageNotFound(String),

    #[error("visual {0:?} was not found in the report")]
    VisualNotFound(String),

    #[error("visual template {0:?} is not known")]
    TemplateNotFound(String),

    /// The attribute name is not in the mapping table for this record kind.
    #[error("attribute {0:?} is not mapped for this visual kind")]
    NotMapped(String),

    /// The value does not fit the attribute, e.g. a field-reference
    /// attribute assigned a value without a table/field decomposition.
    #[error("invalid value for attribute {0:?}")]
    InvalidValue(String),

    /// Bookmark targets span more than one page.
    #[error("bookmark targets span more than one page")]
    AmbiguousPage,

    /// A bookmark aggregate entry is structurally unusable.
    #[error("bookmark entry is malformed: {0}")]
    MalformedBookmark(String),
}
