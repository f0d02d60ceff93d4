//! The record node: one visual container exposed through typed attributes.
//!
//! A `Visual` wraps one nested record and projects it through the mapping
//! table selected by its discriminator (`config.singleVisual.visualType`).
//! Reads come from a cache primed at construction; every write goes to both
//! the cache and the backing record, so the two never diverge. Kinds without
//! an overlay fall back to the base table and stay generically addressable.

use indexmap::IndexMap;
use layout_path::{Path, PathStep};
use serde_json::Value;
use std::sync::OnceLock;

use crate::error::ModelError;
use crate::field::{AttrValue, FieldRef};
use crate::id::generate_id;
use crate::layered;
use crate::schema::{registry, AttrMapping, FieldLocations};
use crate::templates;

fn discriminator_path() -> &'static Path {
    static PATH: OnceLock<Path> = OnceLock::new();
    PATH.get_or_init(|| layout_path::parse("config.singleVisual.visualType").unwrap())
}

/// Side-by-side view of a visual: the record as loaded and its current,
/// still-decoded state. A pure read for inspection.
#[derive(Debug, Clone)]
pub struct ExportedVisual {
    pub original: Value,
    pub current: Value,
}

/// Structured information about one visual, the per-row shape of the
/// report-wide visual listing.
#[derive(Debug, Clone)]
pub struct VisualSummary {
    pub id: String,
    pub kind: String,
    pub display_mode: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub subtitle: String,
    /// Projection role -> query references, e.g. `"Y" -> ["Metrics.Value"]`.
    pub fields: IndexMap<String, Vec<String>>,
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub page_name: Option<String>,
    pub page_id: Option<String>,
}

/// One visual container of the report.
#[derive(Debug, Clone)]
pub struct Visual {
    /// The record exactly as loaded, layers still in their text form.
    original: Value,
    /// The working record; layers are structured while `decoded` holds.
    record: Value,
    kind: String,
    attrs: IndexMap<String, Value>,
    decoded: bool,
    page_name: Option<String>,
    page_id: Option<String>,
}

impl Visual {
    /// Wrap an existing record: decode all layered fields, read the
    /// discriminator, and prime every attribute the merged mapping table
    /// declares. Attributes with no resolvable location stay unset.
    pub fn from_value(record: Value) -> Result<Self, ModelError> {
        if !record.is_object() {
            return Err(ModelError::NotAnObject);
        }
        let original = record.clone();
        let mut record = record;
        layered::decode_record(&mut record)?;

        let kind = layout_path::resolve(&record, discriminator_path())
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut visual = Self {
            original,
            record,
            kind,
            attrs: IndexMap::new(),
            decoded: true,
            page_name: None,
            page_id: None,
        };
        visual.prime_attrs();
        Ok(visual)
    }

    /// Instantiate a canned template under a freshly generated identifier.
    pub fn from_template(name: &str) -> Result<Self, ModelError> {
        let record = templates::template(name)?;
        let mut visual = Self::from_value(record)?;
        visual.set("id", Value::String(generate_id("")))?;
        Ok(visual)
    }

    /// Clone this visual into an unplaced copy with a fresh identifier.
    pub fn duplicate(&self) -> Result<Self, ModelError> {
        let mut copy = Self::from_value(self.record.clone())?;
        copy.set("id", Value::String(generate_id("")))?;
        Ok(copy)
    }

    fn prime_attrs(&mut self) {
        for (name, mapping) in registry().mappings_for(&self.kind) {
            if let Some(value) = layout_path::resolve(&self.record, mapping.primary()) {
                self.attrs.insert((*name).to_string(), value.clone());
            }
        }
    }

    /// The discriminator value read at construction; fixed for the lifetime
    /// of the node.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The cached `id` attribute, or `""` for a record without one.
    pub fn id(&self) -> &str {
        self.attrs.get("id").and_then(Value::as_str).unwrap_or_default()
    }

    pub fn page_name(&self) -> Option<&str> {
        self.page_name.as_deref()
    }

    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    pub(crate) fn assign_page(&mut self, display_name: &str, page_id: &str) {
        self.page_name = Some(display_name.to_string());
        self.page_id = Some(page_id.to_string());
    }

    pub(crate) fn clear_page(&mut self) {
        self.page_name = None;
        self.page_id = None;
    }

    pub(crate) fn record(&self) -> &Value {
        &self.record
    }

    /// Read the cached value of an attribute. Never re-walks the record.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name)
    }

    /// Re-decode the layers after a [`Visual::dump`]. Idempotent.
    fn ensure_decoded(&mut self) -> Result<(), ModelError> {
        if !self.decoded {
            layered::decode_record(&mut self.record)?;
            self.decoded = true;
        }
        Ok(())
    }

    /// Assign an attribute.
    ///
    /// Reserved layered-field names replace the whole layer (JSON text is
    /// auto-parsed). Field-reference attributes require an [`AttrValue::Field`]
    /// and fan out across their four location groups. Everything else writes
    /// the value to every mapped location; locations whose parent nesting is
    /// absent are skipped.
    pub fn set(&mut self, name: &str, value: impl Into<AttrValue>) -> Result<(), ModelError> {
        let value = value.into();
        self.ensure_decoded()?;

        if layered::is_layered_field(name) {
            return self.set_layer(name, value);
        }

        let mapping = registry()
            .mapping(&self.kind, name)
            .ok_or_else(|| ModelError::NotMapped(name.to_string()))?;

        match mapping {
            AttrMapping::Plain(locations) => {
                let json = match value {
                    AttrValue::Json(v) => v,
                    AttrValue::Field(f) => Value::String(f.dotted()),
                };
                for location in locations {
                    layout_path::write(&mut self.record, location, json.clone());
                }
                self.attrs.insert(name.to_string(), json);
            }
            AttrMapping::FieldRef(groups) => {
                let AttrValue::Field(field) = value else {
                    return Err(ModelError::InvalidValue(name.to_string()));
                };
                self.fan_out(groups, &field);
                self.attrs
                    .insert(name.to_string(), Value::String(field.dotted()));
            }
        }
        Ok(())
    }

    fn fan_out(&mut self, groups: &FieldLocations, field: &FieldRef) {
        let writes: [(&[Path], String); 4] = [
            (&groups.direct, field.dotted()),
            (&groups.field, field.field().to_string()),
            (&groups.table, field.table().to_string()),
            (&groups.qualified, field.qualified()),
        ];
        for (locations, text) in writes {
            for location in locations {
                layout_path::write(&mut self.record, location, Value::String(text.clone()));
            }
        }
    }

    fn set_layer(&mut self, name: &str, value: AttrValue) -> Result<(), ModelError> {
        let structured = match value {
            AttrValue::Json(Value::String(text)) => {
                serde_json::from_str(&text).map_err(|source| ModelError::MalformedLayer {
                    field: name.to_string(),
                    source,
                })?
            }
            AttrValue::Json(v) if v.is_object() || v.is_array() => v,
            _ => return Err(ModelError::InvalidValue(name.to_string())),
        };
        let map = self.record.as_object_mut().ok_or(ModelError::NotAnObject)?;
        map.insert(name.to_string(), structured);
        Ok(())
    }

    /// Encode every layered field back to text, readying the record for
    /// persistence. The node re-decodes itself before the next mutation.
    pub fn dump(&mut self) -> Result<(), ModelError> {
        layered::encode_record(&mut self.record)?;
        self.decoded = false;
        Ok(())
    }

    /// Original-versus-current view of the record. Pure read.
    pub fn export(&self) -> ExportedVisual {
        ExportedVisual {
            original: self.original.clone(),
            current: self.record.clone(),
        }
    }

    /// Whether this container is a visual group, and under which id/name.
    pub fn group_info(&self) -> Option<(String, String)> {
        let group = layout_path::resolve(
            &self.record,
            &[
                PathStep::Key("config".into()),
                PathStep::Key("singleVisualGroup".into()),
                PathStep::Key("displayName".into()),
            ],
        )?;
        Some((self.id().to_string(), group.as_str()?.to_string()))
    }

    /// Structured info row for this visual. Re-decodes if needed.
    pub fn summary(&mut self) -> Result<VisualSummary, ModelError> {
        self.ensure_decoded()?;

        let number = |name: &str| {
            self.attrs
                .get(name)
                .and_then(Value::as_f64)
                .unwrap_or_default()
        };
        let single = &self.record["config"]["singleVisual"];

        let display_mode = single["display"]["mode"]
            .as_str()
            .unwrap_or("show")
            .to_string();
        let title = literal_text(&single["vcObjects"]["title"][0]["properties"]["text"]);
        let subtitle = literal_text(&single["vcObjects"]["subTitle"][0]["properties"]["text"]);

        let mut fields = IndexMap::new();
        if let Some(projections) = single["projections"].as_object() {
            for (role, entries) in projections {
                let refs = entries
                    .as_array()
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|e| e["queryRef"].as_str())
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                fields.insert(role.clone(), refs);
            }
        }

        let group_id = self.record["config"]["parentGroupName"]
            .as_str()
            .map(str::to_string);

        Ok(VisualSummary {
            id: self.id().to_string(),
            kind: self.kind.clone(),
            display_mode,
            x: number("x"),
            y: number("y"),
            width: number("width"),
            height: number("height"),
            title,
            subtitle,
            fields,
            group_id,
            group_name: None,
            page_name: self.page_name.clone(),
            page_id: self.page_id.clone(),
        })
    }
}

/// Pull the text out of a `{"expr": {"Literal": {"Value": "'...'"}}}` node,
/// stripping the surrounding quote characters of the literal form.
fn literal_text(property: &Value) -> String {
    let raw = property["expr"]["Literal"]["Value"].as_str().unwrap_or_default();
    raw.trim_matches('\'').to_string()
}
