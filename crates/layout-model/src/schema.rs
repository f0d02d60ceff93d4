//! The path-schema registry: declarative attribute-mapping tables per
//! visual kind.
//!
//! A mapping binds a semantic attribute name to one or more path expressions
//! inside a visual record. Plain attributes write the same value to every
//! location; field-reference attributes fan a table/field decomposition out
//! across four location groups. Tables are process-wide read-only static
//! data: a common base table plus per-kind overlays, where an overlay entry
//! with the same name fully replaces the base entry (no deep merge).

use std::sync::OnceLock;

use indexmap::IndexMap;
use layout_path::Path;

/// Location groups of a field-reference attribute.
///
/// Writing a reference that decomposes into `(table, field)` lands its
/// `Table.Field` form in `direct`, the bare field name in `field`, the bare
/// table name in `table`, and the `'Table'[Field]` form in `qualified`.
#[derive(Debug, Clone)]
pub struct FieldLocations {
    pub direct: Vec<Path>,
    pub field: Vec<Path>,
    pub table: Vec<Path>,
    pub qualified: Vec<Path>,
}

/// One attribute mapping: either a plain fan-out list or the four-group
/// field-reference shape.
#[derive(Debug, Clone)]
pub enum AttrMapping {
    Plain(Vec<Path>),
    FieldRef(FieldLocations),
}

impl AttrMapping {
    /// The location used to prime the attribute cache at construction time.
    pub fn primary(&self) -> &Path {
        match self {
            AttrMapping::Plain(locations) => &locations[0],
            AttrMapping::FieldRef(groups) => &groups.direct[0],
        }
    }
}

/// A merged attribute-mapping table, keyed by attribute name. Iteration
/// order follows declaration order (base first, then overlay additions).
pub type MappingTable = IndexMap<&'static str, AttrMapping>;

/// The registry of mapping tables.
pub struct Registry {
    base: MappingTable,
    merged: IndexMap<&'static str, MappingTable>,
}

impl Registry {
    /// The merged mapping table for `kind`. Unrecognized kinds get the base
    /// table only and stay generically addressable.
    pub fn mappings_for(&self, kind: &str) -> &MappingTable {
        self.merged.get(kind).unwrap_or(&self.base)
    }

    /// Look up one attribute mapping for `kind`. `None` means "not mapped" -
    /// callers treat the name as a plain unmanaged field, not an error.
    pub fn mapping(&self, kind: &str, name: &str) -> Option<&AttrMapping> {
        self.mappings_for(kind).get(name)
    }

    /// The kinds that carry an overlay beyond the base table.
    pub fn known_kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.merged.keys().copied()
    }
}

/// The process-wide registry. Built once, never written afterwards.
pub fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(build_registry)
}

fn paths(exprs: &[&str]) -> Vec<Path> {
    exprs.iter().map(|e| layout_path::parse(e).unwrap()).collect()
}

fn plain(table: &mut MappingTable, name: &'static str, exprs: &[&str]) {
    table.insert(name, AttrMapping::Plain(paths(exprs)));
}

fn field_ref(
    table: &mut MappingTable,
    name: &'static str,
    direct: &[&str],
    field: &[&str],
    owner: &[&str],
    qualified: &[&str],
) {
    table.insert(
        name,
        AttrMapping::FieldRef(FieldLocations {
            direct: paths(direct),
            field: paths(field),
            table: paths(owner),
            qualified: paths(qualified),
        }),
    );
}

fn base_table() -> MappingTable {
    let mut t = MappingTable::new();
    plain(&mut t, "id", &["config.name"]);
    plain(&mut t, "x", &["config.layouts[0].position.x", "x"]);
    plain(&mut t, "y", &["config.layouts[0].position.y", "y"]);
    plain(&mut t, "width", &["config.layouts[0].position.width", "width"]);
    plain(&mut t, "height", &["config.layouts[0].position.height", "height"]);
    plain(&mut t, "visual_type", &["config.singleVisual.visualType"]);
    plain(&mut t, "tab_order", &["tabOrder"]);
    t
}

fn card_overlay(t: &mut MappingTable) {
    plain(
        t,
        "callout_font_size",
        &[
            "config.singleVisual.objects.labels[0].properties.fontSize.expr.Literal.Value",
            "dataTransforms.objects.labels[0].properties.fontSize.expr.Literal.Value",
        ],
    );
    plain(
        t,
        "title_text",
        &["config.singleVisual.vcObjects.title[0].properties.text.expr.Literal.Value"],
    );
    plain(
        t,
        "title_alignment",
        &["config.singleVisual.vcObjects.title[0].properties.alignment.expr.Literal.Value"],
    );
    plain(
        t,
        "title_font_size",
        &["config.singleVisual.vcObjects.title[0].properties.fontSize.expr.Literal.Value"],
    );
    field_ref(
        t,
        "measure",
        &["config.singleVisual.projections.Values[0].queryRef"],
        &[
            "config.singleVisual.prototypeQuery.Select[0].Measure.Property",
            "config.singleVisual.prototypeQuery.Select[0].NativeReferenceName",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.Select[0].Measure.Property",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.Select[0].NativeReferenceName",
            "dataTransforms.queryMetadata.Select[0].Restatement",
            "dataTransforms.selects[0].displayName",
            "dataTransforms.selects[0].expr.Measure.Property",
        ],
        &[
            "config.singleVisual.prototypeQuery.From[0].Entity",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.From[0].Entity",
            "dataTransforms.selects[0].expr.Measure.Expression.SourceRef.Entity",
        ],
        &[
            "config.singleVisual.prototypeQuery.Select[0].Name",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.Select[0].Name",
            "dataTransforms.queryMetadata.Select[0].Name",
            "dataTransforms.selects[0].queryName",
        ],
    );
}

fn slicer_overlay(t: &mut MappingTable) {
    plain(
        t,
        "slicer_mode",
        &[
            "config.singleVisual.objects.data[0].properties.mode.expr.Literal.Value",
            "dataTransforms.objects.data[0].properties.mode.expr.Literal.Value",
        ],
    );
    plain(
        t,
        "title_text",
        &["config.singleVisual.vcObjects.title[0].properties.text.expr.Literal.Value"],
    );
    field_ref(
        t,
        "field",
        &["config.singleVisual.projections.Values[0].queryRef"],
        &[
            "config.singleVisual.prototypeQuery.Select[0].Column.Property",
            "config.singleVisual.prototypeQuery.Select[0].NativeReferenceName",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.Select[0].Column.Property",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.Select[0].NativeReferenceName",
            "dataTransforms.queryMetadata.Select[0].Restatement",
            "dataTransforms.selects[0].displayName",
            "dataTransforms.selects[0].expr.Column.Property",
        ],
        &[
            "config.singleVisual.prototypeQuery.From[0].Entity",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.From[0].Entity",
            "dataTransforms.selects[0].expr.Column.Expression.SourceRef.Entity",
        ],
        &[
            "config.singleVisual.prototypeQuery.Select[0].Name",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.Select[0].Name",
            "dataTransforms.projectionActiveItems.Values[0].queryRef",
            "dataTransforms.queryMetadata.Select[0].Name",
            "dataTransforms.selects[0].queryName",
        ],
    );
}

fn clustered_column_overlay(t: &mut MappingTable) {
    plain(
        t,
        "title_text",
        &["config.singleVisual.vcObjects.title[0].properties.text.expr.Literal.Value"],
    );
    field_ref(
        t,
        "category",
        &["config.singleVisual.projections.Category[0].queryRef"],
        &[
            "config.singleVisual.prototypeQuery.Select[0].Column.Property",
            "config.singleVisual.prototypeQuery.Select[0].NativeReferenceName",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.Select[0].Column.Property",
            "dataTransforms.queryMetadata.Select[0].Restatement",
            "dataTransforms.selects[0].displayName",
            "dataTransforms.selects[0].expr.Column.Property",
        ],
        &[
            "config.singleVisual.prototypeQuery.From[0].Entity",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.From[0].Entity",
            "dataTransforms.selects[0].expr.Column.Expression.SourceRef.Entity",
        ],
        &[
            "config.singleVisual.prototypeQuery.Select[0].Name",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.Select[0].Name",
            "dataTransforms.projectionActiveItems.Category[0].queryRef",
            "dataTransforms.queryMetadata.Select[0].Name",
            "dataTransforms.selects[0].queryName",
        ],
    );
    field_ref(
        t,
        "values",
        &["config.singleVisual.projections.Y[0].queryRef"],
        &[
            "config.singleVisual.prototypeQuery.Select[1].Measure.Property",
            "config.singleVisual.prototypeQuery.Select[1].NativeReferenceName",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.Select[1].Measure.Property",
            "dataTransforms.queryMetadata.Select[1].Restatement",
            "dataTransforms.selects[1].displayName",
            "dataTransforms.selects[1].expr.Measure.Property",
        ],
        &[
            "config.singleVisual.prototypeQuery.From[1].Entity",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.From[1].Entity",
            "dataTransforms.selects[1].expr.Measure.Expression.SourceRef.Entity",
        ],
        &[
            "config.singleVisual.prototypeQuery.Select[1].Name",
            "query.Commands[0].SemanticQueryDataShapeCommand.Query.Select[1].Name",
            "dataTransforms.queryMetadata.Select[1].Name",
            "dataTransforms.selects[1].queryName",
        ],
    );
}

fn bookmark_navigator_overlay(t: &mut MappingTable) {
    plain(
        t,
        "bookmark_group",
        &["config.singleVisual.objects.bookmarks[0].properties.bookmarkGroup.expr.Literal.Value"],
    );
    plain(
        t,
        "selected_bookmark",
        &["config.singleVisual.objects.bookmarks[0].properties.selectedBookmark.expr.Literal.Value"],
    );
}

fn build_registry() -> Registry {
    let base = base_table();

    let overlays: [(&'static str, fn(&mut MappingTable)); 4] = [
        ("card", card_overlay),
        ("slicer", slicer_overlay),
        ("clusteredColumnChart", clustered_column_overlay),
        ("bookmarkNavigator", bookmark_navigator_overlay),
    ];

    let mut merged = IndexMap::new();
    for (kind, overlay) in overlays {
        let mut table = base.clone();
        overlay(&mut table);
        merged.insert(kind, table);
    }

    Registry { base, merged }
}
