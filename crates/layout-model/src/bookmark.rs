//! Bookmarks and bookmark groups: build, parse, and summarize the
//! cross-page reference aggregates.
//!
//! A bookmark targets a set of visuals, each shown or hidden, and is scoped
//! to exactly one page (derived from its targets). A group nests already
//! built bookmarks under a shared name; its page and target list are
//! recomputed from the children, never cached. Built aggregates are
//! immutable - an update means building a new one.

use std::collections::BTreeSet;

use serde_json::{json, Map, Value};

use crate::collection::VisualCollection;
use crate::error::ModelError;
use crate::id::{generate_id, BOOKMARK_PREFIX};
use crate::visual::Visual;

/// Display mode of a targeted visual.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    Show,
    Hide,
}

impl DisplayMode {
    /// The wire string for this mode.
    pub fn as_wire(self) -> &'static str {
        match self {
            DisplayMode::Show => "show",
            DisplayMode::Hide => "hidden",
        }
    }

    pub fn from_wire(mode: &str) -> Option<Self> {
        match mode {
            "show" => Some(DisplayMode::Show),
            "hidden" => Some(DisplayMode::Hide),
            _ => None,
        }
    }
}

/// A built bookmark: the typed view plus its assembled wire record.
#[derive(Debug, Clone)]
pub struct Bookmark {
    display_name: String,
    id: String,
    page_id: Option<String>,
    show: Vec<String>,
    hide: Vec<String>,
    targets: Vec<String>,
    record: Value,
}

impl Bookmark {
    /// Assemble a bookmark from show and hide sets of visuals.
    ///
    /// The target set defaults to show + hide when not given explicitly. The
    /// owning page is the unique page among the targets; no targets leave it
    /// empty. A visual present in both sets is a caller error with no
    /// defined precedence.
    ///
    /// # Errors
    ///
    /// Targets spanning more than one page are rejected with
    /// [`ModelError::AmbiguousPage`].
    pub fn build(
        display_name: &str,
        show: &[&Visual],
        hide: &[&Visual],
        targets: Option<&[&Visual]>,
    ) -> Result<Self, ModelError> {
        let union: Vec<&Visual>;
        let targets: &[&Visual] = match targets {
            Some(explicit) => explicit,
            None => {
                union = show.iter().chain(hide).copied().collect();
                &union
            }
        };

        let pages: BTreeSet<&str> = targets.iter().filter_map(|v| v.page_id()).collect();
        if pages.len() > 1 {
            return Err(ModelError::AmbiguousPage);
        }
        let page_id = pages.into_iter().next().map(str::to_string);

        let show_ids: Vec<String> = show.iter().map(|v| v.id().to_string()).collect();
        let hide_ids: Vec<String> = hide.iter().map(|v| v.id().to_string()).collect();
        let target_ids: Vec<String> = targets.iter().map(|v| v.id().to_string()).collect();

        let id = generate_id(BOOKMARK_PREFIX);
        let record = assemble_record(
            display_name,
            &id,
            page_id.as_deref(),
            &show_ids,
            &hide_ids,
            &target_ids,
        );

        Ok(Self {
            display_name: display_name.to_string(),
            id,
            page_id,
            show: show_ids,
            hide: hide_ids,
            targets: target_ids,
            record,
        })
    }

    /// Parse a leaf aggregate entry back into a bookmark, resolving every
    /// target id through the collection.
    pub fn from_value(value: &Value, visuals: &VisualCollection) -> Result<Self, ModelError> {
        let id = value["name"]
            .as_str()
            .ok_or_else(|| ModelError::MalformedBookmark("missing \"name\"".into()))?
            .to_string();
        let display_name = value["displayName"].as_str().unwrap_or_default().to_string();

        let active = value["explorationState"]["activeSection"]
            .as_str()
            .unwrap_or_default();
        let page_id = (!active.is_empty()).then(|| active.to_string());

        let targets: Vec<String> = value["options"]["targetVisualNames"]
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        // Every referenced id must resolve to a node.
        for target in &targets {
            if visuals.by_id(target).is_none() {
                return Err(ModelError::VisualNotFound(target.clone()));
            }
        }

        let containers = &value["explorationState"]["sections"][active]["visualContainers"];
        let mode_of = |id: &str| {
            containers[id]["singleVisual"]["display"]["mode"]
                .as_str()
                .and_then(DisplayMode::from_wire)
        };

        let show = targets
            .iter()
            .filter(|id| mode_of(id.as_str()) == Some(DisplayMode::Show))
            .cloned()
            .collect();
        let hide = targets
            .iter()
            .filter(|id| mode_of(id.as_str()) == Some(DisplayMode::Hide))
            .cloned()
            .collect();

        Ok(Self {
            display_name,
            id,
            page_id,
            show,
            hide,
            targets,
            record: value.clone(),
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The generated stable identifier, distinct from the display name.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn page_id(&self) -> Option<&str> {
        self.page_id.as_deref()
    }

    pub fn show_ids(&self) -> &[String] {
        &self.show
    }

    pub fn hide_ids(&self) -> &[String] {
        &self.hide
    }

    pub fn target_ids(&self) -> &[String] {
        &self.targets
    }

    pub fn record(&self) -> &Value {
        &self.record
    }
}

fn assemble_record(
    display_name: &str,
    id: &str,
    page_id: Option<&str>,
    show: &[String],
    hide: &[String],
    targets: &[String],
) -> Value {
    let mut containers = Map::new();
    for (ids, mode) in [(show, DisplayMode::Show), (hide, DisplayMode::Hide)] {
        for visual_id in ids {
            containers.insert(
                visual_id.clone(),
                json!({"singleVisual": {"display": {"mode": mode.as_wire()}}}),
            );
        }
    }

    let section_key = page_id.unwrap_or_default();
    let mut sections = Map::new();
    if !targets.is_empty() {
        sections.insert(
            section_key.to_string(),
            json!({"visualContainers": Value::Object(containers)}),
        );
    }

    json!({
        "displayName": display_name,
        "name": id,
        "explorationState": {
            "version": "1.3",
            "activeSection": section_key,
            "sections": Value::Object(sections)
        },
        "options": {
            "targetVisualNames": targets,
            "suppressData": true,
            "suppressActiveSection": true,
            "applyOnlyToTargetVisuals": true
        }
    })
}

/// An ordered group of bookmarks under one display name and identifier.
#[derive(Debug, Clone)]
pub struct BookmarkGroup {
    display_name: String,
    id: String,
    children: Vec<Bookmark>,
}

impl BookmarkGroup {
    /// Nest already-built bookmarks under a fresh group identifier.
    pub fn build(display_name: &str, children: Vec<Bookmark>) -> Self {
        Self {
            display_name: display_name.to_string(),
            id: generate_id(BOOKMARK_PREFIX),
            children,
        }
    }

    /// Parse a group aggregate entry (an entry with a non-empty `children`
    /// list).
    pub fn from_value(value: &Value, visuals: &VisualCollection) -> Result<Self, ModelError> {
        let id = value["name"]
            .as_str()
            .ok_or_else(|| ModelError::MalformedBookmark("missing \"name\"".into()))?
            .to_string();
        let display_name = value["displayName"].as_str().unwrap_or_default().to_string();
        let children = value["children"]
            .as_array()
            .ok_or_else(|| ModelError::MalformedBookmark("missing \"children\"".into()))?
            .iter()
            .map(|child| Bookmark::from_value(child, visuals))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            display_name,
            id,
            children,
        })
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn children(&self) -> &[Bookmark] {
        &self.children
    }

    /// Concatenation of the children's target lists, not deduplicated.
    /// Recomputed on every call.
    pub fn target_visual_ids(&self) -> Vec<String> {
        self.children
            .iter()
            .flat_map(|b| b.target_ids().iter().cloned())
            .collect()
    }

    /// The unique page among the children.
    ///
    /// # Errors
    ///
    /// Children spanning more than one page are rejected with
    /// [`ModelError::AmbiguousPage`].
    pub fn page_id(&self) -> Result<Option<String>, ModelError> {
        let pages: BTreeSet<&str> = self.children.iter().filter_map(|b| b.page_id()).collect();
        if pages.len() > 1 {
            return Err(ModelError::AmbiguousPage);
        }
        Ok(pages.into_iter().next().map(str::to_string))
    }

    /// The group's wire record: children nested in order.
    pub fn to_record(&self) -> Value {
        json!({
            "displayName": self.display_name,
            "name": self.id,
            "children": self.children.iter().map(|b| b.record().clone()).collect::<Vec<_>>()
        })
    }
}

/// One entry of the document's bookmark aggregate.
#[derive(Debug, Clone)]
pub enum BookmarkEntry {
    Single(Bookmark),
    Group(BookmarkGroup),
}

impl BookmarkEntry {
    /// Classify and parse an aggregate entry. An entry is a group iff it
    /// carries a non-empty `children` list.
    pub fn from_value(value: &Value, visuals: &VisualCollection) -> Result<Self, ModelError> {
        let is_group = value["children"]
            .as_array()
            .is_some_and(|children| !children.is_empty());
        if is_group {
            Ok(BookmarkEntry::Group(BookmarkGroup::from_value(value, visuals)?))
        } else {
            Ok(BookmarkEntry::Single(Bookmark::from_value(value, visuals)?))
        }
    }

    pub fn id(&self) -> &str {
        match self {
            BookmarkEntry::Single(b) => b.id(),
            BookmarkEntry::Group(g) => g.id(),
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            BookmarkEntry::Single(b) => b.display_name(),
            BookmarkEntry::Group(g) => g.display_name(),
        }
    }
}

/// Name/id/page/target rows for the report-wide bookmark listing. Built
/// straight from the raw aggregate, without resolving visual references.
#[derive(Debug, Clone)]
pub struct BookmarkSummary {
    pub display_name: String,
    pub id: String,
    pub page_id: Option<String>,
    pub visual_ids: Vec<String>,
    pub children: Vec<BookmarkSummary>,
}

impl BookmarkSummary {
    pub fn from_record(value: &Value) -> Self {
        let children: Vec<BookmarkSummary> = value["children"]
            .as_array()
            .map(|entries| entries.iter().map(Self::from_record).collect())
            .unwrap_or_default();

        let (page_id, visual_ids) = if children.is_empty() {
            let active = value["explorationState"]["activeSection"]
                .as_str()
                .unwrap_or_default();
            let ids = value["options"]["targetVisualNames"]
                .as_array()
                .map(|ids| {
                    ids.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            ((!active.is_empty()).then(|| active.to_string()), ids)
        } else {
            let pages: BTreeSet<&str> = children
                .iter()
                .filter_map(|c| c.page_id.as_deref())
                .collect();
            let page = (pages.len() == 1).then(|| pages.into_iter().next().map(str::to_string)).flatten();
            let ids = children
                .iter()
                .flat_map(|c| c.visual_ids.iter().cloned())
                .collect();
            (page, ids)
        };

        Self {
            display_name: value["displayName"].as_str().unwrap_or_default().to_string(),
            id: value["name"].as_str().unwrap_or_default().to_string(),
            page_id,
            visual_ids,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn visual_on_page(id: &str, page: &str) -> Visual {
        let record = json!({
            "config": format!(r#"{{"name":"{id}","singleVisual":{{"visualType":"card"}}}}"#)
        });
        let mut visual = Visual::from_value(record).unwrap();
        visual.assign_page("Page", page);
        visual
    }

    #[test]
    fn build_derives_page_and_targets() {
        let v1 = visual_on_page("v1", "section1");
        let v2 = visual_on_page("v2", "section1");

        let bookmark = Bookmark::build("Show V1", &[&v1], &[&v2], None).unwrap();
        assert_eq!(bookmark.page_id(), Some("section1"));
        assert_eq!(bookmark.target_ids(), ["v1".to_string(), "v2".to_string()]);
        assert!(bookmark.id().starts_with("Bookmark"));
        assert_ne!(bookmark.id(), bookmark.display_name());

        let record = bookmark.record();
        assert_eq!(record["explorationState"]["activeSection"], json!("section1"));
        let containers = &record["explorationState"]["sections"]["section1"]["visualContainers"];
        assert_eq!(containers["v1"]["singleVisual"]["display"]["mode"], json!("show"));
        assert_eq!(containers["v2"]["singleVisual"]["display"]["mode"], json!("hidden"));
        assert_eq!(record["options"]["targetVisualNames"], json!(["v1", "v2"]));
    }

    #[test]
    fn build_with_no_targets_leaves_page_empty() {
        let bookmark = Bookmark::build("Empty", &[], &[], None).unwrap();
        assert_eq!(bookmark.page_id(), None);
        assert!(bookmark.target_ids().is_empty());
        assert_eq!(bookmark.record()["explorationState"]["activeSection"], json!(""));
        assert_eq!(
            bookmark.record()["explorationState"]["sections"],
            json!({})
        );
    }

    #[test]
    fn build_rejects_cross_page_targets() {
        let v1 = visual_on_page("v1", "section1");
        let v2 = visual_on_page("v2", "section2");
        let err = Bookmark::build("Bad", &[&v1], &[&v2], None).unwrap_err();
        assert!(matches!(err, ModelError::AmbiguousPage));
    }

    #[test]
    fn explicit_target_set_wins() {
        let v1 = visual_on_page("v1", "section1");
        let v2 = visual_on_page("v2", "section1");
        let bookmark = Bookmark::build("Partial", &[&v1], &[&v2], Some(&[&v1])).unwrap();
        assert_eq!(bookmark.target_ids(), ["v1".to_string()]);
    }

    #[test]
    fn parse_round_trips_built_record() {
        let mut visuals = VisualCollection::new();
        visuals.push(visual_on_page("v1", "section1"));
        visuals.push(visual_on_page("v2", "section1"));

        let built = {
            let v1 = visuals.by_id("v1").unwrap();
            let v2 = visuals.by_id("v2").unwrap();
            Bookmark::build("Show V1", &[v1], &[v2], None).unwrap()
        };

        let parsed = Bookmark::from_value(built.record(), &visuals).unwrap();
        assert_eq!(parsed.id(), built.id());
        assert_eq!(parsed.page_id(), Some("section1"));
        assert_eq!(parsed.show_ids(), ["v1".to_string()]);
        assert_eq!(parsed.hide_ids(), ["v2".to_string()]);
    }

    #[test]
    fn parse_fails_on_unresolvable_target() {
        let visuals = VisualCollection::new();
        let record = json!({
            "displayName": "Ghost",
            "name": "Bookmarkdeadbeef",
            "explorationState": {"version": "1.3", "activeSection": "s", "sections": {}},
            "options": {"targetVisualNames": ["ghost"]}
        });
        let err = Bookmark::from_value(&record, &visuals).unwrap_err();
        assert!(matches!(err, ModelError::VisualNotFound(id) if id == "ghost"));
    }

    #[test]
    fn group_concatenates_targets_without_dedup() {
        let v1 = visual_on_page("v1", "section1");
        let v2 = visual_on_page("v2", "section1");
        let b1 = Bookmark::build("One", &[&v1], &[&v2], None).unwrap();
        let b2 = Bookmark::build("Two", &[&v2], &[&v1], None).unwrap();

        let group = BookmarkGroup::build("Toggle", vec![b1, b2]);
        assert_eq!(
            group.target_visual_ids(),
            ["v1", "v2", "v2", "v1"].map(String::from)
        );
        assert_eq!(group.page_id().unwrap(), Some("section1".to_string()));
    }

    #[test]
    fn group_page_ambiguity_is_rejected() {
        let v1 = visual_on_page("v1", "section1");
        let v2 = visual_on_page("v2", "section2");
        let b1 = Bookmark::build("One", &[&v1], &[], None).unwrap();
        let b2 = Bookmark::build("Two", &[&v2], &[], None).unwrap();

        let group = BookmarkGroup::build("Mixed", vec![b1, b2]);
        assert!(matches!(group.page_id(), Err(ModelError::AmbiguousPage)));
    }

    #[test]
    fn entry_classification_by_children() {
        let mut visuals = VisualCollection::new();
        visuals.push(visual_on_page("v1", "section1"));
        let v1 = visuals.by_id("v1").unwrap();
        let leaf = Bookmark::build("Leaf", &[v1], &[], None).unwrap();
        let group = BookmarkGroup::build("Group", vec![leaf.clone()]);

        let entry = BookmarkEntry::from_value(leaf.record(), &visuals).unwrap();
        assert!(matches!(entry, BookmarkEntry::Single(_)));

        let entry = BookmarkEntry::from_value(&group.to_record(), &visuals).unwrap();
        assert!(matches!(entry, BookmarkEntry::Group(_)));
    }

    #[test]
    fn summary_reads_raw_records() {
        let v1 = visual_on_page("v1", "section1");
        let bookmark = Bookmark::build("Solo", &[&v1], &[], None).unwrap();
        let group = BookmarkGroup::build("Wrap", vec![bookmark]);

        let summary = BookmarkSummary::from_record(&group.to_record());
        assert_eq!(summary.display_name, "Wrap");
        assert_eq!(summary.children.len(), 1);
        assert_eq!(summary.page_id, Some("section1".to_string()));
        assert_eq!(summary.visual_ids, ["v1".to_string()]);
        assert_eq!(summary.children[0].display_name, "Solo");
    }
}
