//! The document root: pages, the visual collection, and the bookmark
//! aggregate, orchestrating decode-on-load and encode-on-save.
//!
//! The root consumes one decoded layout structure from the archive
//! collaborator and hands an equivalent text blob back on [`Report::persist`].
//! Everything in between is an in-memory structural edit; access must be
//! serialized by the caller.

use log::debug;
use serde_json::{Map, Value};

use crate::bookmark::{Bookmark, BookmarkEntry, BookmarkGroup, BookmarkSummary};
use crate::collection::VisualCollection;
use crate::error::ModelError;
use crate::page::{Page, PageSummary};
use crate::visual::{Visual, VisualSummary};

/// Configuration of one bookmark inside a group build: display name plus
/// show/hide visual ids.
#[derive(Debug, Clone)]
pub struct BookmarkSpec {
    pub name: String,
    pub show: Vec<String>,
    pub hide: Vec<String>,
}

/// The editable in-memory model of one report-layout document.
pub struct Report {
    /// Remaining top-level fields of the layout; `sections` and `config`
    /// are re-attached at persist time.
    root: Value,
    pages: Vec<Page>,
    visuals: VisualCollection,
    /// The decoded root `config` layer, bookmarks drained out.
    config: Value,
    /// Raw bookmark aggregate entries, in document order.
    bookmarks: Vec<Value>,
    config_key: bool,
    bookmarks_key: bool,
}

impl Report {
    /// Build the model from the layout text blob.
    pub fn from_layout_str(text: &str) -> Result<Self, ModelError> {
        let root: Value = serde_json::from_str(text).map_err(ModelError::MalformedDocument)?;
        Self::from_layout_value(root)
    }

    /// Build the model from an already-deserialized layout structure.
    pub fn from_layout_value(mut root: Value) -> Result<Self, ModelError> {
        let map = root.as_object_mut().ok_or(ModelError::NotAnObject)?;

        let sections = match map.remove("sections") {
            Some(Value::Array(sections)) => sections,
            Some(_) => return Err(ModelError::NotAnObject),
            None => Vec::new(),
        };

        let mut pages = Vec::with_capacity(sections.len());
        let mut visuals = VisualCollection::new();
        for mut section in sections {
            let display_name = section["displayName"].as_str().unwrap_or_default().to_string();
            let page_id = section["name"].as_str().unwrap_or_default().to_string();
            let containers = section
                .as_object_mut()
                .ok_or(ModelError::NotAnObject)?
                .remove("visualContainers");
            if let Some(Value::Array(containers)) = containers {
                for container in containers {
                    let mut visual = Visual::from_value(container)?;
                    visual.assign_page(&display_name, &page_id);
                    visuals.push(visual);
                }
            }
            pages.push(Page::new(section)?);
        }

        // The root config is itself a layered field; it carries the bookmark
        // aggregate.
        let config_key = map.contains_key("config");
        let mut config = match map.remove("config") {
            Some(Value::String(text)) => {
                serde_json::from_str(&text).map_err(|source| ModelError::MalformedLayer {
                    field: "config".to_string(),
                    source,
                })?
            }
            Some(structured) => structured,
            None => Value::Object(Map::new()),
        };
        // Drain the aggregate but keep the key in place, so re-encoding
        // preserves the original key order of the config layer.
        let bookmarks_key = config.get("bookmarks").is_some();
        let bookmarks = match config.get_mut("bookmarks").map(Value::take) {
            Some(Value::Array(entries)) => entries,
            _ => Vec::new(),
        };

        debug!(
            "loaded layout: {} pages, {} visuals, {} bookmark entries",
            pages.len(),
            visuals.len(),
            bookmarks.len()
        );

        Ok(Self {
            root,
            pages,
            visuals,
            config,
            bookmarks,
            config_key,
            bookmarks_key,
        })
    }

    // ── Pages ────────────────────────────────────────────────────────────

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// First page with the given display name.
    pub fn page_by_name(&self, display_name: &str) -> Result<&Page, ModelError> {
        self.pages
            .iter()
            .find(|p| p.display_name() == display_name)
            .ok_or_else(|| ModelError::PageNotFound(display_name.to_string()))
    }

    pub fn page_summaries(&self) -> Vec<PageSummary> {
        self.pages
            .iter()
            .map(|page| PageSummary {
                ordinal: page.ordinal(),
                display_name: page.display_name().to_string(),
                name: page.name().to_string(),
                visual_count: self
                    .visuals
                    .iter()
                    .filter(|v| v.page_id() == Some(page.name()))
                    .count(),
            })
            .collect()
    }

    /// Duplicate a page: fresh page id, ` copy` display name, ordinal right
    /// after the source with every later page shifted by one, and a fresh id
    /// for every cloned visual. Returns the new page id.
    pub fn duplicate_page(&mut self, display_name: &str) -> Result<String, ModelError> {
        let source = self.page_by_name(display_name)?;
        let source_id = source.name().to_string();
        let source_ordinal = source.ordinal();
        let copy = source.duplicate(source_ordinal + 1);

        for page in &mut self.pages {
            if page.ordinal() > source_ordinal {
                page.set_ordinal(page.ordinal() + 1);
            }
        }

        let copy_id = copy.name().to_string();
        let copy_name = copy.display_name().to_string();

        let mut clones = Vec::new();
        for visual in self.visuals.iter() {
            if visual.page_id() == Some(source_id.as_str()) {
                let mut clone = visual.duplicate()?;
                clone.assign_page(&copy_name, &copy_id);
                clones.push(clone);
            }
        }
        debug!(
            "duplicated page {display_name:?} -> {copy_id} ({} visuals)",
            clones.len()
        );
        for clone in clones {
            self.visuals.push(clone);
        }
        self.pages.push(copy);
        Ok(copy_id)
    }

    // ── Visuals ──────────────────────────────────────────────────────────

    pub fn visuals(&self) -> &VisualCollection {
        &self.visuals
    }

    pub fn visuals_mut(&mut self) -> &mut VisualCollection {
        &mut self.visuals
    }

    pub fn visual_by_id(&self, id: &str) -> Result<&Visual, ModelError> {
        self.visuals
            .by_id(id)
            .ok_or_else(|| ModelError::VisualNotFound(id.to_string()))
    }

    pub fn visual_by_id_mut(&mut self, id: &str) -> Result<&mut Visual, ModelError> {
        self.visuals
            .by_id_mut(id)
            .ok_or_else(|| ModelError::VisualNotFound(id.to_string()))
    }

    pub fn visuals_on_page(&self, display_name: &str) -> Result<Vec<&Visual>, ModelError> {
        let page_id = self.page_by_name(display_name)?.name().to_string();
        Ok(self
            .visuals
            .iter()
            .filter(|v| v.page_id() == Some(page_id.as_str()))
            .collect())
    }

    /// Insert a visual (template-built, duplicated, or parsed) into the
    /// named page. Returns the visual's id.
    pub fn insert_visual(
        &mut self,
        page_display_name: &str,
        mut visual: Visual,
    ) -> Result<String, ModelError> {
        let page = self.page_by_name(page_display_name)?;
        let page_id = page.name().to_string();
        visual.assign_page(page_display_name, &page_id);
        let id = visual.id().to_string();
        debug!("inserting visual {id} into page {page_display_name:?}");
        self.visuals.push(visual);
        Ok(id)
    }

    /// Rebuild the named page without one of its visuals. The removed node
    /// is returned and loses its page assignment.
    pub fn remove_visual(&mut self, id: &str) -> Result<Visual, ModelError> {
        let page_id = self
            .visual_by_id(id)?
            .page_id()
            .unwrap_or_default()
            .to_string();
        let drained = self.visuals.drain_page(&page_id);
        let mut removed = None;
        for visual in drained {
            if removed.is_none() && visual.id() == id {
                removed = Some(visual);
            } else {
                self.visuals.push(visual);
            }
        }
        let mut removed = removed.ok_or_else(|| ModelError::VisualNotFound(id.to_string()))?;
        removed.clear_page();
        Ok(removed)
    }

    /// Structured rows for every visual, or for one page when `page_name`
    /// is given. Group display names are resolved per page.
    pub fn visual_summaries(
        &mut self,
        page_name: Option<&str>,
    ) -> Result<Vec<VisualSummary>, ModelError> {
        let page_filter = match page_name {
            Some(name) => Some(self.page_by_name(name)?.name().to_string()),
            None => None,
        };

        let mut rows = Vec::new();
        for visual in self.visuals.iter_mut() {
            if let Some(filter) = &page_filter {
                if visual.page_id() != Some(filter.as_str()) {
                    continue;
                }
            }
            rows.push(visual.summary()?);
        }

        // Resolve parent group ids to display names; group containers live
        // on the same page as their members.
        let groups: Vec<(String, String)> = self
            .visuals
            .iter()
            .filter_map(Visual::group_info)
            .collect();
        for row in &mut rows {
            if let Some(group_id) = &row.group_id {
                row.group_name = groups
                    .iter()
                    .find(|(id, _)| id == group_id)
                    .map(|(_, name)| name.clone());
            }
        }
        Ok(rows)
    }

    // ── Bookmarks ────────────────────────────────────────────────────────

    /// Assemble one bookmark from show/hide visual ids, resolved through the
    /// collection.
    pub fn build_bookmark(
        &self,
        name: &str,
        show_ids: &[&str],
        hide_ids: &[&str],
    ) -> Result<Bookmark, ModelError> {
        let show = self.visuals.by_ids(show_ids)?;
        let hide = self.visuals.by_ids(hide_ids)?;
        Bookmark::build(name, &show, &hide, None)
    }

    /// Assemble a bookmark group from per-bookmark show/hide id sets.
    pub fn build_bookmark_group(
        &self,
        group_name: &str,
        specs: &[BookmarkSpec],
    ) -> Result<BookmarkGroup, ModelError> {
        let mut children = Vec::with_capacity(specs.len());
        for spec in specs {
            let show: Vec<&str> = spec.show.iter().map(String::as_str).collect();
            let hide: Vec<&str> = spec.hide.iter().map(String::as_str).collect();
            children.push(self.build_bookmark(&spec.name, &show, &hide)?);
        }
        Ok(BookmarkGroup::build(group_name, children))
    }

    /// Append a built bookmark into the aggregate.
    pub fn insert_bookmark(&mut self, bookmark: &Bookmark) {
        self.bookmarks.push(bookmark.record().clone());
    }

    /// Append a built group into the aggregate.
    pub fn insert_bookmark_group(&mut self, group: &BookmarkGroup) {
        self.bookmarks.push(group.to_record());
    }

    /// Parse the aggregate into typed entries, resolving every visual
    /// reference.
    pub fn bookmarks(&self) -> Result<Vec<BookmarkEntry>, ModelError> {
        self.bookmarks
            .iter()
            .map(|record| BookmarkEntry::from_value(record, &self.visuals))
            .collect()
    }

    pub fn bookmark_summaries(&self) -> Vec<BookmarkSummary> {
        self.bookmarks.iter().map(BookmarkSummary::from_record).collect()
    }

    /// Build a bookmark-navigator visual wired to the given group. The
    /// group's first child becomes the selected bookmark.
    pub fn bookmark_navigator(&self, group: &BookmarkGroup) -> Result<Visual, ModelError> {
        let mut navigator = Visual::from_template("bookmark-navigator")?;
        navigator.set(
            "bookmark_group",
            Value::String(format!("'{}'", group.id())),
        )?;
        if let Some(first) = group.children().first() {
            navigator.set(
                "selected_bookmark",
                Value::String(format!("'{}'", first.id())),
            )?;
        }
        Ok(navigator)
    }

    // ── Persistence ──────────────────────────────────────────────────────

    /// Encode every visual, re-encode the root config layer, and serialize
    /// the whole document back to text. The model stays editable afterwards.
    pub fn persist(&mut self) -> Result<String, ModelError> {
        for visual in self.visuals.iter_mut() {
            visual.dump()?;
        }

        let mut sections = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            let containers: Vec<Value> = self
                .visuals
                .iter()
                .filter(|v| v.page_id() == Some(page.name()))
                .map(|v| v.record().clone())
                .collect();
            sections.push(page.to_section(containers));
        }

        let map = self.root.as_object_mut().ok_or(ModelError::NotAnObject)?;
        map.insert("sections".to_string(), Value::Array(sections));

        if self.config_key || !self.bookmarks.is_empty() {
            let mut config = self.config.clone();
            if self.bookmarks_key || !self.bookmarks.is_empty() {
                if let Some(m) = config.as_object_mut() {
                    m.insert("bookmarks".to_string(), Value::Array(self.bookmarks.clone()));
                }
            }
            let text = serde_json::to_string(&config).map_err(|source| ModelError::EncodeLayer {
                field: "config".to_string(),
                source,
            })?;
            map.insert("config".to_string(), Value::String(text));
        }

        let out = serde_json::to_string(&self.root).map_err(ModelError::SerializeDocument)?;
        debug!("persisted layout: {} bytes", out.len());

        // Strip the transient keys again so a later persist starts clean.
        let map = self.root.as_object_mut().ok_or(ModelError::NotAnObject)?;
        map.remove("sections");
        map.remove("config");

        Ok(out)
    }
}
