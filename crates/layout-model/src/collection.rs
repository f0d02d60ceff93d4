//! Ordered collection of visuals with positional and id addressing.

use crate::error::ModelError;
use crate::visual::Visual;

/// An ordered sequence of [`Visual`] nodes.
///
/// Dual addressing: by integer position or by the node's `id` attribute.
/// Duplicate ids are not rejected on insert; id lookups return the first
/// match. Append-only from the document root's perspective.
#[derive(Debug, Default)]
pub struct VisualCollection {
    items: Vec<Visual>,
}

impl VisualCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn push(&mut self, visual: Visual) {
        self.items.push(visual);
    }

    pub fn get(&self, position: usize) -> Option<&Visual> {
        self.items.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut Visual> {
        self.items.get_mut(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Visual> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Visual> {
        self.items.iter_mut()
    }

    /// First visual whose `id` attribute equals `id`.
    pub fn by_id(&self, id: &str) -> Option<&Visual> {
        self.items.iter().find(|v| v.id() == id)
    }

    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Visual> {
        self.items.iter_mut().find(|v| v.id() == id)
    }

    /// Resolve a list of ids, preserving the input order.
    ///
    /// # Errors
    ///
    /// Any id without a matching node is a lookup failure, never an empty
    /// placeholder.
    pub fn by_ids<'a>(&'a self, ids: &[&str]) -> Result<Vec<&'a Visual>, ModelError> {
        ids.iter()
            .map(|id| {
                self.by_id(id)
                    .ok_or_else(|| ModelError::VisualNotFound((*id).to_string()))
            })
            .collect()
    }

    /// Drop every visual belonging to the given page id, returning the
    /// removed nodes. Used when a page is rebuilt without one of its
    /// visuals.
    pub fn drain_page(&mut self, page_id: &str) -> Vec<Visual> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.items.len());
        for visual in self.items.drain(..) {
            if visual.page_id() == Some(page_id) {
                removed.push(visual);
            } else {
                kept.push(visual);
            }
        }
        self.items = kept;
        removed
    }
}

impl<'a> IntoIterator for &'a VisualCollection {
    type Item = &'a Visual;
    type IntoIter = std::slice::Iter<'a, Visual>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
