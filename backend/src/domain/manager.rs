//! Per-kind list state: snapshot cache, filter pipeline, projection.
//!
//! The manager holds three derived sets. `all` is whatever snapshot the
//! live feed or a one-shot list call delivered last; `search_filtered`
//! narrows it by the search text; `fully_filtered` narrows further by the
//! status and type dropdowns. Every input change recomputes downstream
//! sets in that fixed order, always starting from `all`, so filters never
//! compound on an already-narrowed list.
//!
//! Snapshots REPLACE the cache wholesale. When two reloads race, the last
//! callback to fire wins and no merging ever happens; an older response
//! landing after a newer one shows stale data until the next reload. That
//! race is accepted by design and there is no request fencing.

use super::catalog::{CatalogRecord, RecordId};
use super::view::{render_list, RenderCard, ViewNode};

/// In-memory list state for one record kind.
#[derive(Debug, Clone)]
pub struct EntityManager<T> {
    all: Vec<T>,
    search: String,
    status_filter: Option<String>,
    type_filter: Option<String>,
    search_filtered: Vec<T>,
    fully_filtered: Vec<T>,
}

impl<T: CatalogRecord> EntityManager<T> {
    /// Create an empty manager with no filters applied.
    pub fn new() -> Self {
        Self {
            all: Vec::new(),
            search: String::new(),
            status_filter: None,
            type_filter: None,
            search_filtered: Vec::new(),
            fully_filtered: Vec::new(),
        }
    }

    /// Replace the cached list with a fresh snapshot and recompute.
    ///
    /// Always a full replacement: the last snapshot applied wins.
    pub fn apply_snapshot(&mut self, records: Vec<T>) {
        self.all = records;
        self.recompute();
    }

    /// Update the search text and recompute.
    pub fn set_search(&mut self, query: &str) {
        self.search = query.to_lowercase();
        self.recompute();
    }

    /// Update the status dropdown selection; `None` shows every status.
    pub fn set_status_filter(&mut self, status: Option<String>) {
        self.status_filter = status.map(|value| value.to_lowercase());
        self.recompute();
    }

    /// Update the type dropdown selection; `None` shows every type.
    pub fn set_type_filter(&mut self, type_key: Option<String>) {
        self.type_filter = type_key.map(|value| value.to_lowercase());
        self.recompute();
    }

    /// Full cached snapshot, in gateway order.
    pub fn all(&self) -> &[T] {
        &self.all
    }

    /// Records surviving every filter, in gateway order.
    pub fn visible(&self) -> &[T] {
        &self.fully_filtered
    }

    /// Count pair shown next to the filter controls.
    pub fn counts(&self) -> (usize, usize) {
        (self.fully_filtered.len(), self.all.len())
    }

    /// Capture an item for the edit form.
    pub fn find(&self, id: RecordId) -> Option<&T> {
        self.all.iter().find(|record| record.id() == id)
    }

    /// Optimistically drop a record ahead of the confirming reload.
    pub fn remove_local(&mut self, id: RecordId) {
        self.all.retain(|record| record.id() != id);
        self.recompute();
    }

    /// Optimistically replace a record ahead of the confirming reload.
    pub fn update_local(&mut self, updated: T) {
        if let Some(slot) = self
            .all
            .iter_mut()
            .find(|record| record.id() == updated.id())
        {
            *slot = updated;
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.search_filtered = if self.search.is_empty() {
            self.all.clone()
        } else {
            self.all
                .iter()
                .filter(|record| record.search_haystack().contains(&self.search))
                .cloned()
                .collect()
        };

        let mut narrowed = self.search_filtered.clone();
        if let Some(status) = &self.status_filter {
            narrowed.retain(|record| &record.status_key() == status);
        }
        if let Some(type_key) = &self.type_filter {
            narrowed.retain(|record| record.type_key().as_ref() == Some(type_key));
        }
        self.fully_filtered = narrowed;
    }
}

impl<T: CatalogRecord + RenderCard> EntityManager<T> {
    /// Project the visible records to their list view.
    pub fn render(&self, empty_message: &str) -> ViewNode {
        render_list(&self.fully_filtered, empty_message)
    }
}

impl<T: CatalogRecord> Default for EntityManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
