//! Cascading selection state
//!
//! The three dependent selections (content kind, container format, quality
//! label) live in one explicit state object with pure transition methods.
//! UI widgets render from the accessors and never reach into the catalog
//! themselves.
//!
//! Invariant held after every transition: `container_format` names a key of
//! the current catalog subtree (or is `None`), and `quality_label` is an
//! element of that key's quality list (or is `None`).

use super::{ContentKind, FormatCatalog};

/// The single active selection, kept consistent with the catalog
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    catalog: FormatCatalog,
    content_kind: ContentKind,
    container_format: Option<String>,
    quality_label: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the catalog wholesale and re-derive both dependent selections
    /// for the current content kind
    pub fn replace_catalog(&mut self, catalog: FormatCatalog) {
        self.catalog = catalog;
        self.set_content_kind(self.content_kind);
    }

    /// Switch the content kind; the container format falls back to the first
    /// key of the new subtree and the quality cascades from it
    pub fn set_content_kind(&mut self, kind: ContentKind) {
        self.content_kind = kind;

        let first_format = self.catalog.for_kind(kind).keys().next().cloned();
        match first_format {
            Some(format) => self.set_container_format(format),
            None => {
                self.container_format = None;
                self.quality_label = None;
            }
        }
    }

    /// Pick a container format; the quality falls back to the best entry of
    /// its list. A format absent from the catalog collapses both dependent
    /// selections instead of breaking the invariant.
    pub fn set_container_format(&mut self, format: String) {
        match self.catalog.for_kind(self.content_kind).get(&format) {
            Some(labels) => {
                self.quality_label = labels.first().cloned();
                self.container_format = Some(format);
            }
            None => {
                self.container_format = None;
                self.quality_label = None;
            }
        }
    }

    /// Pick a quality label out of the current container's list
    pub fn set_quality_label(&mut self, label: String) {
        let valid = self
            .container_format
            .as_ref()
            .and_then(|format| self.catalog.for_kind(self.content_kind).get(format))
            .map(|labels| labels.contains(&label))
            .unwrap_or(false);

        if valid {
            self.quality_label = Some(label);
        }
    }

    /// Empty URL or failed fetch: drop the catalog and both dependent
    /// selections. A valid terminal sub-state, not an error.
    pub fn clear(&mut self) {
        self.catalog = FormatCatalog::default();
        self.container_format = None;
        self.quality_label = None;
    }

    pub fn content_kind(&self) -> ContentKind {
        self.content_kind
    }

    pub fn container_format(&self) -> Option<&str> {
        self.container_format.as_deref()
    }

    pub fn quality_label(&self) -> Option<&str> {
        self.quality_label.as_deref()
    }

    /// Container formats selectable for the current kind, ascending lexical
    pub fn container_options(&self) -> Vec<String> {
        self.catalog
            .for_kind(self.content_kind)
            .keys()
            .cloned()
            .collect()
    }

    /// Quality labels selectable for the current container, descending
    pub fn quality_options(&self) -> Vec<String> {
        self.container_format
            .as_ref()
            .and_then(|format| self.catalog.for_kind(self.content_kind).get(format))
            .cloned()
            .unwrap_or_default()
    }
}
