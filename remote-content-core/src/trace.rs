//! Query trace: a hierarchical record of the requests made in one render pass.

use serde::{Deserialize, Serialize};

/// What a traced request was for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraceKind {
    /// Unfiltered collection URL for the selected entity type.
    ContentQuery,
    Taxonomy,
    /// Collection URL after taxonomy clauses were applied.
    FilteredContent,
    Node,
    Image,
    DigitalAsset,
    File,
}

impl TraceKind {
    pub fn label(&self) -> &'static str {
        match self {
            TraceKind::ContentQuery => "Remote type",
            TraceKind::Taxonomy => "Taxonomy",
            TraceKind::FilteredContent => "Filtered content",
            TraceKind::Node => "Node",
            TraceKind::Image => "Image",
            TraceKind::DigitalAsset => "Image (DAM)",
            TraceKind::File => "File",
        }
    }

    /// `false` for node entries, which group an item's lookups rather than
    /// record a request of their own.
    pub fn is_request(&self) -> bool {
        !matches!(self, TraceKind::Node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub kind: TraceKind,
    pub url: String,
    /// Served from the per-panel fetch cache.
    pub cached: bool,
    pub children: Vec<TraceEntry>,
}

impl TraceEntry {
    pub fn new(kind: TraceKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            cached: false,
            children: Vec::new(),
        }
    }

    pub fn cached(mut self, cached: bool) -> Self {
        self.cached = cached;
        self
    }

    pub fn with_children(mut self, children: Vec<TraceEntry>) -> Self {
        self.children = children;
        self
    }
}

/// Ordered, top-level trace entries for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryTrace {
    entries: Vec<TraceEntry>,
}

impl QueryTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: TraceEntry) {
        self.entries.push(entry);
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = TraceEntry>) {
        self.entries.extend(entries);
    }

    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// URLs that went over the network, depth first, cache hits excluded.
    pub fn requested_urls(&self) -> Vec<&str> {
        fn walk<'a>(entries: &'a [TraceEntry], out: &mut Vec<&'a str>) {
            for entry in entries {
                if entry.kind.is_request() && !entry.cached {
                    out.push(&entry.url);
                }
                walk(&entry.children, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.entries, &mut out);
        out
    }

    /// Total number of entries, nested ones included.
    pub fn len(&self) -> usize {
        fn count(entries: &[TraceEntry]) -> usize {
            entries.iter().map(|e| 1 + count(&e.children)).sum()
        }
        count(&self.entries)
    }
}
