//! Remote Content Core - Data Types and Configuration
//!
//! Descriptor, content model, JSON:API document shapes and query trace types
//! shared by the fetch and render crates. No network I/O happens here.

pub mod collation;
pub mod config;
pub mod content;
pub mod descriptor;
pub mod enums;
pub mod error;
pub mod trace;

pub use collation::{collation_key, compare_titles, filter_by_title, sort_by_title};
pub use config::{resolve_descriptor, PageContext, RawComponentConfig, Scalar};
pub use content::{
    placeholder_image_url, CollectionDocument, ContentItem, RelationshipRef, Resource, ResourceDocument,
    ResolvedImage, TaxonomyTermRef, DEFAULT_ALT_TEXT, DIGITAL_ASSET_TYPE, PLACEHOLDER_ALT_TEXT,
};
pub use descriptor::{ContentQueryDescriptor, ContentTarget, TaxonomyFilter, DEFAULT_API_PATH};
pub use enums::{RemoteType, RemoteTypeParseError, SortKey};
pub use error::{ConfigError, FetchError};
pub use trace::{QueryTrace, TraceEntry, TraceKind};

/// Result type for requests against the content repository.
pub type FetchResult<T> = Result<T, FetchError>;
