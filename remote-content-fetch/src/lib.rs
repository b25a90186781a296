//! Remote Content Fetch - Repository Access
//!
//! Everything that talks to the content repository: the fetch primitive and
//! image probe traits with their reqwest implementations, the per-panel
//! [`JsonApi`] state (fetch cache and live language prefix), the content list
//! query, image relationship resolution and style-derivative probing.

pub mod api;
pub mod cache;
pub mod content;
pub mod fetcher;
pub mod probe;
pub mod relationship;

pub use api::{filter_clause, Fetched, JsonApi};
pub use cache::FetchCache;
pub use content::ContentFetcher;
pub use fetcher::{
    build_client, status_code_error, status_error, HttpFetcher, HttpSettings, ResourceFetcher,
};
pub use probe::{style_candidate, HttpImageProbe, ImageProbe, ImageStyleProber, ProbeOutcome, StyleCandidate};
pub use relationship::{RelationshipResolver, Resolution};
