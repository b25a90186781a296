//! Remote Content Test Utilities
//!
//! Shared test infrastructure for the workspace:
//! - In-memory mock fetcher and image probe that record every request
//! - JSON:API fixture builders for nodes, media, files, assets and terms
//! - Proptest generators for titles

pub use remote_content_core::{
    ContentItem, ContentQueryDescriptor, ContentTarget, FetchError, FetchResult, PageContext,
    RemoteType, ResolvedImage, TaxonomyFilter,
};
pub use remote_content_fetch::{status_code_error, ImageProbe, ProbeOutcome, ResourceFetcher};

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

/// Base address used by fixtures.
pub const BASE_URL: &str = "https://cms.example.com";

// ============================================================================
// MOCK FETCHER
// ============================================================================

#[derive(Debug, Clone)]
enum MockResponse {
    Json(Value),
    Status(u16),
    Transport(String),
}

/// In-memory [`ResourceFetcher`].
///
/// URLs without a registered response answer 404. Every request is recorded,
/// cache hits excluded, so tests can count network calls.
#[derive(Debug, Default)]
pub struct MockFetcher {
    responses: Mutex<HashMap<String, MockResponse>>,
    delays: Mutex<HashMap<String, Duration>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(self, url: impl Into<String>, body: Value) -> Self {
        self.insert(url.into(), MockResponse::Json(body));
        self
    }

    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.insert(url.into(), MockResponse::Status(status));
        self
    }

    pub fn with_transport_error(self, url: impl Into<String>, reason: impl Into<String>) -> Self {
        self.insert(url.into(), MockResponse::Transport(reason.into()));
        self
    }

    /// Delay the response for `url`, to shuffle completion order.
    pub fn with_delay(self, url: impl Into<String>, delay: Duration) -> Self {
        if let Ok(mut delays) = self.delays.lock() {
            delays.insert(url.into(), delay);
        }
        self
    }

    fn insert(&self, url: String, response: MockResponse) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.insert(url, response);
        }
    }

    /// Requested URLs in call order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn request_count(&self, url: &str) -> usize {
        self.requests().iter().filter(|r| r.as_str() == url).count()
    }

    pub fn total_requests(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl ResourceFetcher for MockFetcher {
    async fn get_json(&self, url: &str) -> FetchResult<Value> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        let delay = self.delays.lock().ok().and_then(|d| d.get(url).copied());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let response = self
            .responses
            .lock()
            .ok()
            .and_then(|r| r.get(url).cloned());
        match response {
            Some(MockResponse::Json(body)) => Ok(body),
            Some(MockResponse::Status(status)) => Err(status_code_error(status, url)),
            Some(MockResponse::Transport(reason)) => Err(FetchError::Transport {
                url: url.to_string(),
                reason,
            }),
            None => Err(status_code_error(404, url)),
        }
    }
}

// ============================================================================
// MOCK IMAGE PROBE
// ============================================================================

/// [`ImageProbe`] that loads only the URLs it was told about.
#[derive(Debug, Default)]
pub struct MockImageProbe {
    loadable: HashSet<String>,
    requests: Mutex<Vec<String>>,
}

impl MockImageProbe {
    /// A probe for which every load fails.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_loadable(mut self, url: impl Into<String>) -> Self {
        self.loadable.insert(url.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ImageProbe for MockImageProbe {
    async fn load(&self, url: &str) -> ProbeOutcome {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        if self.loadable.contains(url) {
            ProbeOutcome::Loaded
        } else {
            ProbeOutcome::Failed
        }
    }
}

// ============================================================================
// DESCRIPTORS
// ============================================================================

/// Configured descriptor for a built-in type against [`BASE_URL`].
pub fn descriptor(remote_type: RemoteType) -> ContentQueryDescriptor {
    let image_field = remote_type
        .builtin_image_field()
        .unwrap_or("field_image")
        .to_string();
    ContentQueryDescriptor {
        base_url: Some(BASE_URL.to_string()),
        target: Some(ContentTarget {
            remote_type,
            entity_type: remote_type.as_str().to_string(),
            image_field,
        }),
        layout_style_class: "cards".to_string(),
        ..Default::default()
    }
}

// ============================================================================
// JSON:API FIXTURES
// ============================================================================

pub mod fixtures {
    //! JSON:API resource builders.

    use serde_json::{json, Map, Value};

    /// `{"data": [...]}`
    pub fn collection(resources: Vec<Value>) -> Value {
        json!({ "data": resources })
    }

    /// `{"data": {...}}`
    pub fn single(resource: Value) -> Value {
        json!({ "data": resource })
    }

    /// Content node with an optional image relationship `(type, id)`.
    pub fn node(
        id: &str,
        title: &str,
        alias: Option<&str>,
        image_field: &str,
        image: Option<(&str, &str)>,
    ) -> Value {
        let image_data = match image {
            Some((kind, media_id)) => json!({ "id": media_id, "type": kind }),
            None => Value::Null,
        };
        json!({
            "id": id,
            "type": "node--content",
            "attributes": {
                "title": title,
                "path": { "alias": alias }
            },
            "relationships": {
                image_field: { "data": image_data }
            }
        })
    }

    /// Untitled-image node list from titles, ids `n0`, `n1`, ...
    pub fn nodes_without_images(titles: &[&str], image_field: &str) -> Vec<Value> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| node(&format!("n{i}"), title, None, image_field, None))
            .collect()
    }

    /// Local media entity pointing at a file.
    pub fn media_image(id: &str, file_id: Option<&str>, alt: Option<&str>) -> Value {
        let data = match file_id {
            Some(file_id) => json!({
                "id": file_id,
                "type": "file--file",
                "meta": { "alt": alt }
            }),
            None => Value::Null,
        };
        json!({
            "id": id,
            "type": "media--image",
            "attributes": { "name": format!("media {id}") },
            "relationships": { "image": { "data": data } }
        })
    }

    /// File stored at `public://{relative}` and served from `/sites/default/files/{relative}`.
    pub fn file(id: &str, relative: &str) -> Value {
        json!({
            "id": id,
            "type": "file--file",
            "attributes": {
                "uri": {
                    "value": format!("public://{relative}"),
                    "url": format!("/sites/default/files/{relative}")
                }
            }
        })
    }

    /// Digital asset with named embed codes.
    pub fn dam_asset(id: &str, embeds: &[(&str, &str)], alt: Option<&str>, name: &str) -> Value {
        let codes: Map<String, Value> = embeds
            .iter()
            .map(|(style, href)| (style.to_string(), json!({ "href": href })))
            .collect();
        json!({
            "id": id,
            "type": "media--acquia_dam_image_asset",
            "attributes": {
                "name": name,
                "acquia_dam_alt_text": alt,
                "acquia_dam_embed_codes": codes
            }
        })
    }

    pub fn taxonomy_term(id: &str, name: &str) -> Value {
        json!({
            "id": id,
            "type": "taxonomy_term--tags",
            "attributes": { "name": name }
        })
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for panel inputs.

    use proptest::prelude::*;

    /// Title made of letters (accented included), digits and spaces.
    pub fn arb_title() -> impl Strategy<Value = String> {
        "[A-Za-z0-9ÀÉÎÕÜàéîõü ]{1,16}"
    }

    /// A list of titles for one collection response.
    pub fn arb_titles(max: usize) -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(arb_title(), 0..max)
    }

    /// Optional result limit, `None` meaning unlimited.
    pub fn arb_limit() -> impl Strategy<Value = Option<usize>> {
        prop_oneof![Just(None), (1usize..12).prop_map(Some)]
    }
}
