//! Per-panel access to the content repository's JSON:API.
//!
//! [`JsonApi`] owns everything that is scoped to one panel instance: the
//! fetcher, the fetch cache and the live language prefix. The prefix starts
//! from the descriptor and is cleared for good the first time a localized
//! query answers "not found"; every URL built afterwards omits it.

use crate::cache::FetchCache;
use crate::fetcher::ResourceFetcher;
use remote_content_core::{FetchError, FetchResult, Resource, ResourceDocument};
use serde_json::Value;
use std::sync::{Arc, RwLock};

/// A resource fetched by type and id.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub resource: Arc<Resource>,
    pub url: String,
    /// Served from the fetch cache without a request.
    pub cached: bool,
}

pub struct JsonApi {
    fetcher: Arc<dyn ResourceFetcher>,
    base_url: String,
    api_path: String,
    language: RwLock<Option<String>>,
    cache: FetchCache,
}

impl JsonApi {
    pub fn new(
        fetcher: Arc<dyn ResourceFetcher>,
        base_url: impl Into<String>,
        api_path: impl Into<String>,
        language_prefix: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            base_url: base_url.into(),
            api_path: api_path.into(),
            language: RwLock::new(language_prefix.filter(|p| !p.is_empty())),
            cache: FetchCache::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Current language prefix, e.g. `/fr`, or an empty string.
    pub fn language_prefix(&self) -> String {
        self.language
            .read()
            .ok()
            .and_then(|l| l.clone())
            .unwrap_or_default()
    }

    pub fn has_language(&self) -> bool {
        self.language.read().map(|l| l.is_some()).unwrap_or(false)
    }

    /// Drop the language prefix. Returns `true` if one was set.
    pub fn clear_language(&self) -> bool {
        match self.language.write() {
            Ok(mut language) => language.take().is_some(),
            Err(_) => false,
        }
    }

    /// `{base}{lang}/{api}/{resource_type}` with optional query clauses joined by `&`.
    pub fn collection_url(&self, resource_type: &str, clauses: &[String]) -> String {
        let url = format!(
            "{}{}/{}/{}",
            self.base_url,
            self.language_prefix(),
            self.api_path,
            resource_type
        );
        if clauses.is_empty() {
            url
        } else {
            format!("{url}?{}", clauses.join("&"))
        }
    }

    /// `{base}{lang}/{api}/{resource_type}/{id}`
    pub fn resource_url(&self, resource_type: &str, id: &str) -> String {
        format!("{}/{}", self.collection_url(resource_type, &[]), id)
    }

    /// Public page URL for a path alias, `#` when there is none.
    pub fn page_url(&self, path_alias: Option<&str>) -> String {
        format!(
            "{}{}{}",
            self.base_url,
            self.language_prefix(),
            path_alias.unwrap_or("#")
        )
    }

    /// GET without caching or language fallback.
    pub async fn get(&self, url: &str) -> FetchResult<Value> {
        self.fetcher.get_json(url).await
    }

    /// GET a URL built from the current language prefix.
    ///
    /// When the request answers 404 and the URL carried a prefix, the prefix
    /// is cleared and the URL rebuilt and requested exactly once more.
    /// Every URL requested is appended to `sent`, failed attempts included.
    /// Returns the body together with the URL that produced it.
    pub async fn get_localized<B>(
        &self,
        build: B,
        sent: &mut Vec<String>,
    ) -> FetchResult<(Value, String)>
    where
        B: Fn(&Self) -> String,
    {
        let localized = self.has_language();
        let url = build(self);
        sent.push(url.clone());
        match self.get(&url).await {
            Ok(body) => Ok((body, url)),
            Err(err) if err.is_not_found() && localized => {
                if self.clear_language() {
                    tracing::info!(%url, "Localized path not found; dropping language prefix");
                }
                let retry = build(self);
                sent.push(retry.clone());
                let body = self.get(&retry).await?;
                Ok((body, retry))
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch a single resource by type and id, consulting the cache first.
    pub async fn fetch_by_id(&self, resource_type: &str, id: &str) -> FetchResult<Fetched> {
        let url = self.resource_url(resource_type, id);
        if let Some(resource) = self.cache.get(&url) {
            tracing::trace!(%url, "Fetch cache hit");
            return Ok(Fetched {
                resource,
                url,
                cached: true,
            });
        }

        let body = self.get(&url).await?;
        let document: ResourceDocument =
            serde_json::from_value(body).map_err(|e| FetchError::Decode {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        let resource = Arc::new(document.data);
        self.cache.insert(url.clone(), resource.clone());
        Ok(Fetched {
            resource,
            url,
            cached: false,
        })
    }
}

impl std::fmt::Debug for JsonApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonApi")
            .field("base_url", &self.base_url)
            .field("api_path", &self.api_path)
            .field("language", &self.language_prefix())
            .field("cache", &self.cache)
            .finish()
    }
}

/// Equality filter clause, e.g. `filter[field_tags.id]=42`.
pub fn filter_clause(path: &str, value: &str) -> String {
    format!("filter[{path}]={}", urlencoding::encode(value))
}
