//! Primary content list query.

use crate::api::{filter_clause, JsonApi};
use futures_util::future::join_all;
use remote_content_core::{
    filter_by_title, sort_by_title, ContentItem, CollectionDocument, ContentQueryDescriptor, FetchError,
    FetchResult, QueryTrace, TaxonomyFilter, TaxonomyTermRef, TraceEntry, TraceKind,
};

/// Runs the list query for a descriptor.
pub struct ContentFetcher<'a> {
    api: &'a JsonApi,
    descriptor: &'a ContentQueryDescriptor,
}

impl<'a> ContentFetcher<'a> {
    pub fn new(api: &'a JsonApi, descriptor: &'a ContentQueryDescriptor) -> Self {
        Self { api, descriptor }
    }

    /// Fetch, filter, sort and limit the content list.
    ///
    /// The result is fully ordered and truncated before it is returned.
    /// Every request issued is appended to `trace`, including attempts that
    /// failed, and including them when the pass aborts.
    pub async fn list_content(&self, trace: &mut QueryTrace) -> FetchResult<Vec<ContentItem>> {
        let (entity_type, image_field) = match &self.descriptor.target {
            Some(target) => (target.entity_type.as_str(), target.image_field.as_str()),
            None => return Ok(Vec::new()),
        };

        let clauses = self.resolve_filter_clauses(trace).await?;

        let mut sent = Vec::new();
        let fetched = self
            .api
            .get_localized(|api| api.collection_url(entity_type, &clauses), &mut sent)
            .await;
        let kind = if self.descriptor.taxonomy_filters.is_empty() {
            TraceKind::ContentQuery
        } else {
            TraceKind::FilteredContent
        };
        trace.extend(sent.into_iter().map(|url| TraceEntry::new(kind, url)));
        let (body, url) = fetched?;

        let document: CollectionDocument =
            serde_json::from_value(body).map_err(|e| FetchError::Decode {
                url,
                reason: e.to_string(),
            })?;

        let mut items: Vec<ContentItem> = document
            .into_resources()
            .iter()
            .map(|resource| ContentItem::from_resource(resource, image_field))
            .collect();

        if let Some(needle) = &self.descriptor.title_filter {
            items = filter_by_title(items, needle);
        }
        sort_by_title(&mut items);
        if let Some(limit) = self.descriptor.result_limit {
            items.truncate(limit);
        }

        tracing::debug!(
            entity_type,
            count = items.len(),
            "Content list resolved"
        );
        Ok(items)
    }

    /// Resolve every taxonomy filter concurrently and build the AND-combined
    /// clauses for the filters whose term was found.
    ///
    /// Lookups are traced grouped by filter, in filter order.
    async fn resolve_filter_clauses(&self, trace: &mut QueryTrace) -> FetchResult<Vec<String>> {
        let filters = &self.descriptor.taxonomy_filters;
        if filters.is_empty() {
            return Ok(Vec::new());
        }

        let mut sent = vec![Vec::new(); filters.len()];
        let lookups = join_all(
            filters
                .iter()
                .zip(sent.iter_mut())
                .map(|(filter, sent)| self.lookup_term(filter, sent)),
        )
        .await;
        trace.extend(
            sent.into_iter()
                .flatten()
                .map(|url| TraceEntry::new(TraceKind::Taxonomy, url)),
        );

        let mut clauses = Vec::with_capacity(filters.len());
        for (filter, lookup) in filters.iter().zip(lookups) {
            match lookup? {
                Some(term) => clauses.push(filter_clause(&format!("{}.id", filter.field), &term.id)),
                None => tracing::warn!(
                    term = %filter.term_name,
                    vocabulary = %filter.vocabulary,
                    "Taxonomy term not found. Skipping filter."
                ),
            }
        }
        Ok(clauses)
    }

    /// Look up a term by name in its vocabulary. Requested URLs are appended
    /// to `sent`.
    pub async fn lookup_term(
        &self,
        filter: &TaxonomyFilter,
        sent: &mut Vec<String>,
    ) -> FetchResult<Option<TaxonomyTermRef>> {
        let resource_type = format!("taxonomy_term/{}", filter.vocabulary);
        let clauses = [filter_clause("name", &filter.term_name)];
        let (body, url) = self
            .api
            .get_localized(|api| api.collection_url(&resource_type, &clauses), sent)
            .await?;

        let document: CollectionDocument =
            serde_json::from_value(body).map_err(|e| FetchError::Decode {
                url,
                reason: e.to_string(),
            })?;
        Ok(document
            .into_resources()
            .first()
            .filter(|r| !r.id.is_empty())
            .map(TaxonomyTermRef::from_resource))
    }
}
