//! Render-pass orchestration for one panel instance.
//!
//! A pass runs the content list query, resolves every item's image
//! concurrently, then renders the cards in list order. Completion order of
//! the image lookups never affects card order.

use crate::error::PanelError;
use crate::renderer::{Card, Renderer, NOT_CONFIGURED_NOTICE, NO_RESULTS_NOTICE};
use futures_util::future::join_all;
use maud::html;
use remote_content_core::{
    ContentQueryDescriptor, FetchError, PageContext, QueryTrace, TraceEntry, TraceKind,
};
use remote_content_fetch::{ContentFetcher, ImageProbe, JsonApi, RelationshipResolver, ResourceFetcher};
use std::sync::Arc;

/// How a render pass ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelStatus {
    /// Configuration was incomplete; no request was made.
    NotConfigured,
    /// The query succeeded with zero items.
    Empty,
    Rendered { cards: usize },
    Failed(FetchError),
}

/// Output of one render pass.
#[derive(Debug, Clone)]
pub struct RenderedPanel {
    pub html: String,
    pub status: PanelStatus,
    /// Requests made during the pass, recorded whether or not the log is shown.
    pub trace: QueryTrace,
}

pub struct RemoteContentPanel {
    descriptor: ContentQueryDescriptor,
    /// Present only when the descriptor has a base address.
    api: Option<JsonApi>,
    probe: Arc<dyn ImageProbe>,
}

impl RemoteContentPanel {
    pub fn new(
        descriptor: ContentQueryDescriptor,
        fetcher: Arc<dyn ResourceFetcher>,
        probe: Arc<dyn ImageProbe>,
    ) -> Self {
        let api = descriptor.base_url.as_ref().map(|base| {
            JsonApi::new(
                fetcher,
                base.clone(),
                descriptor.api_path.clone(),
                descriptor.language_prefix.clone(),
            )
        });
        Self {
            descriptor,
            api,
            probe,
        }
    }

    /// Build a panel from the host's configuration attribute.
    pub fn from_attribute(
        attribute: &str,
        page: &PageContext,
        fetcher: Arc<dyn ResourceFetcher>,
        probe: Arc<dyn ImageProbe>,
    ) -> Self {
        Self::new(
            ContentQueryDescriptor::from_attribute(attribute, page),
            fetcher,
            probe,
        )
    }

    pub fn descriptor(&self) -> &ContentQueryDescriptor {
        &self.descriptor
    }

    pub fn api(&self) -> Option<&JsonApi> {
        self.api.as_ref()
    }

    /// Run one render pass.
    ///
    /// Never fails: configuration and fetch problems become notices. The
    /// fetch cache and a cleared language prefix carry over to later passes.
    pub async fn render(&self) -> RenderedPanel {
        let renderer = Renderer::new(&self.descriptor.layout_style_class);
        let mut trace = QueryTrace::new();

        let (body, status) = match self.render_pass(&mut trace).await {
            Ok(cards) if cards.is_empty() => (renderer.notice(NO_RESULTS_NOTICE), PanelStatus::Empty),
            Ok(cards) => (
                renderer.cards(&cards),
                PanelStatus::Rendered { cards: cards.len() },
            ),
            Err(PanelError::NotConfigured) => {
                tracing::debug!("Panel has no base address or content type");
                (renderer.notice(NOT_CONFIGURED_NOTICE), PanelStatus::NotConfigured)
            }
            Err(PanelError::Fetch(err)) => {
                tracing::error!(url = %err.url(), error = %err, "Content fetch failed");
                let message = format!("Error fetching content: {err}");
                (renderer.notice(&message), PanelStatus::Failed(err))
            }
        };

        let show_log =
            self.descriptor.show_queries && matches!(status, PanelStatus::Rendered { .. });
        let markup = html! {
            (body)
            (renderer.query_log(show_log.then_some(&trace)))
        };

        RenderedPanel {
            html: markup.into_string(),
            status,
            trace,
        }
    }

    async fn render_pass(&self, trace: &mut QueryTrace) -> Result<Vec<Card>, PanelError> {
        let (Some(api), Some(entity_type)) = (self.api.as_ref(), self.descriptor.entity_type())
        else {
            return Err(PanelError::NotConfigured);
        };

        let items = ContentFetcher::new(api, &self.descriptor)
            .list_content(trace)
            .await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let resolver = RelationshipResolver::new(
            api,
            self.probe.as_ref(),
            self.descriptor.image_style.as_deref(),
        );
        let resolutions =
            join_all(items.iter().map(|item| resolver.resolve_image(item.image.as_ref()))).await;

        let mut cards = Vec::with_capacity(items.len());
        for (item, resolution) in items.into_iter().zip(resolutions) {
            trace.record(
                TraceEntry::new(TraceKind::Node, api.resource_url(entity_type, &item.id))
                    .with_children(resolution.trace),
            );
            cards.push(Card {
                href: api.page_url(item.path_alias.as_deref()),
                title: item.title,
                image: resolution.image,
            });
        }

        tracing::debug!(entity_type, cards = cards.len(), "Render pass complete");
        Ok(cards)
    }
}

impl std::fmt::Debug for RemoteContentPanel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteContentPanel")
            .field("descriptor", &self.descriptor)
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
