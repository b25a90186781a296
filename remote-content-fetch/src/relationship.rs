//! Image relationship resolution.
//!
//! A content item points at its image through one of two chains:
//!
//! ```text
//! item ──► digital asset (embed codes by style)
//! item ──► media ──► file ──► style probe
//! ```
//!
//! Each hop depends on the body of the previous one, so hops run in order.
//! Every fetch goes through the panel's [`FetchCache`](crate::FetchCache).

use crate::api::{Fetched, JsonApi};
use crate::probe::{ImageProbe, ImageStyleProber};
use remote_content_core::{
    FetchResult, RelationshipRef, ResolvedImage, TraceEntry, TraceKind, DEFAULT_ALT_TEXT,
};

const DIGITAL_ASSET_RESOURCE: &str = "media/acquia_dam_image_asset";
const DEFAULT_MEDIA_RESOURCE: &str = "media/image";
const FILE_RESOURCE: &str = "file/file";
const ORIGINAL_EMBED: &str = "original";

/// Image for one item together with the lookups that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub image: ResolvedImage,
    pub trace: Vec<TraceEntry>,
}

pub struct RelationshipResolver<'a> {
    api: &'a JsonApi,
    prober: ImageStyleProber<'a>,
    image_style: Option<&'a str>,
}

impl<'a> RelationshipResolver<'a> {
    pub fn new(api: &'a JsonApi, probe: &'a dyn ImageProbe, image_style: Option<&'a str>) -> Self {
        Self {
            api,
            prober: ImageStyleProber::new(api.base_url(), probe),
            image_style,
        }
    }

    /// Resolve an item's image relationship.
    ///
    /// An absent relationship yields the placeholder without any request.
    /// Fetch failures along the chain are logged and yield an empty URL,
    /// which the renderer replaces with the placeholder.
    pub async fn resolve_image(&self, reference: Option<&RelationshipRef>) -> Resolution {
        let Some(reference) = reference else {
            return Resolution {
                image: ResolvedImage::placeholder(),
                trace: Vec::new(),
            };
        };

        let mut trace = Vec::new();
        let result = if reference.is_digital_asset() {
            self.resolve_digital_asset(reference, &mut trace).await
        } else {
            self.resolve_media(reference, &mut trace).await
        };

        let image = result.unwrap_or_else(|err| {
            tracing::warn!(
                media = %reference.id,
                kind = %reference.kind,
                error = %err,
                "Image relationship could not be resolved"
            );
            ResolvedImage::new(String::new(), DEFAULT_ALT_TEXT)
        });
        Resolution { image, trace }
    }

    async fn resolve_digital_asset(
        &self,
        reference: &RelationshipRef,
        trace: &mut Vec<TraceEntry>,
    ) -> FetchResult<ResolvedImage> {
        let asset = self
            .hop(TraceKind::DigitalAsset, DIGITAL_ASSET_RESOURCE, &reference.id, trace)
            .await?;

        let resource = &asset.resource;
        let embed = |style: &str| {
            resource
                .attribute_str(&format!("acquia_dam_embed_codes/{style}/href"))
                .filter(|href| !href.is_empty())
        };
        let url = self
            .image_style
            .and_then(embed)
            .or_else(|| embed(ORIGINAL_EMBED))
            .unwrap_or_default()
            .to_string();
        let alt_text = resource
            .attribute_str("acquia_dam_alt_text")
            .filter(|alt| !alt.trim().is_empty())
            .or_else(|| resource.attribute_str("name"))
            .unwrap_or_default()
            .to_string();
        Ok(ResolvedImage::new(url, alt_text))
    }

    async fn resolve_media(
        &self,
        reference: &RelationshipRef,
        trace: &mut Vec<TraceEntry>,
    ) -> FetchResult<ResolvedImage> {
        let media_type = reference.resource_type(DEFAULT_MEDIA_RESOURCE);
        let media = self
            .hop(TraceKind::Image, &media_type, &reference.id, trace)
            .await?;

        let file_ref = media.resource.relationship("image");
        let alt_text = file_ref
            .as_ref()
            .and_then(|f| f.alt.clone())
            .unwrap_or_else(|| DEFAULT_ALT_TEXT.to_string());

        let Some(file_ref) = file_ref else {
            tracing::warn!(media = %reference.id, "Media entity has no file relationship");
            return Ok(ResolvedImage::new(String::new(), alt_text));
        };

        let file = self
            .hop(TraceKind::File, FILE_RESOURCE, &file_ref.id, trace)
            .await?;

        let url = self
            .prober
            .probe_style_url(&file.resource, self.image_style)
            .await;
        Ok(ResolvedImage::new(url, alt_text))
    }

    /// Fetch one hop of the chain and trace it, failed attempts included.
    async fn hop(
        &self,
        kind: TraceKind,
        resource_type: &str,
        id: &str,
        trace: &mut Vec<TraceEntry>,
    ) -> FetchResult<Fetched> {
        match self.api.fetch_by_id(resource_type, id).await {
            Ok(fetched) => {
                trace.push(TraceEntry::new(kind, &fetched.url).cached(fetched.cached));
                Ok(fetched)
            }
            Err(err) => {
                trace.push(TraceEntry::new(kind, err.url()));
                Err(err)
            }
        }
    }
}
