//! Image style probing.
//!
//! A file entity stores its location as a stream URI (`public://2024-05/a.jpg`)
//! plus a public URL (`/sites/default/files/2024-05/a.jpg`). Style derivatives
//! live next to it under `styles/{style}/public/`. Whether a derivative exists
//! is only known by trying to load it.

use async_trait::async_trait;
use remote_content_core::Resource;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

const PUBLIC_SCHEME: &str = "public://";

/// Terminal outcome of an image load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Loaded,
    Failed,
}

/// Attempts to load a URL as an image.
#[async_trait]
pub trait ImageProbe: Send + Sync {
    async fn load(&self, url: &str) -> ProbeOutcome;
}

/// [`ImageProbe`] that downloads the candidate and checks it is an image.
#[derive(Clone)]
pub struct HttpImageProbe {
    client: Client,
}

impl HttpImageProbe {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ImageProbe for HttpImageProbe {
    async fn load(&self, url: &str) -> ProbeOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::debug!(%url, error = %err, "Image probe request failed");
                return ProbeOutcome::Failed;
            }
        };
        if !response.status().is_success() {
            tracing::debug!(%url, status = response.status().as_u16(), "Image probe rejected");
            return ProbeOutcome::Failed;
        }
        let is_image = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim_start().starts_with("image/"));
        if !is_image {
            return ProbeOutcome::Failed;
        }
        match response.bytes().await {
            Ok(body) if !body.is_empty() => ProbeOutcome::Loaded,
            _ => ProbeOutcome::Failed,
        }
    }
}

impl std::fmt::Debug for HttpImageProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpImageProbe").finish_non_exhaustive()
    }
}

/// Original and style-derivative URLs for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCandidate {
    pub original: String,
    /// `None` when no style was requested or the file is not in public storage.
    pub styled: Option<String>,
}

/// Work out the derivative and original URLs for a file entity.
///
/// Returns `None` when the file carries no public URL at all.
pub fn style_candidate(base_url: &str, file: &Resource, style: Option<&str>) -> Option<StyleCandidate> {
    let public_url = file.attribute_str("uri/url").filter(|u| !u.is_empty())?;
    let original = format!("{base_url}{public_url}");

    let styled = style.zip(file.attribute_str("uri/value")).and_then(|(style, value)| {
        let relative = value.strip_prefix(PUBLIC_SCHEME)?;
        let base_path = public_url.strip_suffix(relative)?.trim_end_matches('/');
        Some(format!("{base_url}{base_path}/styles/{style}/public/{relative}"))
    });

    Some(StyleCandidate { original, styled })
}

/// Resolves a file entity to the best displayable URL for a style.
pub struct ImageStyleProber<'a> {
    base_url: &'a str,
    probe: &'a dyn ImageProbe,
}

impl<'a> ImageStyleProber<'a> {
    pub fn new(base_url: &'a str, probe: &'a dyn ImageProbe) -> Self {
        Self { base_url, probe }
    }

    /// Styled URL if it loads, otherwise the original file URL.
    ///
    /// Empty when the file has no public URL. Outcomes are not cached.
    pub async fn probe_style_url(&self, file: &Resource, style: Option<&str>) -> String {
        let Some(candidate) = style_candidate(self.base_url, file, style) else {
            tracing::warn!(file = %file.id, "File data is missing or incomplete");
            return String::new();
        };
        let Some(styled) = candidate.styled else {
            return candidate.original;
        };
        match self.probe.load(&styled).await {
            ProbeOutcome::Loaded => styled,
            ProbeOutcome::Failed => {
                tracing::debug!(%styled, "Style derivative unavailable; using original file");
                candidate.original
            }
        }
    }
}
