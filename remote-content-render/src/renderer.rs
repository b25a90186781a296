//! Card grid, notices and query log markup.
//!
//! This is the only module that produces presentation. All interpolated
//! values are escaped by maud.

use maud::{html, Markup};
use remote_content_core::{placeholder_image_url, QueryTrace, ResolvedImage, TraceEntry};

pub const NOT_CONFIGURED_NOTICE: &str =
    "The website address not set. Please add it to the component.";
pub const NO_RESULTS_NOTICE: &str = "No results found.";

/// One rendered content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    /// Absolute page URL, or the base address followed by `#`.
    pub href: String,
    pub image: ResolvedImage,
}

impl Card {
    /// Image source, falling back to the placeholder for empty URLs.
    pub fn image_src(&self) -> String {
        if self.image.is_empty() {
            placeholder_image_url()
        } else {
            self.image.url.clone()
        }
    }
}

/// Renders into a result container carrying the layout style class.
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'a> {
    layout_style_class: &'a str,
}

impl<'a> Renderer<'a> {
    pub fn new(layout_style_class: &'a str) -> Self {
        Self { layout_style_class }
    }

    pub fn cards(&self, cards: &[Card]) -> Markup {
        html! {
            div class=(self.layout_style_class) {
                @for card in cards {
                    div class="remote-content-card" {
                        a href=(card.href) target="_blank" {
                            div class="image-container" {
                                img src=(card.image_src()) alt=(card.image.alt_text);
                            }
                            div class="title" { (card.title) }
                        }
                    }
                }
            }
        }
    }

    /// Short message shown in place of the card grid.
    pub fn notice(&self, message: &str) -> Markup {
        html! {
            div class=(self.layout_style_class) {
                p { (message) }
            }
        }
    }

    /// Query container; holds the nested log when `trace` is given and not empty.
    pub fn query_log(&self, trace: Option<&QueryTrace>) -> Markup {
        html! {
            div id="query" {
                @if let Some(trace) = trace.filter(|t| !t.is_empty()) {
                    div class="results" {
                        p { strong { "Query Log:" } }
                        (trace_list(trace.entries()))
                    }
                }
            }
        }
    }
}

fn trace_list(entries: &[TraceEntry]) -> Markup {
    html! {
        ul {
            @for entry in entries {
                li {
                    strong { (entry.kind.label()) }
                    ": "
                    a href=(entry.url) target="_blank" rel="noopener noreferrer" { (entry.url) }
                    @if entry.cached { " (cached)" }
                    @if !entry.children.is_empty() {
                        (trace_list(&entry.children))
                    }
                }
            }
        }
    }
}
