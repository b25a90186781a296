//! End-to-end render passes against the mock repository.

use pretty_assertions::assert_eq;
use remote_content_core::{
    placeholder_image_url, ContentQueryDescriptor, FetchError, PageContext, RemoteType,
    TaxonomyFilter, TraceKind,
};
use remote_content_render::{PanelStatus, RemoteContentPanel, NOT_CONFIGURED_NOTICE, NO_RESULTS_NOTICE};
use remote_content_test_utils::fixtures::{
    collection, dam_asset, file, media_image, node, nodes_without_images, single, taxonomy_term,
};
use remote_content_test_utils::{descriptor, MockFetcher, MockImageProbe, BASE_URL};
use std::sync::Arc;
use std::time::Duration;

const ARTICLE_IMAGE: &str = "field_article_image";

fn url(path: &str) -> String {
    format!("{BASE_URL}{path}")
}

fn panel(
    descriptor: ContentQueryDescriptor,
    fetcher: &Arc<MockFetcher>,
    probe: &Arc<MockImageProbe>,
) -> RemoteContentPanel {
    RemoteContentPanel::new(descriptor, fetcher.clone(), probe.clone())
}

/// Card titles in document order.
fn card_titles(html: &str) -> Vec<String> {
    html.split(r#"<div class="title">"#)
        .skip(1)
        .filter_map(|rest| rest.split("</div>").next())
        .map(str::to_string)
        .collect()
}

/// Image sources in document order.
fn image_sources(html: &str) -> Vec<String> {
    html.split(r#"<img src=""#)
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}

fn article_with(limit: Option<usize>) -> ContentQueryDescriptor {
    ContentQueryDescriptor {
        result_limit: limit,
        ..descriptor(RemoteType::Article)
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[tokio::test]
async fn missing_base_address_renders_notice_without_requests() {
    let fetcher = Arc::new(MockFetcher::new());
    let probe = Arc::new(MockImageProbe::new());
    let panel = RemoteContentPanel::from_attribute(
        r#"{"remotetype": "article"}"#,
        &PageContext::default(),
        fetcher.clone(),
        probe.clone(),
    );

    let rendered = panel.render().await;

    assert_eq!(rendered.status, PanelStatus::NotConfigured);
    assert!(rendered.html.contains(NOT_CONFIGURED_NOTICE));
    assert_eq!(fetcher.total_requests(), 0);
}

#[tokio::test]
async fn unparsable_attribute_renders_notice() {
    let fetcher = Arc::new(MockFetcher::new());
    let probe = Arc::new(MockImageProbe::new());
    let panel = RemoteContentPanel::from_attribute(
        "{not json",
        &PageContext::new(BASE_URL),
        fetcher.clone(),
        probe,
    );

    let rendered = panel.render().await;

    assert_eq!(rendered.status, PanelStatus::NotConfigured);
    assert_eq!(fetcher.total_requests(), 0);
}

#[tokio::test]
async fn page_origin_supplies_base_address() {
    let fetcher = Arc::new(
        MockFetcher::new().with_json(
            url("/api/event"),
            collection(nodes_without_images(&["Launch"], "field_event_image")),
        ),
    );
    let probe = Arc::new(MockImageProbe::new());
    let panel = RemoteContentPanel::from_attribute(
        r#"{"remotetype": "event", "layoutstyle": "list"}"#,
        &PageContext::new(BASE_URL),
        fetcher.clone(),
        probe,
    );

    let rendered = panel.render().await;

    assert_eq!(rendered.status, PanelStatus::Rendered { cards: 1 });
    assert!(rendered.html.starts_with(r#"<div class="list">"#));
    assert_eq!(card_titles(&rendered.html), vec!["Launch"]);
}

// ============================================================================
// ORDERING AND LIMITS
// ============================================================================

#[tokio::test]
async fn limit_two_of_five_sorted_with_placeholders() {
    let fetcher = Arc::new(MockFetcher::new().with_json(
        url("/api/article"),
        collection(nodes_without_images(
            &["Zeta", "Alpha", "Mu", "Beta", "Gamma"],
            ARTICLE_IMAGE,
        )),
    ));
    let probe = Arc::new(MockImageProbe::new());

    let rendered = panel(article_with(Some(2)), &fetcher, &probe).render().await;

    assert_eq!(rendered.status, PanelStatus::Rendered { cards: 2 });
    assert_eq!(card_titles(&rendered.html), vec!["Alpha", "Beta"]);
    assert_eq!(
        image_sources(&rendered.html),
        vec![placeholder_image_url(), placeholder_image_url()]
    );
    assert!(rendered.html.contains(r#"alt="No Image""#));
    assert_eq!(fetcher.requests(), vec![url("/api/article")]);
}

#[tokio::test]
async fn accented_titles_sort_with_their_base_letter() {
    let fetcher = Arc::new(MockFetcher::new().with_json(
        url("/api/article"),
        collection(nodes_without_images(&["Zoo", "éclair", "Eagle", "apple"], ARTICLE_IMAGE)),
    ));
    let probe = Arc::new(MockImageProbe::new());

    let rendered = panel(article_with(None), &fetcher, &probe).render().await;

    assert_eq!(
        card_titles(&rendered.html),
        vec!["apple", "Eagle", "éclair", "Zoo"]
    );
}

#[tokio::test]
async fn card_order_ignores_image_completion_order() {
    let nodes = vec![
        node("n1", "Alpha", Some("/alpha"), ARTICLE_IMAGE, Some(("media--image", "m1"))),
        node("n2", "Beta", Some("/beta"), ARTICLE_IMAGE, Some(("media--image", "m2"))),
        node("n3", "Gamma", Some("/gamma"), ARTICLE_IMAGE, Some(("media--image", "m3"))),
    ];
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_json(url("/api/article"), collection(nodes))
            .with_json(url("/api/media/image/m1"), single(media_image("m1", Some("f1"), None)))
            .with_json(url("/api/media/image/m2"), single(media_image("m2", Some("f2"), None)))
            .with_json(url("/api/media/image/m3"), single(media_image("m3", Some("f3"), None)))
            .with_json(url("/api/file/file/f1"), single(file("f1", "a.jpg")))
            .with_json(url("/api/file/file/f2"), single(file("f2", "b.jpg")))
            .with_json(url("/api/file/file/f3"), single(file("f3", "c.jpg")))
            .with_delay(url("/api/media/image/m1"), Duration::from_millis(30))
            .with_delay(url("/api/media/image/m2"), Duration::from_millis(15)),
    );
    let probe = Arc::new(MockImageProbe::new());

    let rendered = panel(article_with(None), &fetcher, &probe).render().await;

    assert_eq!(card_titles(&rendered.html), vec!["Alpha", "Beta", "Gamma"]);
    assert_eq!(
        image_sources(&rendered.html),
        vec![
            url("/sites/default/files/a.jpg"),
            url("/sites/default/files/b.jpg"),
            url("/sites/default/files/c.jpg"),
        ]
    );
    assert!(rendered.html.contains(&format!(r#"href="{}""#, url("/alpha"))));
}

#[tokio::test]
async fn empty_collection_renders_no_results() {
    let fetcher = Arc::new(MockFetcher::new().with_json(url("/api/article"), collection(vec![])));
    let probe = Arc::new(MockImageProbe::new());

    let rendered = panel(article_with(None), &fetcher, &probe).render().await;

    assert_eq!(rendered.status, PanelStatus::Empty);
    assert!(rendered.html.contains(NO_RESULTS_NOTICE));
}

#[tokio::test]
async fn title_filter_narrows_before_limit() {
    let fetcher = Arc::new(MockFetcher::new().with_json(
        url("/api/article"),
        collection(nodes_without_images(
            &["Rust news", "Go news", "rusty tools", "Trusted"],
            ARTICLE_IMAGE,
        )),
    ));
    let probe = Arc::new(MockImageProbe::new());
    let descriptor = ContentQueryDescriptor {
        title_filter: Some("RUST".to_string()),
        result_limit: Some(2),
        ..descriptor(RemoteType::Article)
    };

    let rendered = panel(descriptor, &fetcher, &probe).render().await;

    assert_eq!(card_titles(&rendered.html), vec!["Rust news", "rusty tools"]);
}

// ============================================================================
// IMAGE RESOLUTION
// ============================================================================

#[tokio::test]
async fn shared_image_is_fetched_once() {
    let nodes = vec![
        node("n1", "Alpha", None, ARTICLE_IMAGE, Some(("media--image", "m1"))),
        node("n2", "Beta", None, ARTICLE_IMAGE, Some(("media--image", "m1"))),
    ];
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_json(url("/api/article"), collection(nodes))
            .with_json(url("/api/media/image/m1"), single(media_image("m1", Some("f1"), Some("Cover"))))
            .with_json(url("/api/file/file/f1"), single(file("f1", "cover.jpg"))),
    );
    let probe = Arc::new(MockImageProbe::new());

    let rendered = panel(article_with(None), &fetcher, &probe).render().await;

    assert_eq!(rendered.status, PanelStatus::Rendered { cards: 2 });
    assert_eq!(fetcher.request_count(&url("/api/media/image/m1")), 1);
    assert_eq!(fetcher.request_count(&url("/api/file/file/f1")), 1);
    assert_eq!(rendered.html.matches(r#"alt="Cover""#).count(), 2);
    assert!(rendered.html.contains(&format!(r#"href="{BASE_URL}#""#)));
}

#[tokio::test]
async fn failed_style_derivative_falls_back_to_original() {
    let nodes = vec![node("n1", "Alpha", None, ARTICLE_IMAGE, Some(("media--image", "m1")))];
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_json(url("/api/article"), collection(nodes))
            .with_json(url("/api/media/image/m1"), single(media_image("m1", Some("f1"), None)))
            .with_json(url("/api/file/file/f1"), single(file("f1", "2024/a.jpg"))),
    );
    let probe = Arc::new(MockImageProbe::new());
    let descriptor = ContentQueryDescriptor {
        image_style: Some("thumbnail".to_string()),
        ..descriptor(RemoteType::Article)
    };

    let rendered = panel(descriptor, &fetcher, &probe).render().await;

    assert_eq!(
        image_sources(&rendered.html),
        vec![url("/sites/default/files/2024/a.jpg")]
    );
    assert_eq!(
        probe.requests(),
        vec![url("/sites/default/files/styles/thumbnail/public/2024/a.jpg")]
    );
    assert!(rendered.html.contains(r#"alt="Image""#));
}

#[tokio::test]
async fn loaded_style_derivative_is_used() {
    let styled = url("/sites/default/files/styles/thumbnail/public/2024/a.jpg");
    let nodes = vec![node("n1", "Alpha", None, ARTICLE_IMAGE, Some(("media--image", "m1")))];
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_json(url("/api/article"), collection(nodes))
            .with_json(url("/api/media/image/m1"), single(media_image("m1", Some("f1"), None)))
            .with_json(url("/api/file/file/f1"), single(file("f1", "2024/a.jpg"))),
    );
    let probe = Arc::new(MockImageProbe::new().with_loadable(styled.clone()));
    let descriptor = ContentQueryDescriptor {
        image_style: Some("thumbnail".to_string()),
        ..descriptor(RemoteType::Article)
    };

    let rendered = panel(descriptor, &fetcher, &probe).render().await;

    assert_eq!(image_sources(&rendered.html), vec![styled]);
}

#[tokio::test]
async fn digital_asset_uses_style_embed_then_original() {
    let nodes = vec![node(
        "n1",
        "Alpha",
        None,
        ARTICLE_IMAGE,
        Some(("media--acquia_dam_image_asset", "d1")),
    )];
    let asset = dam_asset(
        "d1",
        &[("thumb", "https://dam.test/t.jpg"), ("original", "https://dam.test/o.jpg")],
        Some("Harbour at dusk"),
        "harbour.jpg",
    );
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_json(url("/api/article"), collection(nodes))
            .with_json(url("/api/media/acquia_dam_image_asset/d1"), single(asset)),
    );
    let probe = Arc::new(MockImageProbe::new());

    let styled = ContentQueryDescriptor {
        image_style: Some("thumb".to_string()),
        ..descriptor(RemoteType::Article)
    };
    let rendered = panel(styled, &fetcher, &probe).render().await;
    assert_eq!(image_sources(&rendered.html), vec!["https://dam.test/t.jpg"]);
    assert!(rendered.html.contains(r#"alt="Harbour at dusk""#));

    let unstyled = panel(article_with(None), &fetcher, &probe).render().await;
    assert_eq!(image_sources(&unstyled.html), vec!["https://dam.test/o.jpg"]);
    assert!(probe.requests().is_empty());
}

#[tokio::test]
async fn missing_media_renders_placeholder() {
    let nodes = vec![node("n1", "Alpha", None, ARTICLE_IMAGE, Some(("media--image", "gone")))];
    let fetcher = Arc::new(MockFetcher::new().with_json(url("/api/article"), collection(nodes)));
    let probe = Arc::new(MockImageProbe::new());

    let rendered = panel(article_with(None), &fetcher, &probe).render().await;

    assert_eq!(rendered.status, PanelStatus::Rendered { cards: 1 });
    assert_eq!(image_sources(&rendered.html), vec![placeholder_image_url()]);
    assert!(rendered.html.contains(r#"alt="Image""#));
}

// ============================================================================
// TAXONOMY AND LANGUAGE
// ============================================================================

#[tokio::test]
async fn unmatched_taxonomy_term_is_dropped() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_json(
                url("/api/taxonomy_term/tags?filter[name]=Rust"),
                collection(vec![taxonomy_term("t1", "Rust")]),
            )
            .with_json(
                url("/api/taxonomy_term/topics?filter[name]=Nowhere"),
                collection(vec![]),
            )
            .with_json(
                url("/api/article?filter[field_tags.id]=t1"),
                collection(nodes_without_images(&["Tagged"], ARTICLE_IMAGE)),
            ),
    );
    let probe = Arc::new(MockImageProbe::new());
    let descriptor = ContentQueryDescriptor {
        taxonomy_filters: vec![
            TaxonomyFilter {
                field: "field_tags".to_string(),
                vocabulary: "tags".to_string(),
                term_name: "Rust".to_string(),
            },
            TaxonomyFilter {
                field: "field_topic".to_string(),
                vocabulary: "topics".to_string(),
                term_name: "Nowhere".to_string(),
            },
        ],
        ..descriptor(RemoteType::Article)
    };

    let rendered = panel(descriptor, &fetcher, &probe).render().await;

    assert_eq!(card_titles(&rendered.html), vec!["Tagged"]);
    assert_eq!(fetcher.request_count(&url("/api/article?filter[field_tags.id]=t1")), 1);
    assert_eq!(fetcher.request_count(&url("/api/article")), 0);
}

#[tokio::test]
async fn taxonomy_lookup_failure_aborts_pass() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_transport_error(url("/api/taxonomy_term/tags?filter[name]=Rust"), "connection reset"),
    );
    let probe = Arc::new(MockImageProbe::new());
    let descriptor = ContentQueryDescriptor {
        taxonomy_filters: vec![TaxonomyFilter {
            field: "field_tags".to_string(),
            vocabulary: "tags".to_string(),
            term_name: "Rust".to_string(),
        }],
        ..descriptor(RemoteType::Article)
    };

    let rendered = panel(descriptor, &fetcher, &probe).render().await;

    assert!(matches!(rendered.status, PanelStatus::Failed(FetchError::Transport { .. })));
    assert!(rendered.html.contains("Error fetching content: "));
}

#[tokio::test]
async fn localized_404_retries_once_without_prefix() {
    let fetcher = Arc::new(MockFetcher::new().with_json(
        url("/api/article"),
        collection(vec![node("n1", "Bonjour", Some("/bonjour"), ARTICLE_IMAGE, None)]),
    ));
    let probe = Arc::new(MockImageProbe::new());
    let descriptor = ContentQueryDescriptor {
        language_prefix: Some("/fr".to_string()),
        ..descriptor(RemoteType::Article)
    };
    let panel = panel(descriptor, &fetcher, &probe);

    let rendered = panel.render().await;

    assert_eq!(rendered.status, PanelStatus::Rendered { cards: 1 });
    assert_eq!(fetcher.requests(), vec![url("/fr/api/article"), url("/api/article")]);
    assert!(rendered.html.contains(&format!(r#"href="{}""#, url("/bonjour"))));

    // The prefix stays cleared for the panel's later passes.
    panel.render().await;
    assert_eq!(fetcher.request_count(&url("/fr/api/article")), 1);
    assert_eq!(fetcher.request_count(&url("/api/article")), 2);
}

#[tokio::test]
async fn localized_404_on_retry_is_an_error() {
    let fetcher = Arc::new(MockFetcher::new());
    let probe = Arc::new(MockImageProbe::new());
    let descriptor = ContentQueryDescriptor {
        language_prefix: Some("/fr".to_string()),
        ..descriptor(RemoteType::Article)
    };

    let rendered = panel(descriptor, &fetcher, &probe).render().await;

    assert_eq!(fetcher.total_requests(), 2);
    assert_eq!(
        rendered.status,
        PanelStatus::Failed(FetchError::status(404, "Not Found", url("/api/article")))
    );
    assert!(rendered
        .html
        .contains("Error fetching content: Fetch error: 404 Not Found"));
}

#[tokio::test]
async fn unprefixed_404_is_not_retried() {
    let fetcher = Arc::new(MockFetcher::new());
    let probe = Arc::new(MockImageProbe::new());

    let rendered = panel(article_with(None), &fetcher, &probe).render().await;

    assert_eq!(fetcher.total_requests(), 1);
    assert!(matches!(rendered.status, PanelStatus::Failed(_)));
}

#[tokio::test]
async fn server_error_renders_error_notice() {
    let fetcher = Arc::new(MockFetcher::new().with_status(url("/api/article"), 503));
    let probe = Arc::new(MockImageProbe::new());

    let rendered = panel(article_with(None), &fetcher, &probe).render().await;

    assert!(rendered
        .html
        .contains("Error fetching content: Fetch error: 503 Service Unavailable"));
}

#[tokio::test]
async fn conflict_status_renders_canonical_reason() {
    let fetcher = Arc::new(MockFetcher::new().with_status(url("/api/article"), 409));
    let probe = Arc::new(MockImageProbe::new());

    let rendered = panel(article_with(None), &fetcher, &probe).render().await;

    assert_eq!(
        rendered.status,
        PanelStatus::Failed(FetchError::status(409, "Conflict", url("/api/article")))
    );
    assert!(rendered
        .html
        .contains("Error fetching content: Fetch error: 409 Conflict"));
}

// ============================================================================
// QUERY LOG
// ============================================================================

#[tokio::test]
async fn query_log_lists_requests_in_order() {
    let nodes = vec![
        node("n2", "Beta", None, ARTICLE_IMAGE, Some(("media--image", "m1"))),
        node("n1", "Alpha", None, ARTICLE_IMAGE, Some(("media--image", "m1"))),
    ];
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_json(url("/api/article"), collection(nodes))
            .with_json(url("/api/media/image/m1"), single(media_image("m1", Some("f1"), None)))
            .with_json(url("/api/file/file/f1"), single(file("f1", "a.jpg"))),
    );
    let probe = Arc::new(MockImageProbe::new());
    let descriptor = ContentQueryDescriptor {
        show_queries: true,
        ..descriptor(RemoteType::Article)
    };

    let rendered = panel(descriptor, &fetcher, &probe).render().await;

    let kinds: Vec<TraceKind> = rendered.trace.entries().iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![TraceKind::ContentQuery, TraceKind::Node, TraceKind::Node]);

    let alpha = &rendered.trace.entries()[1];
    assert_eq!(alpha.url, url("/api/article/n1"));
    let children: Vec<(TraceKind, bool)> = alpha.children.iter().map(|c| (c.kind, c.cached)).collect();
    assert_eq!(children, vec![(TraceKind::Image, false), (TraceKind::File, false)]);

    let beta = &rendered.trace.entries()[2];
    assert!(beta.children.iter().all(|c| c.cached));

    assert!(rendered.html.contains("<strong>Query Log:</strong>"));
    assert!(rendered.html.contains("<strong>Remote type</strong>"));
    assert!(rendered.html.contains(" (cached)"));
}

#[tokio::test]
async fn trace_matches_network_requests_after_language_retry() {
    let nodes = vec![
        node("n2", "Beta", None, ARTICLE_IMAGE, Some(("media--image", "m1"))),
        node("n1", "Alpha", None, ARTICLE_IMAGE, Some(("media--image", "m1"))),
    ];
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_json(url("/api/article"), collection(nodes))
            .with_json(url("/api/media/image/m1"), single(media_image("m1", Some("f1"), None)))
            .with_json(url("/api/file/file/f1"), single(file("f1", "a.jpg"))),
    );
    let probe = Arc::new(MockImageProbe::new());
    let descriptor = ContentQueryDescriptor {
        language_prefix: Some("/fr".to_string()),
        show_queries: true,
        ..descriptor(RemoteType::Article)
    };

    let rendered = panel(descriptor, &fetcher, &probe).render().await;

    assert_eq!(rendered.status, PanelStatus::Rendered { cards: 2 });
    assert_eq!(rendered.trace.requested_urls(), fetcher.requests());
    assert_eq!(rendered.trace.entries()[0].url, url("/fr/api/article"));
    assert!(rendered.html.contains(&url("/fr/api/article")));
}

#[tokio::test]
async fn trace_matches_network_requests_after_taxonomy_retry() {
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_json(
                url("/api/taxonomy_term/tags?filter[name]=Rust"),
                collection(vec![taxonomy_term("t1", "Rust")]),
            )
            .with_json(
                url("/api/article?filter[field_tags.id]=t1"),
                collection(nodes_without_images(&["Tagged"], ARTICLE_IMAGE)),
            ),
    );
    let probe = Arc::new(MockImageProbe::new());
    let descriptor = ContentQueryDescriptor {
        language_prefix: Some("/fr".to_string()),
        taxonomy_filters: vec![TaxonomyFilter {
            field: "field_tags".to_string(),
            vocabulary: "tags".to_string(),
            term_name: "Rust".to_string(),
        }],
        ..descriptor(RemoteType::Article)
    };

    let rendered = panel(descriptor, &fetcher, &probe).render().await;

    assert_eq!(rendered.status, PanelStatus::Rendered { cards: 1 });
    assert_eq!(rendered.trace.requested_urls(), fetcher.requests());
    let kinds: Vec<TraceKind> = rendered.trace.entries().iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TraceKind::Taxonomy,
            TraceKind::Taxonomy,
            TraceKind::FilteredContent,
            TraceKind::Node,
        ]
    );
}

#[tokio::test]
async fn trace_keeps_requests_of_a_failed_pass() {
    let fetcher = Arc::new(MockFetcher::new());
    let probe = Arc::new(MockImageProbe::new());
    let descriptor = ContentQueryDescriptor {
        language_prefix: Some("/fr".to_string()),
        ..descriptor(RemoteType::Article)
    };

    let rendered = panel(descriptor, &fetcher, &probe).render().await;

    assert!(matches!(rendered.status, PanelStatus::Failed(_)));
    assert_eq!(rendered.trace.requested_urls(), fetcher.requests());
    assert_eq!(fetcher.total_requests(), 2);
}

#[tokio::test]
async fn query_log_hidden_by_default() {
    let fetcher = Arc::new(MockFetcher::new().with_json(
        url("/api/article"),
        collection(nodes_without_images(&["Alpha"], ARTICLE_IMAGE)),
    ));
    let probe = Arc::new(MockImageProbe::new());

    let rendered = panel(article_with(None), &fetcher, &probe).render().await;

    assert!(rendered.html.ends_with(r#"<div id="query"></div>"#));
    assert!(!rendered.trace.is_empty());
}
