use md_sieve::providers::{
    CoreSyntaxProvider, FilterAlignCaptionProvider, MediaEmbedProvider, ThemeOverrideProvider,
};
use md_sieve::{
    AllowList, AttributePermission, Compression, ParserId, ParserRegistry, ProviderRegistry,
    RenderOptions, Renderer, SieveError, ThemeId,
};

fn extra() -> ParserId {
    ParserId::from("extra")
}

fn site_renderer() -> Renderer {
    let mut providers = ProviderRegistry::new();
    providers.register(CoreSyntaxProvider).unwrap();
    providers.register(FilterAlignCaptionProvider::new(true)).unwrap();
    providers.register(MediaEmbedProvider::new(true)).unwrap();
    providers
        .register(ThemeOverrideProvider::new(
            ThemeId::from("olivero"),
            AllowList::new().allow("figure", "class", AttributePermission::values(["media"])),
        ))
        .unwrap();

    Renderer::new(ParserRegistry::with_defaults(), providers, RenderOptions::default())
}

#[test]
fn test_extra_syntax_survives() {
    let md = "| a | b |\n|:-:|---|\n| 1 | ~~2~~ |\n\n- [x] done\n";
    let rendered = Renderer::with_defaults().render(md, Some(&extra()), None).unwrap();

    assert!(rendered.html.contains("<table>"));
    assert!(rendered.html.contains("<th align=\"center\">a</th>"));
    assert!(rendered.html.contains("<del>2</del>"));
    assert!(rendered.html.contains("type=\"checkbox\""));
}

#[test]
fn test_commonmark_unwraps_raw_tables() {
    let md = "<table><tr><td>cell</td></tr></table>\n";
    let rendered = Renderer::with_defaults().render(md, None, None).unwrap();

    assert!(!rendered.html.contains("<table"));
    assert!(!rendered.html.contains("<td"));
    assert!(rendered.html.contains("cell"));
}

#[test]
fn test_global_attributes_from_filters() {
    let md = "<p data-align=\"center\" data-foo=\"x\">Hi</p>\n";
    let rendered = Renderer::with_defaults().render(md, None, None).unwrap();

    assert!(rendered.html.contains("<p data-align=\"center\">Hi</p>"));
    assert!(!rendered.html.contains("data-foo"));
}

#[test]
fn test_media_embed_denies_alignment() {
    let md = "<drupal-media data-entity-uuid=\"abc\" data-align=\"center\"></drupal-media>\n";
    let rendered = site_renderer().render(md, None, None).unwrap();

    assert!(rendered.html.contains("<drupal-media data-entity-uuid=\"abc\"></drupal-media>"));
    assert!(!rendered.html.contains("data-align"));
}

#[test]
fn test_theme_widens_allow_list() {
    let renderer = site_renderer();
    let md = "<figure class=\"media\">x</figure>\n";

    let plain = renderer.render(md, None, None).unwrap();
    assert!(!plain.html.contains("<figure"));

    let theme = ThemeId::from("olivero");
    let themed = renderer.render(md, None, Some(&theme)).unwrap();
    assert!(themed.html.contains("<figure class=\"media\">x</figure>"));
    assert_eq!(themed.theme, Some(theme));
    assert_ne!(plain.source_hash, themed.source_hash);
}

#[test]
fn test_script_links_are_removed() {
    let md = "[click](javascript:alert(1)) and [docs](https://example.com/)\n";
    let rendered = Renderer::with_defaults().render(md, None, None).unwrap();

    assert!(!rendered.html.contains("javascript"));
    assert!(rendered.html.contains("<a href=\"https://example.com/\">docs</a>"));
}

#[test]
fn test_deeply_nested_inline_html_renders() {
    let depth = 60_000;
    let md = format!("{}deep{}\n", "<span>".repeat(depth), "</span>".repeat(depth));
    let rendered = Renderer::with_defaults().render(&md, None, None).unwrap();

    assert_eq!(rendered.html.trim(), "<p>deep</p>");
}

#[test]
fn test_unknown_parser_is_an_error() {
    let result = Renderer::with_defaults().render("x", Some(&ParserId::from("textile")), None);
    assert!(matches!(result, Err(SieveError::ParserNotFound(id)) if id == "textile"));
}

#[test]
fn test_renderer_is_shareable_across_threads() {
    let renderer = std::sync::Arc::new(site_renderer().with_render_cache(Compression::None));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let renderer = renderer.clone();
            std::thread::spawn(move || {
                renderer
                    .render(&format!("item *{}*\n", i % 2), None, None)
                    .unwrap()
                    .html
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().contains("<em>"));
    }
    assert_eq!(renderer.render_cache().map(|cache| cache.len()), Some(2));
}

#[test]
fn test_render_cache_stays_bounded() {
    let renderer = Renderer::with_defaults().with_bounded_render_cache(Compression::None, 3);
    for i in 0..10 {
        renderer.render(&format!("doc {i}\n"), None, None).unwrap();
    }
    assert_eq!(renderer.render_cache().map(|cache| cache.len()), Some(3));

    // an evicted document renders again from scratch
    let first = renderer.render("doc 0\n", None, None).unwrap();
    assert!(first.html.contains("<p>doc 0</p>"));
    assert_eq!(renderer.render_cache().map(|cache| cache.len()), Some(3));
}

#[cfg(feature = "gzip")]
#[test]
fn test_gzip_render_cache() {
    let renderer = Renderer::with_defaults().with_render_cache(Compression::Gzip);
    let first = renderer.render("# Cached\n", None, None).unwrap();
    let second = renderer.render("# Cached\n", None, None).unwrap();

    assert_eq!(first.html, second.html);
    assert!(second.html.contains("<h1>Cached</h1>"));
}
