//! Markdown rendering pipeline
//!
//! Pipeline: Markdown → parser (untrusted HTML) → effective allow-list for (parser, theme) →
//! sanitizer → cached, trusted HTML.
//!
//! The renderer owns both registries, which are only read after construction, so a single
//! `Renderer` can serve concurrent callers.

use crate::allowlist::AllowList;
use crate::cache::{AllowListCache, Compression, RenderCache, DEFAULT_RENDER_CACHE_ENTRIES};
use crate::error::Result;
use crate::parser::{ParserRegistry, COMMONMARK};
use crate::provider::{ParserId, ThemeId};
use crate::registry::ProviderRegistry;
use crate::sanitize::{sanitize_html, SanitizeOptions};
use serde::Serialize;
use std::sync::Arc;

/// Options for the rendering pipeline
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Parser used when a request names none
    pub default_parser: ParserId,
    pub sanitize: SanitizeOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            default_parser: ParserId::from(COMMONMARK),
            sanitize: SanitizeOptions::default(),
        }
    }
}

/// Result of rendering one Markdown document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedMarkdown {
    /// Sanitized HTML
    pub html: String,
    pub parser: ParserId,
    pub theme: Option<ThemeId>,
    /// Render cache key (SHA-256 of parser, theme and source)
    pub source_hash: String,
    /// Size of the HTML in bytes
    pub size: usize,
}

/// Markdown renderer combining parsers, allow-list providers and caches
pub struct Renderer {
    parsers: ParserRegistry,
    providers: ProviderRegistry,
    options: RenderOptions,
    allow_lists: AllowListCache,
    render_cache: Option<RenderCache>,
}

impl Renderer {
    pub fn new(parsers: ParserRegistry, providers: ProviderRegistry, options: RenderOptions) -> Self {
        Renderer {
            parsers,
            providers,
            options,
            allow_lists: AllowListCache::new(),
            render_cache: None,
        }
    }

    /// Enable the render cache with the given compression and the default entry bound
    pub fn with_render_cache(self, compression: Compression) -> Self {
        self.with_bounded_render_cache(compression, DEFAULT_RENDER_CACHE_ENTRIES)
    }

    /// Enable the render cache, keeping at most `max_entries` renderings
    pub fn with_bounded_render_cache(mut self, compression: Compression, max_entries: usize) -> Self {
        self.render_cache = Some(RenderCache::new(compression).with_max_entries(max_entries));
        self
    }

    /// Built-in parsers and providers, default options, no render cache
    pub fn with_defaults() -> Self {
        Self::new(
            ParserRegistry::with_defaults(),
            ProviderRegistry::with_defaults(),
            RenderOptions::default(),
        )
    }

    pub fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }

    pub fn providers(&self) -> &ProviderRegistry {
        &self.providers
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    pub fn render_cache(&self) -> Option<&RenderCache> {
        self.render_cache.as_ref()
    }

    /// The merged allow-list for a parser and theme, memoized per key
    pub fn effective_allow_list(&self, parser: &ParserId, theme: Option<&ThemeId>) -> Arc<AllowList> {
        self.allow_lists.get_or_compute(parser, theme, || {
            self.providers.effective_allow_list(parser, theme)
        })
    }

    /// Render Markdown to sanitized HTML
    ///
    /// `parser` defaults to [`RenderOptions::default_parser`]. Fails if the parser is unknown,
    /// the backend fails, or a cached entry cannot be decoded.
    pub fn render(
        &self,
        markdown: &str,
        parser: Option<&ParserId>,
        theme: Option<&ThemeId>,
    ) -> Result<RenderedMarkdown> {
        let parser_id = parser.unwrap_or(&self.options.default_parser);
        let backend = self.parsers.get(parser_id.as_str())?;
        let source_hash = RenderCache::key(parser_id, theme, markdown);

        if let Some(cache) = &self.render_cache {
            if let Some(html) = cache.get(&source_hash)? {
                tracing::debug!(parser = %parser_id, hash = %source_hash, "Render cache hit");
                return Ok(self.rendered(html, parser_id, theme, source_hash));
            }
        }

        let raw = backend.convert_to_html(markdown)?;
        let allow_list = self.effective_allow_list(parser_id, theme);
        let html = sanitize_html(&raw, &allow_list, &self.options.sanitize)?;

        if let Some(cache) = &self.render_cache {
            cache.insert(source_hash.clone(), &html)?;
        }

        Ok(self.rendered(html, parser_id, theme, source_hash))
    }

    fn rendered(
        &self,
        html: String,
        parser: &ParserId,
        theme: Option<&ThemeId>,
        source_hash: String,
    ) -> RenderedMarkdown {
        RenderedMarkdown {
            size: html.len(),
            html,
            parser: parser.clone(),
            theme: theme.cloned(),
            source_hash,
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
