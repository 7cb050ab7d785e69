//! Shared configuration loader for md-sieve.
//!
//! `defaults/md-sieve.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`SieveConfig`],
//! and turn the result into a ready [`Renderer`] with [`SieveConfig::build_renderer`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use md_sieve::cache::Compression;
use md_sieve::parser::registry::apply_settings;
use md_sieve::parser::{ComrakParser, MarkdownParser, ParserRegistry};
use md_sieve::providers::{
    CoreSyntaxProvider, FilterAlignCaptionProvider, MediaEmbedProvider, ThemeOverrideProvider,
    ThemeOverrides,
};
use md_sieve::{
    ParserId, ProviderRegistry, RenderOptions, Renderer, SanitizeOptions, SieveError, ThemeId,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/md-sieve.default.toml");

/// Top-level configuration consumed by md-sieve applications.
#[derive(Debug, Clone, Deserialize)]
pub struct SieveConfig {
    pub parser: ParserConfig,
    pub filters: FiltersConfig,
    pub sanitize: SanitizeConfig,
    pub cache: CacheConfig,
    /// Theme id → overrides
    #[serde(default)]
    pub themes: BTreeMap<String, ThemeOverrides>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub default: String,
    pub max_input_size: usize,
    /// Parser id → setting id → value
    #[serde(default)]
    pub settings: HashMap<String, HashMap<String, bool>>,
}

/// Which optional providers take part.
#[derive(Debug, Clone, Deserialize)]
pub struct FiltersConfig {
    pub align_caption: bool,
    pub media_embed: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SanitizeConfig {
    pub allowed_protocols: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub compression: Compression,
    pub max_entries: usize,
}

impl SieveConfig {
    /// The parser registry with configured settings and input limit applied.
    ///
    /// Settings for a parser that doesn't exist, or an unknown setting id, are errors.
    pub fn build_parsers(&self) -> Result<ParserRegistry, SieveError> {
        let builtins = [ComrakParser::commonmark(), ComrakParser::extra()];

        if let Some(unknown) = self
            .parser
            .settings
            .keys()
            .find(|id| !builtins.iter().any(|parser| parser.id() == id.as_str()))
        {
            return Err(SieveError::ParserNotFound(unknown.clone()));
        }

        let mut registry = ParserRegistry::new();
        for parser in builtins {
            let overrides = self
                .parser
                .settings
                .get(parser.id())
                .into_iter()
                .flatten()
                .map(|(setting, value)| (setting.as_str(), *value));
            let settings = apply_settings(parser.id(), *parser.settings(), overrides)?;
            registry.register(
                parser
                    .with_settings(settings)
                    .with_max_input_size(self.parser.max_input_size),
            )?;
        }
        Ok(registry)
    }

    /// The provider registry: built-in providers plus one provider per configured theme.
    pub fn build_providers(&self) -> Result<ProviderRegistry, SieveError> {
        let mut registry = ProviderRegistry::new();
        registry.register(CoreSyntaxProvider)?;
        registry.register(FilterAlignCaptionProvider::new(self.filters.align_caption))?;
        registry.register(MediaEmbedProvider::new(self.filters.media_embed))?;

        for (theme, overrides) in &self.themes {
            for parser in &overrides.parsers {
                if !is_builtin_parser(parser) {
                    tracing::warn!(theme = %theme, parser = %parser, "Theme override names an unknown parser");
                }
            }
            registry.register(ThemeOverrideProvider::from_overrides(
                ThemeId::new(theme.as_str()),
                overrides.clone(),
            ))?;
        }
        Ok(registry)
    }

    /// Wire parsers, providers, sanitizer options and cache into a renderer.
    pub fn build_renderer(&self) -> Result<Renderer, SieveError> {
        let parsers = self.build_parsers()?;
        if !parsers.has(&self.parser.default) {
            return Err(SieveError::ParserNotFound(self.parser.default.clone()));
        }

        let options = RenderOptions {
            default_parser: ParserId::new(self.parser.default.as_str()),
            sanitize: SanitizeOptions::with_protocols(self.sanitize.allowed_protocols.iter().cloned()),
        };
        let renderer = Renderer::new(parsers, self.build_providers()?, options);

        Ok(if self.cache.enabled {
            renderer.with_bounded_render_cache(self.cache.compression, self.cache.max_entries)
        } else {
            renderer
        })
    }
}

fn is_builtin_parser(id: &str) -> bool {
    [md_sieve::parser::COMMONMARK, md_sieve::parser::EXTRA].contains(&id)
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<SieveConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<SieveConfig, ConfigError> {
    Loader::new().build()
}
