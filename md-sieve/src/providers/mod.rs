//! Provider implementations
//!
//! This module contains the built-in allow-list providers. Each one is a plain struct implementing
//! [`AllowListContributor`]; shared tag tables are ordinary functions the providers compose.

pub mod core_syntax;
pub mod filters;
pub mod media;
pub mod theme;

pub use core_syntax::CoreSyntaxProvider;
pub use filters::FilterAlignCaptionProvider;
pub use media::MediaEmbedProvider;
pub use theme::{ThemeOverrideProvider, ThemeOverrides};

use crate::allowlist::AllowList;
use crate::provider::{AllowListContributor, ParserId, ThemeId};

/// Provider returning a fixed allow-list
///
/// Optionally restricted to a set of parsers; an empty restriction applies to every parser.
pub struct StaticProvider {
    id: String,
    label: String,
    weight: Option<i32>,
    parsers: Vec<ParserId>,
    allowed: AllowList,
}

impl StaticProvider {
    pub fn new(id: impl Into<String>, allowed: AllowList) -> Self {
        StaticProvider {
            id: id.into(),
            label: String::new(),
            weight: None,
            parsers: Vec::new(),
            allowed,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Limit the provider to the given parsers
    pub fn for_parsers<I, P>(mut self, parsers: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<ParserId>,
    {
        self.parsers = parsers.into_iter().map(Into::into).collect();
        self
    }
}

impl AllowListContributor for StaticProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn weight(&self) -> Option<i32> {
        self.weight
    }

    fn is_applicable(&self, parser: &ParserId) -> Result<bool, crate::provider::ProviderError> {
        Ok(self.parsers.is_empty() || self.parsers.contains(parser))
    }

    fn contribute(&self, _parser: &ParserId, _theme: Option<&ThemeId>) -> AllowList {
        self.allowed.clone()
    }
}
