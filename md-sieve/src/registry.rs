//! Provider registry for allow-list contributions
//!
//! This module provides a centralized registry for all allow-list providers.
//! Providers are registered once at startup and then queried per (parser, theme) request;
//! after population the registry is only read, so it can be shared freely.

use crate::allowlist::AllowList;
use crate::error::{Result, SieveError};
use crate::merge::merge_allow_lists;
use crate::provider::{AllowListContributor, ParserId, ThemeId};
use crate::providers::{CoreSyntaxProvider, FilterAlignCaptionProvider, MediaEmbedProvider};
use std::cmp::Ordering;

/// Registry of allow-list providers
///
/// Providers are queried in registration order unless they declare a weight. Weighted
/// providers sort by weight (lower first), and providers without one count as weight 0.
/// Within one weight, unweighted providers come first in registration order, followed by the
/// weighted ones by id.
///
/// # Examples
///
/// ```ignore
/// let mut registry = ProviderRegistry::new();
/// registry.register(CoreSyntaxProvider)?;
///
/// let list = registry.effective_allow_list(&ParserId::from("commonmark"), None);
/// assert!(list.is_tag_allowed("p"));
/// ```
pub struct ProviderRegistry {
    /// In registration order
    providers: Vec<Box<dyn AllowListContributor>>,
}

impl ProviderRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ProviderRegistry {
            providers: Vec::new(),
        }
    }

    /// Register a provider
    ///
    /// Fails if a provider with the same id already exists; the registry is left unchanged.
    pub fn register<P: AllowListContributor + 'static>(&mut self, provider: P) -> Result<()> {
        self.register_boxed(Box::new(provider))
    }

    /// Register an already boxed provider
    pub fn register_boxed(&mut self, provider: Box<dyn AllowListContributor>) -> Result<()> {
        if self.has(provider.id()) {
            return Err(SieveError::DuplicateProvider(provider.id().to_string()));
        }
        self.providers.push(provider);
        Ok(())
    }

    /// Get a provider by id
    pub fn get(&self, id: &str) -> Result<&dyn AllowListContributor> {
        self.providers
            .iter()
            .find(|p| p.id() == id)
            .map(|p| p.as_ref())
            .ok_or_else(|| SieveError::ProviderNotFound(id.to_string()))
    }

    /// Check if a provider exists
    pub fn has(&self, id: &str) -> bool {
        self.providers.iter().any(|p| p.id() == id)
    }

    /// List all provider ids (sorted)
    pub fn list_providers(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.providers.iter().map(|p| p.id().to_string()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Providers in query order
    pub fn ordered(&self) -> Vec<&dyn AllowListContributor> {
        let mut providers: Vec<(usize, &dyn AllowListContributor)> = self
            .providers
            .iter()
            .enumerate()
            .map(|(index, p)| (index, p.as_ref()))
            .collect();
        providers.sort_by(|(a_index, a), (b_index, b)| query_order(*a_index, *a, *b_index, *b));
        providers.into_iter().map(|(_, p)| p).collect()
    }

    /// Every applicable provider's non-empty contribution, in query order
    ///
    /// A provider whose applicability check fails or errors is skipped without being asked
    /// for its contribution.
    pub fn contributions_for(&self, parser: &ParserId, theme: Option<&ThemeId>) -> Vec<AllowList> {
        self.ordered()
            .into_iter()
            .filter(|provider| match provider.is_applicable(parser) {
                Ok(true) => true,
                Ok(false) => {
                    tracing::debug!(provider = provider.id(), %parser, "Provider not applicable");
                    false
                }
                Err(err) => {
                    tracing::warn!(
                        provider = provider.id(),
                        %parser,
                        error = %err,
                        "Applicability check failed, skipping provider"
                    );
                    false
                }
            })
            .map(|provider| provider.contribute(parser, theme))
            .filter(|list| !list.is_empty())
            .collect()
    }

    /// The merged allow-list for a parser and optional theme
    pub fn effective_allow_list(&self, parser: &ParserId, theme: Option<&ThemeId>) -> AllowList {
        let contributions = self.contributions_for(parser, theme);
        tracing::debug!(
            %parser,
            theme = theme.map(ThemeId::as_str),
            contributions = contributions.len(),
            "Merging allow-list contributions"
        );
        merge_allow_lists(&contributions)
    }

    /// Create a registry with the built-in providers
    ///
    /// The align/caption filter is enabled, media embedding is registered but disabled.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Built-in ids are distinct, registration cannot collide
        let _ = registry.register(CoreSyntaxProvider);
        let _ = registry.register(FilterAlignCaptionProvider::new(true));
        let _ = registry.register(MediaEmbedProvider::new(false));

        registry
    }
}

/// Effective weight, then unweighted before weighted, then registration index or id
fn query_order(
    a_index: usize,
    a: &dyn AllowListContributor,
    b_index: usize,
    b: &dyn AllowListContributor,
) -> Ordering {
    let (a_weight, b_weight) = (a.weight(), b.weight());
    a_weight
        .unwrap_or(0)
        .cmp(&b_weight.unwrap_or(0))
        .then_with(|| a_weight.is_some().cmp(&b_weight.is_some()))
        .then_with(|| match (a_weight, b_weight) {
            (Some(_), Some(_)) => a.id().cmp(b.id()),
            _ => a_index.cmp(&b_index),
        })
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
