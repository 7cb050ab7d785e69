//! Text-format filter contributions

use crate::allowlist::{AllowList, AttributePermission, WILDCARD};
use crate::provider::{AllowListContributor, ParserId, ProviderError, ThemeId};

/// Alignment and caption attributes, allowed on every tag
///
/// Mirrors the align and caption filters, which read `data-align` / `data-caption` from any
/// element. Takes part only when enabled.
pub struct FilterAlignCaptionProvider {
    enabled: bool,
}

impl FilterAlignCaptionProvider {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl AllowListContributor for FilterAlignCaptionProvider {
    fn id(&self) -> &str {
        "filter-align-caption"
    }

    fn label(&self) -> &str {
        "Align and caption filters"
    }

    fn is_applicable(&self, _parser: &ParserId) -> Result<bool, ProviderError> {
        Ok(self.enabled)
    }

    fn contribute(&self, _parser: &ParserId, _theme: Option<&ThemeId>) -> AllowList {
        AllowList::new()
            .allow(WILDCARD, "data-align", AttributePermission::Allowed)
            .allow(WILDCARD, "data-caption", AttributePermission::Allowed)
    }
}
