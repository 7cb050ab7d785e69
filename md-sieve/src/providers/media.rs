//! Media embed contribution

use crate::allowlist::{AllowList, AttributePermission, TagRule};
use crate::provider::{AllowListContributor, ParserId, ProviderError, ThemeId};

/// Element the media filter replaces with rendered media
pub const MEDIA_TAG: &str = "drupal-media";

/// Allows the `<drupal-media>` placeholder element and its data attributes
///
/// Alignment is handled by the media element itself, so `data-align` is explicitly denied on it
/// even when a global default allows it elsewhere.
pub struct MediaEmbedProvider {
    enabled: bool,
}

impl MediaEmbedProvider {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl AllowListContributor for MediaEmbedProvider {
    fn id(&self) -> &str {
        "media-embed"
    }

    fn label(&self) -> &str {
        "Embed media"
    }

    fn weight(&self) -> Option<i32> {
        Some(10)
    }

    fn is_applicable(&self, _parser: &ParserId) -> Result<bool, ProviderError> {
        Ok(self.enabled)
    }

    fn contribute(&self, _parser: &ParserId, _theme: Option<&ThemeId>) -> AllowList {
        let rule: TagRule = [
            "data-entity-type",
            "data-entity-uuid",
            "data-view-mode",
            "data-caption",
            "alt",
            "title",
        ]
        .into_iter()
        .map(|attribute| (attribute, AttributePermission::Allowed))
        .collect();

        AllowList::new().with_tag(
            MEDIA_TAG,
            rule.with("data-align", AttributePermission::Denied),
        )
    }
}
