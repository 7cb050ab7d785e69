//! Theme-scoped overrides
//!
//! A theme may widen or narrow the allow-list while it is active. Overrides are usually read
//! from configuration:
//!
//! ```toml
//! [themes.olivero]
//! weight = 100
//! parsers = ["extra"]
//!
//! [themes.olivero.allowed]
//! "*" = { data-align = false }
//! figure = { class = ["media"] }
//! ```

use crate::allowlist::AllowList;
use crate::provider::{AllowListContributor, ParserId, ProviderError, ThemeId};
use serde::{Deserialize, Serialize};

/// Weight used when an override does not declare one; after the built-in providers
pub const DEFAULT_THEME_WEIGHT: i32 = 100;

/// Serialized form of a theme's overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeOverrides {
    #[serde(default)]
    pub weight: Option<i32>,
    /// Parsers the override applies to; empty means all
    #[serde(default)]
    pub parsers: Vec<String>,
    #[serde(default)]
    pub allowed: AllowList,
}

/// Contributes its table only while its theme is the active one
pub struct ThemeOverrideProvider {
    id: String,
    theme: ThemeId,
    weight: i32,
    parsers: Vec<ParserId>,
    allowed: AllowList,
}

impl ThemeOverrideProvider {
    pub fn new(theme: ThemeId, allowed: AllowList) -> Self {
        ThemeOverrideProvider {
            id: format!("theme:{theme}"),
            theme,
            weight: DEFAULT_THEME_WEIGHT,
            parsers: Vec::new(),
            allowed,
        }
    }

    pub fn from_overrides(theme: ThemeId, overrides: ThemeOverrides) -> Self {
        let mut provider = Self::new(theme, overrides.allowed);
        provider.weight = overrides.weight.unwrap_or(DEFAULT_THEME_WEIGHT);
        provider.parsers = overrides.parsers.into_iter().map(ParserId::new).collect();
        provider
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn theme(&self) -> &ThemeId {
        &self.theme
    }

    /// Parsers this override is limited to (empty: all)
    pub fn parsers(&self) -> &[ParserId] {
        &self.parsers
    }
}

impl AllowListContributor for ThemeOverrideProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        "Theme overrides"
    }

    fn weight(&self) -> Option<i32> {
        Some(self.weight)
    }

    fn is_applicable(&self, parser: &ParserId) -> Result<bool, ProviderError> {
        Ok(self.parsers.is_empty() || self.parsers.contains(parser))
    }

    fn contribute(&self, _parser: &ParserId, theme: Option<&ThemeId>) -> AllowList {
        match theme {
            Some(active) if *active == self.theme => self.allowed.clone(),
            _ => AllowList::new(),
        }
    }
}
