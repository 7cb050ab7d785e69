//! Allow-list contributor trait definition
//!
//! This module defines the capability every allow-list provider implements, plus the identity
//! types a provider is asked about. Providers are independent: none of them knows which others
//! are registered, and the only thing that relates them is the order the registry queries them.

use crate::allowlist::AllowList;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of the Markdown backend that produced the HTML
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParserId(String);

impl ParserId {
    pub fn new(id: impl Into<String>) -> Self {
        ParserId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParserId {
    fn from(id: &str) -> Self {
        ParserId::new(id)
    }
}

impl fmt::Display for ParserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the active presentation theme
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeId(String);

impl ThemeId {
    pub fn new(id: impl Into<String>) -> Self {
        ThemeId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ThemeId {
    fn from(id: &str) -> Self {
        ThemeId::new(id)
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Failure of an applicability check
///
/// The registry never propagates these; a failing check means "not applicable".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("requirement not met: {0}")]
    MissingRequirement(String),
    #[error("{0}")]
    Failed(String),
}

/// Trait for allow-list providers
///
/// # Examples
///
/// ```ignore
/// struct TablesProvider;
///
/// impl AllowListContributor for TablesProvider {
///     fn id(&self) -> &str {
///         "tables"
///     }
///
///     fn contribute(&self, _parser: &ParserId, _theme: Option<&ThemeId>) -> AllowList {
///         AllowList::new().with_bare_tags(["table", "tr", "td"])
///     }
/// }
/// ```
pub trait AllowListContributor: Send + Sync {
    /// Unique identifier used for registration and ordering ties
    fn id(&self) -> &str;

    /// Human readable label
    fn label(&self) -> &str {
        ""
    }

    /// Explicit priority, if the provider declares one
    ///
    /// Lower weights are queried first, so higher weights win collisions. A provider without a
    /// weight counts as weight 0 and keeps its registration position among its peers.
    fn weight(&self) -> Option<i32> {
        None
    }

    /// Whether this provider takes part for `parser`
    ///
    /// Checked before [`AllowListContributor::contribute`]; an `Err` counts as not applicable.
    fn is_applicable(&self, _parser: &ParserId) -> Result<bool, ProviderError> {
        Ok(true)
    }

    /// The partial allow-list for this context
    ///
    /// Must not fail: a provider with nothing meaningful to say returns an empty list.
    fn contribute(&self, parser: &ParserId, theme: Option<&ThemeId>) -> AllowList;
}
