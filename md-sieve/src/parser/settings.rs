//! Typed parser settings
//!
//! Settings are addressed by a string id in configuration and on the command line. Each id maps
//! to an applier function in [`SETTING_APPLIERS`]; there is no lookup of fields by name at
//! runtime beyond this table.

use serde::{Deserialize, Serialize};

/// Boolean switches understood by the built-in backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Render soft line breaks as `<br>`
    pub hard_breaks: bool,
    /// Curly quotes, dashes and ellipses
    pub smart_punctuation: bool,
    /// Escape raw HTML instead of passing it on to the sanitizer
    pub escape_html: bool,
    /// Turn bare URLs into links
    pub link_urls: bool,
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub task_lists: bool,
    pub description_lists: bool,
    /// Add anchor ids to headings
    pub header_ids: bool,
}

/// Function setting one field of [`ParserSettings`]
pub type SettingApplier = fn(&mut ParserSettings, bool);

/// Setting id → applier
pub static SETTING_APPLIERS: &[(&str, SettingApplier)] = &[
    ("hard_breaks", |s, v| s.hard_breaks = v),
    ("smart_punctuation", |s, v| s.smart_punctuation = v),
    ("escape_html", |s, v| s.escape_html = v),
    ("link_urls", |s, v| s.link_urls = v),
    ("tables", |s, v| s.tables = v),
    ("footnotes", |s, v| s.footnotes = v),
    ("strikethrough", |s, v| s.strikethrough = v),
    ("task_lists", |s, v| s.task_lists = v),
    ("description_lists", |s, v| s.description_lists = v),
    ("header_ids", |s, v| s.header_ids = v),
];

impl ParserSettings {
    /// Strict CommonMark: every extension off
    pub fn commonmark() -> Self {
        Self::default()
    }

    /// The Extra dialect's defaults
    pub fn extra() -> Self {
        ParserSettings {
            link_urls: true,
            tables: true,
            footnotes: true,
            strikethrough: true,
            task_lists: true,
            description_lists: true,
            header_ids: true,
            ..Self::default()
        }
    }

    /// Apply one setting by id
    ///
    /// Returns `false` (and leaves the settings untouched) when the id has no applier.
    pub fn apply(&mut self, setting: &str, value: bool) -> bool {
        match SETTING_APPLIERS.iter().find(|(id, _)| *id == setting) {
            Some((_, applier)) => {
                applier(self, value);
                true
            }
            None => false,
        }
    }

    /// All known setting ids, in table order
    pub fn setting_ids() -> impl Iterator<Item = &'static str> {
        SETTING_APPLIERS.iter().map(|(id, _)| *id)
    }
}
