//! Parser registry for backend selection

use super::{ComrakParser, MarkdownParser, ParserSettings};
use crate::error::{Result, SieveError};
use std::collections::HashMap;

/// Registry of Markdown parsers, keyed by id
pub struct ParserRegistry {
    parsers: HashMap<String, Box<dyn MarkdownParser>>,
}

impl ParserRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ParserRegistry {
            parsers: HashMap::new(),
        }
    }

    /// Register a parser; an id collision is rejected
    pub fn register<P: MarkdownParser + 'static>(&mut self, parser: P) -> Result<()> {
        let id = parser.id().to_string();
        if self.parsers.contains_key(&id) {
            return Err(SieveError::DuplicateParser(id));
        }
        self.parsers.insert(id, Box::new(parser));
        Ok(())
    }

    /// Get a parser by id
    pub fn get(&self, id: &str) -> Result<&dyn MarkdownParser> {
        self.parsers
            .get(id)
            .map(|p| p.as_ref())
            .ok_or_else(|| SieveError::ParserNotFound(id.to_string()))
    }

    /// Check if a parser exists
    pub fn has(&self, id: &str) -> bool {
        self.parsers.contains_key(id)
    }

    /// List all parser ids (sorted)
    pub fn list_parsers(&self) -> Vec<String> {
        let mut names: Vec<_> = self.parsers.keys().cloned().collect();
        names.sort();
        names
    }

    /// Create a registry with the built-in parsers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        let _ = registry.register(ComrakParser::commonmark());
        let _ = registry.register(ComrakParser::extra());
        registry
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Apply `(setting id, value)` pairs to a copy of `base`
///
/// Unknown ids fail with [`SieveError::UnknownSetting`] naming the parser.
pub fn apply_settings<'a, I>(parser: &str, base: ParserSettings, overrides: I) -> Result<ParserSettings>
where
    I: IntoIterator<Item = (&'a str, bool)>,
{
    let mut settings = base;
    for (setting, value) in overrides {
        if !settings.apply(setting, value) {
            return Err(SieveError::UnknownSetting {
                parser: parser.to_string(),
                setting: setting.to_string(),
            });
        }
    }
    Ok(settings)
}
