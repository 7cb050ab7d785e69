//! comrak-backed parsers
//!
//! # Library Choice
//!
//! We use the `comrak` crate for both dialects:
//! - CommonMark compliant, with GFM-style extensions toggled individually
//! - Renders HTML directly, so no intermediate representation of our own is needed
//! - Raw HTML can be passed through untouched; the sanitizer decides what survives
//!
//! The two built-in parsers differ only in their default [`ParserSettings`].

use super::settings::ParserSettings;
use super::{ConversionError, MarkdownParser, COMMONMARK, EXTRA};
use comrak::{format_html, parse_document, Arena, Options};

/// Markdown parser backed by comrak
#[derive(Debug, Clone)]
pub struct ComrakParser {
    id: String,
    label: String,
    settings: ParserSettings,
    /// Bytes; 0 means unlimited
    max_input_size: usize,
}

impl ComrakParser {
    pub fn new(id: impl Into<String>, label: impl Into<String>, settings: ParserSettings) -> Self {
        ComrakParser {
            id: id.into(),
            label: label.into(),
            settings,
            max_input_size: 0,
        }
    }

    /// Strict CommonMark
    pub fn commonmark() -> Self {
        Self::new(COMMONMARK, "CommonMark", ParserSettings::commonmark())
    }

    /// CommonMark with tables, footnotes, description lists and friends
    pub fn extra() -> Self {
        Self::new(EXTRA, "Markdown Extra", ParserSettings::extra())
    }

    pub fn with_settings(mut self, settings: ParserSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_max_input_size(mut self, max_input_size: usize) -> Self {
        self.max_input_size = max_input_size;
        self
    }

    fn comrak_options(&self) -> Options<'static> {
        let settings = &self.settings;
        let mut options = Options::default();
        options.extension.table = settings.tables;
        options.extension.strikethrough = settings.strikethrough;
        options.extension.autolink = settings.link_urls;
        options.extension.tasklist = settings.task_lists;
        options.extension.footnotes = settings.footnotes;
        options.extension.description_lists = settings.description_lists;
        options.extension.header_ids = settings.header_ids.then(String::new);
        options.parse.smart = settings.smart_punctuation;
        options.render.hardbreaks = settings.hard_breaks;
        options.render.escape = settings.escape_html;
        options.render.unsafe_ = !settings.escape_html;
        options
    }
}

impl MarkdownParser for ComrakParser {
    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    fn convert_to_html(&self, markdown: &str) -> Result<String, ConversionError> {
        if self.max_input_size > 0 && markdown.len() > self.max_input_size {
            return Err(ConversionError::InputTooLarge {
                size: markdown.len(),
                limit: self.max_input_size,
            });
        }

        let arena = Arena::new();
        let options = self.comrak_options();
        let root = parse_document(&arena, markdown, &options);

        let mut output = Vec::new();
        format_html(root, &options, &mut output)
            .map_err(|e| ConversionError::Backend(format!("HTML rendering failed: {e}")))?;

        String::from_utf8(output)
            .map_err(|e| ConversionError::Backend(format!("UTF-8 conversion failed: {e}")))
    }
}
