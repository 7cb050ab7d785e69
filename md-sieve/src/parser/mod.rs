//! Markdown parser capability
//!
//! Converting Markdown to HTML is delegated to an external library; this module only defines the
//! seam ([`MarkdownParser`]), the built-in comrak backends and a registry to select them by id.
//! The HTML a parser returns is untrusted until it has been through [`crate::sanitize`].

pub mod backend;
pub mod registry;
pub mod settings;

pub use backend::ComrakParser;
pub use registry::ParserRegistry;
pub use settings::{ParserSettings, SETTING_APPLIERS};

use thiserror::Error;

/// Id of the strict CommonMark parser
pub const COMMONMARK: &str = "commonmark";
/// Id of the CommonMark + extensions parser
pub const EXTRA: &str = "extra";

/// Failure reported by a Markdown backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("{0}")]
    Backend(String),
    #[error("input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },
}

/// Trait for Markdown backends
pub trait MarkdownParser: Send + Sync {
    /// The id of this parser (e.g., "commonmark", "extra")
    fn id(&self) -> &str;

    /// Human readable name
    fn label(&self) -> &str {
        ""
    }

    /// Settings the parser was built with
    fn settings(&self) -> &ParserSettings;

    /// Convert Markdown to (unsanitized) HTML
    fn convert_to_html(&self, markdown: &str) -> Result<String, ConversionError>;
}
