//! Rendering tests
//!
//! Markdown in, sanitized HTML out, through the built-in parsers and providers.

mod pipeline;
mod sanitize;
