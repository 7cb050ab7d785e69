//! HTML allow-lists for Markdown parser output
//!
//!     Markdown parsers emit HTML, and that HTML must be cut down to what the site is willing to
//!     serve before it reaches a page. This crate decides *what* may survive: a set of providers
//!     each contribute a partial allow-list (tags → attributes → permission), the registry merges
//!     them in a deterministic order, and a query layer answers "may this tag / attribute / value
//!     appear?". The renderer glues that to a parser and an HTML sanitizer.
//!
//!     TLDR: For provider authors:
//!         - Implement AllowListContributor (see ./provider.rs), return only what you add
//!         - Register in the order you want merged, or declare a weight (lower merges first);
//!           later providers win per attribute
//!         - Use `*` as the tag to grant an attribute on every tag, or as the attribute to grant
//!           every attribute on a tag
//!         - Don't sanitize anything yourself; the allow-list is data, enforcement lives in
//!           ./sanitize.rs
//!
//! Architecture
//!
//!     The allow-list model (./allowlist.rs) is plain data and serializes to the same JSON shape
//!     the providers are usually written in:
//!
//!         { "a": { "href": true, "target": ["_blank"] }, "*": { "data-align": true } }
//!
//!     Merging (./merge.rs) and querying (./query.rs) are pure functions over that model, so the
//!     interesting logic can be tested without any parser or provider in sight.
//!
//!     This is a pure lib, that is, it powers md-sieve-cli but is shell agnostic: no code here
//!     should print, read env vars or exit.
//!
//!     The file structure :
//!     .
//!     ├── error.rs
//!     ├── allowlist.rs            # AllowList, TagRule, AttributePermission
//!     ├── merge.rs                # ordered, per-attribute merge
//!     ├── query.rs                # tag / attribute / value checks
//!     ├── provider.rs             # AllowListContributor trait, ParserId, ThemeId
//!     ├── registry.rs             # ProviderRegistry: ordering, applicability, effective list
//!     ├── providers
//!     │   ├── core_syntax.rs      # what each dialect's own syntax produces
//!     │   ├── filters.rs          # data-align / data-caption
//!     │   ├── media.rs            # <drupal-media> embeds
//!     │   └── theme.rs            # per-theme overrides from configuration
//!     ├── parser
//!     │   ├── backend.rs          # comrak-backed parsers
//!     │   ├── settings.rs         # typed settings and their string ids
//!     │   └── registry.rs         # ParserRegistry
//!     ├── sanitize.rs             # allow-list enforcement on HTML
//!     ├── cache.rs                # memoized allow-lists, render cache, compression
//!     ├── render.rs               # Markdown → sanitized HTML pipeline
//!     └── lib.rs
//!
//! Testing
//!     tests
//!     └── <area>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.
//!
//! Core Algorithms
//!
//!     Providers merge in registration order. A provider that declares a weight is placed by it
//!     (lower first, unweighted providers count as 0 and come first within a weight), and
//!     weighted providers of equal weight fall back to id order. Each provider's list is folded in attribute by
//!     attribute: a later provider replaces the permission of an attribute it names and leaves the
//!     others alone. After the fold, attributes granted on the `*` tag are copied onto every
//!     concrete tag that doesn't name them itself.
//!
//!     Lookups go from specific to general: exact (tag, attribute), then the tag's `*`
//!     attribute, then the `*` tag's attribute, then `*`/`*`. The first entry found decides, so an
//!     explicit denial is never overridden by a wildcard grant.
//!
//! Library Choices
//!
//!     We never parse Markdown or HTML ourselves. comrak turns Markdown into HTML, html5ever (with
//!     markup5ever_rcdom) parses and re-serializes it for sanitizing, and url checks link
//!     protocols.
//!
pub mod allowlist;
pub mod cache;
pub mod error;
pub mod merge;
pub mod parser;
pub mod provider;
pub mod providers;
pub mod query;
pub mod registry;
pub mod render;
pub mod sanitize;

pub use allowlist::{AllowList, AttributePermission, TagRule, WILDCARD};
pub use cache::Compression;
pub use error::{Result, SieveError};
pub use merge::merge_allow_lists;
pub use parser::{MarkdownParser, ParserRegistry, ParserSettings};
pub use provider::{AllowListContributor, ParserId, ProviderError, ThemeId};
pub use registry::ProviderRegistry;
pub use render::{RenderOptions, RenderedMarkdown, Renderer};
pub use sanitize::{sanitize_html, SanitizeOptions};
