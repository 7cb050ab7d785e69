//! Allow-list tests
//!
//! Merge semantics, query precedence and the provider registry, driven through the public API.

mod merge;
mod properties;
mod registry;
mod serde_shape;
