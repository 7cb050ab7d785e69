//! Query interface consumed by the sanitizer
//!
//! Lookup order for an attribute is:
//!     1. exact tag, exact attribute
//!     2. exact tag, `*` attribute
//!     3. `*` tag, exact attribute
//!     4. `*` tag, `*` attribute
//!
//! The first entry that exists decides, including a `Denied` entry. No entry at all denies.
//!
//! The `*` tag only ever grants attributes. Whether a tag may appear at all depends on the tag
//! having a rule of its own.

use crate::allowlist::{AllowList, AttributePermission, WILDCARD};

/// Whether `tag` may appear: it has a rule of its own, possibly empty
pub fn is_tag_allowed(list: &AllowList, tag: &str) -> bool {
    tag != WILDCARD && list.contains_tag(tag)
}

/// Whether `attribute="value"` may appear on `tag`
///
/// A value restriction requires `value` to be a literal (case-sensitive) member of the set.
pub fn is_attribute_allowed(list: &AllowList, tag: &str, attribute: &str, value: &str) -> bool {
    lookup_permission(list, tag, attribute).is_some_and(|permission| permission.permits(value))
}

/// The permission that decides `attribute` on `tag`, if any entry applies
pub fn lookup_permission<'a>(
    list: &'a AllowList,
    tag: &str,
    attribute: &str,
) -> Option<&'a AttributePermission> {
    [
        (tag, attribute),
        (tag, WILDCARD),
        (WILDCARD, attribute),
        (WILDCARD, WILDCARD),
    ]
    .into_iter()
    .find_map(|(tag, attribute)| list.tag(tag)?.get(attribute))
}
