//! Allow-list merger
//!
//!     Folds an ordered sequence of contributions into one effective [`AllowList`].
//!
//!     1. A tag seen for the first time is copied as-is.
//!     2. A tag already present is merged attribute by attribute: the incoming permission
//!        overwrites the existing one for the same attribute, attributes the incoming rule does
//!        not mention are kept. Later contributions win on exact collisions, but never erase
//!        what they do not name.
//!     3. Once everything is folded, the `*` tag's permissions are copied as defaults into every
//!        concrete tag that does not define that attribute itself. A concrete entry beats the
//!        wildcard even when the wildcard came from a later contribution. The `*` entry stays
//!        in the result for tags that have no rule of their own.
//!
//!     The merge is pure: the same input sequence always yields a value-equal list, which is
//!     what makes caching by (parser, theme) safe.

use crate::allowlist::{AllowList, TagRule, WILDCARD};
use std::borrow::Borrow;
use std::collections::BTreeMap;

/// Merge contributions in order; an empty sequence yields an empty list
pub fn merge_allow_lists<I, L>(lists: I) -> AllowList
where
    I: IntoIterator<Item = L>,
    L: Borrow<AllowList>,
{
    let mut merged: BTreeMap<String, TagRule> = BTreeMap::new();

    for list in lists {
        for (tag, rule) in list.borrow() {
            match merged.get_mut(tag) {
                Some(existing) => {
                    for (attribute, permission) in rule {
                        existing.insert(attribute.clone(), permission.clone());
                    }
                }
                None => {
                    merged.insert(tag.clone(), rule.clone());
                }
            }
        }
    }

    resolve_wildcards(&mut merged);
    AllowList::from(merged)
}

/// Copy `*` tag permissions into concrete tags that lack them
fn resolve_wildcards(tags: &mut BTreeMap<String, TagRule>) {
    let Some(defaults) = tags.get(WILDCARD).cloned() else {
        return;
    };
    if defaults.is_empty() {
        return;
    }

    for (tag, rule) in tags.iter_mut() {
        if tag == WILDCARD {
            continue;
        }
        for (attribute, permission) in &defaults {
            rule.insert_default(attribute, permission);
        }
    }
}
