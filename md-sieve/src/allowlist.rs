//! Allow-list data model
//!
//!     An [`AllowList`] maps tag names to a [`TagRule`], and a tag rule maps attribute names to an
//!     [`AttributePermission`]. Both levels accept the `*` wildcard ([`WILDCARD`]): a `*` tag
//!     applies to every tag, a `*` attribute applies to every attribute of its tag.
//!
//!     Tag and attribute names are stored in ASCII lowercase, the form the HTML parser reports
//!     them in; builders and deserialization fold case, lookups expect lowercase input.
//!
//!     Values are immutable in spirit: the builder methods consume `self` and return a new value,
//!     and the merger ([`crate::merge`]) always produces a fresh list. Maps are ordered
//!     (`BTreeMap`) so iteration, serialization and the text form are deterministic.
//!
//! Serialized Form
//!
//!     Providers configured from files use the natural JSON/TOML shape:
//!
//!         a = { href = true, target = ["_blank"] }
//!         "*" = { data-align = true }
//!         br = {}
//!
//!     `true` is [`AttributePermission::Allowed`], `false` is [`AttributePermission::Denied`], a
//!     list (or a single string) is [`AttributePermission::AllowedValues`]. Anything else is
//!     read as `Denied`, since this table gates untrusted HTML. A tag mapped to a non-table value
//!     (`p = true`, `p = false`) is a tag permitted with no attributes.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::btree_map;
use std::collections::{BTreeMap, BTreeSet};

/// Tag or attribute key meaning "applies to all"
pub const WILDCARD: &str = "*";

/// HTML names are ASCII case-insensitive
fn normalize_name(name: String) -> String {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        name.to_ascii_lowercase()
    } else {
        name
    }
}

/// Permission attached to one attribute of one tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributePermission {
    Allowed,
    Denied,
    /// Allowed only with one of these literal values (case-sensitive). An empty set denies.
    AllowedValues(BTreeSet<String>),
}

impl AttributePermission {
    /// Build a value restriction from any list of strings
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AttributePermission::AllowedValues(values.into_iter().map(Into::into).collect())
    }

    /// Whether an attribute carrying `value` passes this permission
    pub fn permits(&self, value: &str) -> bool {
        match self {
            AttributePermission::Allowed => true,
            AttributePermission::Denied => false,
            AttributePermission::AllowedValues(values) => values.contains(value),
        }
    }

    /// True for `Denied` and for an empty value set
    pub fn is_denied(&self) -> bool {
        match self {
            AttributePermission::Allowed => false,
            AttributePermission::Denied => true,
            AttributePermission::AllowedValues(values) => values.is_empty(),
        }
    }
}

impl From<bool> for AttributePermission {
    fn from(allowed: bool) -> Self {
        if allowed {
            AttributePermission::Allowed
        } else {
            AttributePermission::Denied
        }
    }
}

impl Serialize for AttributePermission {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AttributePermission::Allowed => serializer.serialize_bool(true),
            AttributePermission::Denied => serializer.serialize_bool(false),
            AttributePermission::AllowedValues(values) => values.serialize(serializer),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPermission {
    Flag(bool),
    Values(Vec<String>),
    Single(String),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for AttributePermission {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawPermission::deserialize(deserializer)? {
            RawPermission::Flag(allowed) => allowed.into(),
            RawPermission::Values(values) => AttributePermission::values(values),
            RawPermission::Single(value) => AttributePermission::values([value]),
            RawPermission::Other(_) => AttributePermission::Denied,
        })
    }
}

/// Attribute permissions for one tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagRule {
    attributes: BTreeMap<String, AttributePermission>,
}

impl TagRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`TagRule::insert`]
    pub fn with(mut self, attribute: impl Into<String>, permission: AttributePermission) -> Self {
        self.insert(attribute, permission);
        self
    }

    /// Set the permission for an attribute, replacing any previous entry
    pub fn insert(&mut self, attribute: impl Into<String>, permission: AttributePermission) {
        self.attributes
            .insert(normalize_name(attribute.into()), permission);
    }

    /// Set the permission only when the attribute has no entry yet
    pub fn insert_default(&mut self, attribute: &str, permission: &AttributePermission) {
        if !self.attributes.contains_key(attribute) {
            self.attributes
                .insert(attribute.to_string(), permission.clone());
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&AttributePermission> {
        self.attributes.get(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.attributes.contains_key(attribute)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, AttributePermission> {
        self.attributes.iter()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, AttributePermission)> for TagRule {
    fn from_iter<I: IntoIterator<Item = (K, AttributePermission)>>(iter: I) -> Self {
        let mut rule = TagRule::new();
        for (attribute, permission) in iter {
            rule.insert(attribute, permission);
        }
        rule
    }
}

impl<'a> IntoIterator for &'a TagRule {
    type Item = (&'a String, &'a AttributePermission);
    type IntoIter = btree_map::Iter<'a, String, AttributePermission>;

    fn into_iter(self) -> Self::IntoIter {
        self.attributes.iter()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTagRule {
    Attributes(BTreeMap<String, AttributePermission>),
    Other(IgnoredAny),
}

impl<'de> Deserialize<'de> for TagRule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawTagRule::deserialize(deserializer)? {
            RawTagRule::Attributes(attributes) => attributes.into_iter().collect(),
            RawTagRule::Other(_) => TagRule::new(),
        })
    }
}

/// Tag → attribute permission table
///
/// The unit each provider contributes and the unit the merger produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowList {
    tags: BTreeMap<String, TagRule>,
}

impl AllowList {
    /// Create an empty allow-list; every query against it is denied
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the rule for a tag
    pub fn with_tag(mut self, tag: impl Into<String>, rule: TagRule) -> Self {
        self.tags.insert(normalize_name(tag.into()), rule);
        self
    }

    /// Permit a tag with no attributes, keeping any rule it already has
    pub fn with_bare_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.entry(normalize_name(tag.into())).or_default();
        self
    }

    /// Permit several tags with no attributes
    pub fn with_bare_tags<I, S>(self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tags.into_iter().fold(self, |list, tag| list.with_bare_tag(tag))
    }

    /// Set one attribute permission, creating the tag rule if needed
    pub fn allow(
        mut self,
        tag: impl Into<String>,
        attribute: impl Into<String>,
        permission: AttributePermission,
    ) -> Self {
        self.tags
            .entry(normalize_name(tag.into()))
            .or_default()
            .insert(attribute, permission);
        self
    }

    /// A copy of this list with `tag` removed entirely
    pub fn without_tag(&self, tag: &str) -> Self {
        let mut tags = self.tags.clone();
        tags.remove(tag);
        AllowList { tags }
    }

    pub fn tag(&self, tag: &str) -> Option<&TagRule> {
        self.tags.get(tag)
    }

    pub fn contains_tag(&self, tag: &str) -> bool {
        self.tags.contains_key(tag)
    }

    /// Tag names in sorted order
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, TagRule> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Whether `tag` may appear at all (see [`crate::query::is_tag_allowed`])
    pub fn is_tag_allowed(&self, tag: &str) -> bool {
        crate::query::is_tag_allowed(self, tag)
    }

    /// Whether `attribute="value"` may appear on `tag` (see [`crate::query::is_attribute_allowed`])
    pub fn is_attribute_allowed(&self, tag: &str, attribute: &str, value: &str) -> bool {
        crate::query::is_attribute_allowed(self, tag, attribute, value)
    }

    /// Render the list in the single-line `allowed_html` form
    ///
    /// Tags and attributes come out sorted; denied attributes are omitted and value sets are
    /// written as a space separated attribute value.
    ///
    /// ```text
    /// <* data-align> <a href title> <input checked type="checkbox">
    /// ```
    pub fn to_allowed_html(&self) -> String {
        self.tags
            .iter()
            .map(|(tag, rule)| {
                let mut out = format!("<{tag}");
                for (attribute, permission) in rule {
                    match permission {
                        AttributePermission::Allowed => {
                            out.push(' ');
                            out.push_str(attribute);
                        }
                        AttributePermission::AllowedValues(values) if !values.is_empty() => {
                            let joined = values.iter().cloned().collect::<Vec<_>>().join(" ");
                            out.push_str(&format!(" {attribute}=\"{joined}\""));
                        }
                        _ => {}
                    }
                }
                out.push('>');
                out
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<BTreeMap<String, TagRule>> for AllowList {
    fn from(tags: BTreeMap<String, TagRule>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<AllowList> for BTreeMap<String, TagRule> {
    fn from(list: AllowList) -> Self {
        list.tags
    }
}

impl<K: Into<String>> FromIterator<(K, TagRule)> for AllowList {
    fn from_iter<I: IntoIterator<Item = (K, TagRule)>>(iter: I) -> Self {
        let mut tags: BTreeMap<String, TagRule> = BTreeMap::new();
        for (tag, rule) in iter {
            // names differing only in case share one rule
            let entry = tags.entry(normalize_name(tag.into())).or_default();
            for (attribute, permission) in rule.attributes {
                entry.attributes.insert(attribute, permission);
            }
        }
        AllowList { tags }
    }
}

impl<'de> Deserialize<'de> for AllowList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(BTreeMap::<String, TagRule>::deserialize(deserializer)?.into())
    }
}

impl<'a> IntoIterator for &'a AllowList {
    type Item = (&'a String, &'a TagRule);
    type IntoIter = btree_map::Iter<'a, String, TagRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}
