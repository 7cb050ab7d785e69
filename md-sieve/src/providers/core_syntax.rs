//! Tags the Markdown backends themselves emit
//!
//! Every backend shares the CommonMark table; the Extra dialect layers tables, footnotes,
//! description lists, strikethrough, task lists and heading anchors on top of it. A parser this
//! provider does not know gets an empty contribution rather than a guess.

use crate::allowlist::AttributePermission::Allowed;
use crate::allowlist::{AllowList, AttributePermission};
use crate::parser::{COMMONMARK, EXTRA};
use crate::provider::{AllowListContributor, ParserId, ThemeId};

/// Allow-list matching the output shape of the built-in parsers
pub struct CoreSyntaxProvider;

impl AllowListContributor for CoreSyntaxProvider {
    fn id(&self) -> &str {
        "core-syntax"
    }

    fn label(&self) -> &str {
        "Markdown syntax"
    }

    fn weight(&self) -> Option<i32> {
        Some(-100)
    }

    fn contribute(&self, parser: &ParserId, _theme: Option<&ThemeId>) -> AllowList {
        match parser.as_str() {
            COMMONMARK => commonmark_tags(),
            EXTRA => extra_tags(),
            _ => AllowList::new(),
        }
    }
}

/// Elements and attributes a CommonMark renderer produces
pub fn commonmark_tags() -> AllowList {
    AllowList::new()
        .with_bare_tags([
            "p",
            "br",
            "hr",
            "h1",
            "h2",
            "h3",
            "h4",
            "h5",
            "h6",
            "blockquote",
            "pre",
            "em",
            "strong",
            "ul",
            "li",
        ])
        .allow("code", "class", Allowed)
        .allow("a", "href", Allowed)
        .allow("a", "title", Allowed)
        .allow("img", "src", Allowed)
        .allow("img", "alt", Allowed)
        .allow("img", "title", Allowed)
        .allow("ol", "start", Allowed)
}

/// CommonMark plus the Extra dialect's elements
pub fn extra_tags() -> AllowList {
    let alignment = || AttributePermission::values(["left", "center", "right"]);

    let list = commonmark_tags()
        .with_bare_tags(["table", "thead", "tbody", "tr", "del", "dl", "dt", "dd"])
        .allow("th", "align", alignment())
        .allow("td", "align", alignment())
        .allow("input", "type", AttributePermission::values(["checkbox"]))
        .allow("input", "checked", Allowed)
        .allow("input", "disabled", Allowed)
        // footnotes
        .allow("sup", "class", AttributePermission::values(["footnote-ref"]))
        .allow("section", "class", AttributePermission::values(["footnotes"]))
        .allow("section", "data-footnotes", Allowed)
        .allow("li", "id", Allowed)
        .allow("a", "id", Allowed)
        .allow(
            "a",
            "class",
            AttributePermission::values(["anchor", "footnote-backref"]),
        )
        .allow("a", "aria-hidden", AttributePermission::values(["true"]))
        .allow("a", "aria-label", Allowed)
        .allow("a", "data-footnote-ref", Allowed)
        .allow("a", "data-footnote-backref", Allowed)
        .allow("a", "data-footnote-backref-idx", Allowed);

    // heading anchors carry the id
    ["h1", "h2", "h3", "h4", "h5", "h6"]
        .into_iter()
        .fold(list, |list, heading| list.allow(heading, "id", Allowed))
}
