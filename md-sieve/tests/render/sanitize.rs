use md_sieve::providers::core_syntax::extra_tags;
use md_sieve::{sanitize_html, AllowList, AttributePermission, SanitizeOptions, WILDCARD};

fn sanitize(html: &str, list: &AllowList) -> String {
    sanitize_html(html, list, &SanitizeOptions::default()).unwrap()
}

#[test]
fn test_nested_disallowed_markup_is_flattened() {
    let html = "<div><article><p>Keep <font color=\"red\">this</font></p></article></div>";
    assert_eq!(sanitize(html, &extra_tags()), "<p>Keep this</p>");
}

#[test]
fn test_form_controls_are_removed() {
    let html = "<p>a</p><textarea>secret</textarea><p>b<input type=\"text\" value=\"x\"></p>";
    assert_eq!(sanitize(html, &extra_tags()), "<p>a</p><p>b<input></p>");
}

#[test]
fn test_task_list_checkbox_survives() {
    let html = "<li><input type=\"checkbox\" checked=\"\" disabled=\"\"> done</li>";
    assert_eq!(
        sanitize(html, &extra_tags()),
        "<li><input type=\"checkbox\" checked=\"\" disabled=\"\"> done</li>"
    );
}

#[test]
fn test_wildcard_attribute_respects_event_handlers() {
    let list = AllowList::new().allow("span", WILDCARD, AttributePermission::Allowed);
    let html = "<span class=\"x\" onload=\"y()\" style=\"color: red\">t</span>";
    assert_eq!(sanitize(html, &list), "<span class=\"x\" style=\"color: red\">t</span>");
}

#[test]
fn test_image_sources_are_protocol_checked() {
    let html = "<img src=\"data:image/png;base64,AAAA\" alt=\"a\"><img src=\"/logo.png\" alt=\"b\">";
    assert_eq!(
        sanitize(html, &extra_tags()),
        "<img alt=\"a\"><img src=\"/logo.png\" alt=\"b\">"
    );
}

fn deeply_nested(tag: &str, depth: usize) -> String {
    format!("{}x{}", format!("<{tag}>").repeat(depth), format!("</{tag}>").repeat(depth))
}

#[test]
fn test_deep_nesting_is_kept_without_overflow() {
    let depth = 60_000;
    let list = AllowList::new().with_bare_tag("span");
    let out = sanitize(&format!("<p>{}</p>", deeply_nested("span", depth)), &list);

    assert_eq!(out.matches("<span>").count(), depth);
    assert_eq!(out.matches("</span>").count(), depth);
    assert!(out.starts_with("<span><span>"));
    assert!(out.contains("<span>x</span>"));
}

#[test]
fn test_deep_nesting_of_disallowed_tags_unwraps_to_text() {
    let list = AllowList::new().with_bare_tag("p");
    let out = sanitize(&format!("<p>{}</p>", deeply_nested("span", 60_000)), &list);
    assert_eq!(out, "<p>x</p>");
}
