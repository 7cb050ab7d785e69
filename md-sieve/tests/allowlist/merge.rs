use md_sieve::allowlist::AttributePermission::{Allowed, Denied};
use md_sieve::query::{is_attribute_allowed, is_tag_allowed};
use md_sieve::{merge_allow_lists, AllowList, AttributePermission, TagRule};
use serde_json::json;

fn list(value: serde_json::Value) -> AllowList {
    serde_json::from_value(value).expect("valid allow-list JSON")
}

#[test]
fn test_later_contribution_wins_on_collision() {
    let a = list(json!({ "div": { "x": true } }));
    let b = list(json!({ "div": { "x": false } }));

    let ab = merge_allow_lists([&a, &b]);
    let ba = merge_allow_lists([&b, &a]);

    assert_eq!(ab.tag("div").and_then(|r| r.get("x")), Some(&Denied));
    assert_eq!(ba.tag("div").and_then(|r| r.get("x")), Some(&Allowed));
    assert_ne!(ab, ba);
}

#[test]
fn test_union_not_replacement() {
    let merged = merge_allow_lists([
        list(json!({ "div": { "class": true } })),
        list(json!({ "div": { "id": true } })),
    ]);

    let expected = AllowList::new().with_tag(
        "div",
        TagRule::new().with("class", Allowed).with("id", Allowed),
    );
    assert_eq!(merged, expected);
}

#[test]
fn test_concrete_tag_beats_wildcard() {
    let merged = merge_allow_lists([
        list(json!({ "*": { "data-x": true } })),
        list(json!({ "div": { "data-x": false } })),
    ]);

    assert!(!is_attribute_allowed(&merged, "div", "data-x", "1"));
    assert!(is_attribute_allowed(&merged, "span", "data-x", "1"));
}

#[test]
fn test_concrete_tag_beats_later_wildcard() {
    let merged = merge_allow_lists([
        list(json!({ "div": { "data-x": false } })),
        list(json!({ "*": { "data-x": true } })),
    ]);

    assert!(!is_attribute_allowed(&merged, "div", "data-x", "1"));
    assert!(is_attribute_allowed(&merged, "p", "data-x", "1"));
}

#[test]
fn test_wildcard_defaults_are_materialized() {
    let merged = merge_allow_lists([
        list(json!({ "*": { "data-align": true } })),
        list(json!({ "img": { "src": true } })),
    ]);

    let img = merged.tag("img").expect("img rule");
    assert_eq!(img.get("data-align"), Some(&Allowed));
    assert_eq!(img.get("src"), Some(&Allowed));
    // the wildcard entry itself stays
    assert!(merged.contains_tag("*"));
}

#[test]
fn test_empty_value_set_denies() {
    let merged = merge_allow_lists([AllowList::new().allow(
        "a",
        "href",
        AttributePermission::values(Vec::<String>::new()),
    )]);

    assert!(is_tag_allowed(&merged, "a"));
    assert!(!is_attribute_allowed(&merged, "a", "href", "https://x"));
}

#[test]
fn test_value_restriction() {
    let merged = merge_allow_lists([list(json!({ "a": { "target": ["_blank"] } }))]);

    assert!(is_attribute_allowed(&merged, "a", "target", "_blank"));
    assert!(!is_attribute_allowed(&merged, "a", "target", "_self"));
    assert!(!is_attribute_allowed(&merged, "a", "target", "_BLANK"));
}

#[test]
fn test_value_sets_are_replaced_not_unioned() {
    let merged = merge_allow_lists([
        list(json!({ "a": { "target": ["_blank", "_top"] } })),
        list(json!({ "a": { "target": ["_self"] } })),
    ]);

    assert!(is_attribute_allowed(&merged, "a", "target", "_self"));
    assert!(!is_attribute_allowed(&merged, "a", "target", "_blank"));
    assert!(!is_attribute_allowed(&merged, "a", "target", "_top"));
}

#[test]
fn test_empty_merge_denies_everything() {
    let merged = merge_allow_lists(Vec::<AllowList>::new());

    assert!(merged.is_empty());
    assert!(!is_tag_allowed(&merged, "p"));
    assert!(!is_tag_allowed(&merged, "*"));
    assert!(!is_attribute_allowed(&merged, "p", "class", "x"));
}

#[test]
fn test_drupal_media_scenario() {
    let merged = merge_allow_lists([
        list(json!({ "*": { "data-align": true } })),
        list(json!({
            "drupal-media": { "data-entity-uuid": true, "data-align": false }
        })),
    ]);

    assert!(is_attribute_allowed(&merged, "span", "data-align", "center"));
    assert!(!is_attribute_allowed(&merged, "drupal-media", "data-align", "center"));
    assert!(is_attribute_allowed(&merged, "drupal-media", "data-entity-uuid", "abc"));
    assert!(!is_attribute_allowed(&merged, "span", "data-entity-uuid", "abc"));
}

#[test]
fn test_tag_with_no_attributes_is_allowed() {
    let merged = merge_allow_lists([list(json!({ "br": {} }))]);

    assert!(is_tag_allowed(&merged, "br"));
    assert!(!is_attribute_allowed(&merged, "br", "class", "x"));
}

#[test]
fn test_tag_wildcard_attribute() {
    let merged = merge_allow_lists([list(json!({ "span": { "*": true, "onclick": false } }))]);

    assert!(is_attribute_allowed(&merged, "span", "class", "x"));
    assert!(is_attribute_allowed(&merged, "span", "lang", "en"));
    assert!(!is_attribute_allowed(&merged, "span", "onclick", "x()"));
}

#[test]
fn test_explicit_removal() {
    let merged = merge_allow_lists([list(json!({ "p": {}, "iframe": { "src": true } }))]);
    let narrowed = merged.without_tag("iframe");

    assert!(is_tag_allowed(&merged, "iframe"));
    assert!(!is_tag_allowed(&narrowed, "iframe"));
    assert!(is_tag_allowed(&narrowed, "p"));
}
