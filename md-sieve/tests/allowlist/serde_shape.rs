use insta::assert_snapshot;
use md_sieve::{merge_allow_lists, AllowList, AttributePermission};
use serde_json::json;

fn sample() -> AllowList {
    let contributions: Vec<AllowList> = serde_json::from_value(json!([
        { "*": { "data-align": true } },
        { "a": { "href": true, "title": true }, "br": {} },
        { "input": { "type": ["checkbox"], "checked": true } },
        { "span": { "data-align": false } }
    ]))
    .unwrap();
    merge_allow_lists(&contributions)
}

#[test]
fn test_allowed_html_text_form() {
    assert_snapshot!(
        sample().to_allowed_html(),
        @r#"<* data-align> <a data-align href title> <br data-align> <input checked data-align type="checkbox"> <span>"#
    );
}

#[test]
fn test_json_shape() {
    let value = serde_json::to_value(sample()).unwrap();
    assert_eq!(value["span"], json!({ "data-align": false }));
    assert_eq!(value["input"]["type"], json!(["checkbox"]));
    assert_eq!(value["br"], json!({ "data-align": true }));
}

#[test]
fn test_malformed_permissions_fail_closed() {
    let list: AllowList = serde_json::from_value(json!({
        "a": { "href": 1, "title": { "nested": true }, "rel": "nofollow" },
        "p": true
    }))
    .unwrap();

    let a = list.tag("a").unwrap();
    assert_eq!(a.get("href"), Some(&AttributePermission::Denied));
    assert_eq!(a.get("title"), Some(&AttributePermission::Denied));
    assert_eq!(a.get("rel"), Some(&AttributePermission::values(["nofollow"])));

    assert!(list.is_tag_allowed("p"));
    assert!(list.tag("p").unwrap().is_empty());
}
