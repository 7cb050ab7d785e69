use md_sieve::query::is_attribute_allowed;
use md_sieve::{merge_allow_lists, AllowList, AttributePermission};
use proptest::prelude::*;

fn permission() -> impl Strategy<Value = AttributePermission> {
    prop_oneof![
        Just(AttributePermission::Allowed),
        Just(AttributePermission::Denied),
        prop::collection::btree_set("[a-c_]{1,3}", 0..3).prop_map(AttributePermission::AllowedValues),
    ]
}

fn allow_list() -> impl Strategy<Value = AllowList> {
    let tag = prop_oneof![Just("*"), Just("div"), Just("span"), Just("a")];
    let attribute = prop_oneof![Just("*"), Just("class"), Just("id"), Just("href")];
    prop::collection::vec((tag, attribute, permission()), 0..6).prop_map(|entries| {
        entries
            .into_iter()
            .fold(AllowList::new(), |list, (tag, attribute, permission)| {
                list.allow(tag, attribute, permission)
            })
    })
}

proptest! {
    #[test]
    fn merge_is_deterministic(lists in prop::collection::vec(allow_list(), 0..5)) {
        prop_assert_eq!(merge_allow_lists(&lists), merge_allow_lists(&lists));
    }

    #[test]
    fn merge_with_empty_is_identity_on_queries(list in allow_list(), value in "[a-c_]{1,3}") {
        let alone = merge_allow_lists([&list]);
        let padded = merge_allow_lists([&AllowList::new(), &list, &AllowList::new()]);
        prop_assert_eq!(&alone, &padded);

        for tag in ["div", "span", "a", "p"] {
            for attribute in ["class", "id", "href", "title"] {
                prop_assert_eq!(
                    is_attribute_allowed(&alone, tag, attribute, &value),
                    is_attribute_allowed(&padded, tag, attribute, &value)
                );
            }
        }
    }

    #[test]
    fn last_exact_entry_decides(first in permission(), second in permission(), value in "[a-c_]{1,3}") {
        let merged = merge_allow_lists([
            AllowList::new().allow("div", "class", first),
            AllowList::new().allow("div", "class", second.clone()),
        ]);
        prop_assert_eq!(is_attribute_allowed(&merged, "div", "class", &value), second.permits(&value));
    }

    #[test]
    fn denied_attribute_is_never_allowed(lists in prop::collection::vec(allow_list(), 0..4), value in "[a-c_]{1,3}") {
        let mut lists = lists;
        lists.push(AllowList::new().allow("span", "id", AttributePermission::Denied));
        let merged = merge_allow_lists(&lists);
        prop_assert!(!is_attribute_allowed(&merged, "span", "id", &value));
    }
}
