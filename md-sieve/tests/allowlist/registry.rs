use md_sieve::providers::{MediaEmbedProvider, StaticProvider, ThemeOverrideProvider};
use md_sieve::{
    AllowList, AllowListContributor, AttributePermission, ParserId, ProviderError,
    ProviderRegistry, SieveError, ThemeId,
};

struct BrokenProvider;

impl AllowListContributor for BrokenProvider {
    fn id(&self) -> &str {
        "broken"
    }

    fn is_applicable(&self, _parser: &ParserId) -> Result<bool, ProviderError> {
        Err(ProviderError::MissingRequirement("media module".to_string()))
    }

    fn contribute(&self, _parser: &ParserId, _theme: Option<&ThemeId>) -> AllowList {
        panic!("contribute must not be called when not applicable")
    }
}

fn commonmark() -> ParserId {
    ParserId::from("commonmark")
}

#[test]
fn test_later_registration_wins_without_weights() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(StaticProvider::new("zeta", AllowList::new().allow("div", "x", true.into())))
        .unwrap();
    registry
        .register(StaticProvider::new("alpha", AllowList::new().allow("div", "x", false.into())))
        .unwrap();

    let ids: Vec<_> = registry.ordered().iter().map(|p| p.id().to_string()).collect();
    assert_eq!(ids, vec!["zeta", "alpha"]);
    assert!(!registry
        .effective_allow_list(&commonmark(), None)
        .is_attribute_allowed("div", "x", ""));
}

#[test]
fn test_registration_order_matters_without_weights() {
    let build = |reverse: bool| {
        let mut providers = vec![
            StaticProvider::new("a", AllowList::new().allow("div", "x", true.into())),
            StaticProvider::new("b", AllowList::new().allow("div", "x", false.into())),
        ];
        if reverse {
            providers.reverse();
        }
        let mut registry = ProviderRegistry::new();
        for provider in providers {
            registry.register(provider).unwrap();
        }
        registry.effective_allow_list(&commonmark(), None)
    };

    assert!(!build(false).is_attribute_allowed("div", "x", ""));
    assert!(build(true).is_attribute_allowed("div", "x", ""));
}

#[test]
fn test_declared_weights_ignore_registration_order() {
    let build = |reverse: bool| {
        let mut providers = vec![
            StaticProvider::new("a", AllowList::new().allow("div", "x", true.into())).with_weight(5),
            StaticProvider::new("b", AllowList::new().allow("div", "x", false.into())).with_weight(5),
        ];
        if reverse {
            providers.reverse();
        }
        let mut registry = ProviderRegistry::new();
        for provider in providers {
            registry.register(provider).unwrap();
        }
        registry.effective_allow_list(&commonmark(), None)
    };

    let forward = build(false);
    assert_eq!(forward, build(true));
    // equal weights: "b" sorts after "a" and wins
    assert!(!forward.is_attribute_allowed("div", "x", ""));
}

#[test]
fn test_weight_orders_providers() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(StaticProvider::new("zz-early", AllowList::new().allow("div", "x", true.into())).with_weight(-10))
        .unwrap();
    registry
        .register(StaticProvider::new("aa-late", AllowList::new().allow("div", "x", false.into())).with_weight(10))
        .unwrap();

    let ids: Vec<_> = registry.ordered().iter().map(|p| p.id().to_string()).collect();
    assert_eq!(ids, vec!["zz-early", "aa-late"]);

    let list = registry.effective_allow_list(&commonmark(), None);
    assert!(!list.is_attribute_allowed("div", "x", ""));
}

#[test]
fn test_duplicate_provider_leaves_registry_unchanged() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(StaticProvider::new("tables", AllowList::new().with_bare_tag("table")))
        .unwrap();

    let result = registry.register(StaticProvider::new("tables", AllowList::new().with_bare_tag("div")));
    assert!(matches!(result, Err(SieveError::DuplicateProvider(ref id)) if id == "tables"));

    assert_eq!(registry.len(), 1);
    let list = registry.effective_allow_list(&commonmark(), None);
    assert!(list.is_tag_allowed("table"));
    assert!(!list.is_tag_allowed("div"));
}

#[test]
fn test_failing_applicability_is_not_fatal() {
    let mut registry = ProviderRegistry::new();
    registry.register(BrokenProvider).unwrap();
    registry
        .register(StaticProvider::new("basic", AllowList::new().with_bare_tag("p")))
        .unwrap();

    let contributions = registry.contributions_for(&commonmark(), None);
    assert_eq!(contributions.len(), 1);
    assert!(registry.effective_allow_list(&commonmark(), None).is_tag_allowed("p"));
}

#[test]
fn test_parser_specific_provider_is_skipped() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(StaticProvider::new("tables", AllowList::new().with_bare_tag("table")).for_parsers(["extra"]))
        .unwrap();

    assert!(registry.contributions_for(&commonmark(), None).is_empty());
    assert_eq!(registry.contributions_for(&ParserId::from("extra"), None).len(), 1);
}

#[test]
fn test_empty_contributions_are_dropped() {
    let mut registry = ProviderRegistry::new();
    registry.register(StaticProvider::new("nothing", AllowList::new())).unwrap();
    assert!(registry.contributions_for(&commonmark(), None).is_empty());
}

#[test]
fn test_defaults_for_each_dialect() {
    let registry = ProviderRegistry::with_defaults();

    let commonmark_list = registry.effective_allow_list(&commonmark(), None);
    assert!(commonmark_list.is_tag_allowed("p"));
    assert!(commonmark_list.is_attribute_allowed("a", "href", "/x"));
    assert!(!commonmark_list.contains_tag("table"));
    assert!(commonmark_list.is_attribute_allowed("p", "data-align", "left"));

    let extra_list = registry.effective_allow_list(&ParserId::from("extra"), None);
    assert!(extra_list.contains_tag("table"));
    assert!(extra_list.is_attribute_allowed("td", "align", "center"));
    assert!(!extra_list.is_attribute_allowed("td", "align", "justify"));

    let unknown = registry.effective_allow_list(&ParserId::from("parsedown"), None);
    assert!(!unknown.contains_tag("p"));
}

#[test]
fn test_media_and_theme_overrides() {
    let mut registry = ProviderRegistry::new();
    registry
        .register(StaticProvider::new("align", AllowList::new().allow("*", "data-align", true.into())))
        .unwrap();
    registry.register(MediaEmbedProvider::new(true)).unwrap();
    registry
        .register(ThemeOverrideProvider::new(
            ThemeId::from("olivero"),
            AllowList::new()
                .allow("*", "data-align", AttributePermission::values(["left", "right"]))
                .allow("figure", "class", AttributePermission::values(["media"])),
        ))
        .unwrap();

    let plain = registry.effective_allow_list(&commonmark(), None);
    assert!(plain.is_attribute_allowed("span", "data-align", "center"));
    assert!(!plain.is_attribute_allowed("drupal-media", "data-align", "center"));
    assert!(plain.is_attribute_allowed("drupal-media", "data-entity-uuid", "abc"));
    assert!(!plain.contains_tag("figure"));

    let themed = registry.effective_allow_list(&commonmark(), Some(&ThemeId::from("olivero")));
    assert!(!themed.is_attribute_allowed("span", "data-align", "center"));
    assert!(themed.is_attribute_allowed("span", "data-align", "left"));
    assert!(themed.is_attribute_allowed("figure", "class", "media"));
    // media's explicit denial still beats the theme's wildcard
    assert!(!themed.is_attribute_allowed("drupal-media", "data-align", "left"));
}
