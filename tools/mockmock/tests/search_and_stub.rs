use mockmock::classify::TypeTag;
use mockmock::errors::MockmockError;
use mockmock::matcher::{Matcher, StubMatcher};
use mockmock::runtime::ProductionFileSystem;
use mockmock::store::{MockStore, StoreSettings};
use mockmock::types::MockKind;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

fn loaded(context: &str) -> MockStore {
    let mut store = MockStore::new(
        Arc::new(ProductionFileSystem),
        StoreSettings {
            fixture_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures"),
            ..StoreSettings::default()
        },
    );
    store.load("test-data", Some(context)).expect("load");
    store
}

#[test]
fn nested_session_and_count_terms_find_the_cart() {
    let store = loaded("contextOne");
    let terms = [
        Matcher::keys(["sessionId"]).with_values(["xxx"]),
        Matcher::keys(["count"]).with_values([123]),
    ];
    let hit = store.search_hit(&terms, None, None).expect("hit");
    assert_eq!((hit.context, hit.kind, hit.id, hit.index), ("contextOne", MockKind::Data, "cart", 0));
    assert_eq!(hit.mock.to_value()["payload"]["cart"]["sessionId"], json!("xxx"));
}

#[test]
fn search_scope_defaults_to_current_context() {
    let store = loaded("contextTwo");
    let terms = [Matcher::keys(["sessionId"]).with_values(["xxx"])];
    let err = store.search(&terms, None, None).expect_err("other context");
    assert!(matches!(err, MockmockError::NotFound(_)));

    let scope = ["contextTwo".to_string(), "contextOne".to_string()];
    let found = store.search(&terms, None, Some(&scope)).expect("explicit scope");
    assert_eq!(found.to_value()["payload"]["cart"]["count"], json!(123));

    let express = [Matcher::keys(["x-powered-by"]).with_values(["Express"])];
    assert!(store.search(&express, Some(&[MockKind::Data]), None).is_ok());
    assert!(store.search(&express, Some(&[MockKind::Sync, MockKind::Async]), None).is_err());
}

#[test]
fn one_leaf_cannot_satisfy_two_terms() {
    let store = loaded("contextTwo");
    let terms = [
        Matcher::values(["updateCart"]),
        Matcher::keys(["method"]).with_types([TypeTag::String]),
    ];
    assert!(matches!(store.search(&terms, None, None), Err(MockmockError::NotFound(_))));
    assert!(store.search(&terms[..1], None, None).is_ok());
}

#[test]
fn display_values_are_redacted_everywhere() {
    let store = loaded("contextOne");
    let text = std::fs::read_to_string(
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/page.json"),
    )
    .expect("page");
    let page: serde_json::Value = serde_json::from_str(&text).expect("json");
    let matchers = [StubMatcher::new("REDACTED", Matcher::keys(["displayValue"]))];

    let stubbed = store.stub(&matchers, &page).expect("stub");
    assert_eq!(
        stubbed,
        json!({
            "a": {"displayValue": "REDACTED"},
            "b": [{"displayValue": "REDACTED"}],
            "title": "Cart"
        })
    );
    assert_eq!(store.stub(&matchers, &stubbed).expect("again"), stubbed);
}
