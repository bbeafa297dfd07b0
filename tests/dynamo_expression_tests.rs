use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use awsman::aws_services::dynamodb::{
    attr_to_json, build_filter_expression, build_key_condition, build_update_expression,
    item_to_json, json_to_attr, product_item, random_items,
};
use awsman::config::ProductDef;
use pretty_assertions::assert_eq;

#[test]
fn floats_round_to_two_decimals() {
    assert_eq!(
        json_to_attr(&serde_json::json!(34.756)),
        AttributeValue::N("34.76".to_string())
    );
    assert_eq!(
        json_to_attr(&serde_json::json!(49.7)),
        AttributeValue::N("49.70".to_string())
    );
}

#[test]
fn integers_pass_through_unchanged() {
    assert_eq!(
        json_to_attr(&serde_json::json!(42)),
        AttributeValue::N("42".to_string())
    );
    assert_eq!(
        json_to_attr(&serde_json::json!(-7)),
        AttributeValue::N("-7".to_string())
    );
}

#[test]
fn product_item_carries_key_and_rounded_attributes() {
    let product: ProductDef = serde_json::from_value(serde_json::json!({
        "category": "dress",
        "sku": "foo-apparel-1",
        "price": 34.756,
        "in_stock": true
    }))
    .expect("valid product");

    let item = product_item(&product);
    assert_eq!(
        item.get("category"),
        Some(&AttributeValue::S("dress".to_string()))
    );
    assert_eq!(
        item.get("sku"),
        Some(&AttributeValue::S("foo-apparel-1".to_string()))
    );
    assert_eq!(
        item.get("price"),
        Some(&AttributeValue::N("34.76".to_string()))
    );
    assert_eq!(item.get("in_stock"), Some(&AttributeValue::Bool(true)));
}

#[test]
fn key_condition_without_sort_key_has_single_clause() {
    let (expression, values) = build_key_condition("dress", None).expect("valid condition");
    assert_eq!(expression, "category = :pk");
    assert_eq!(values.len(), 1);
    assert_eq!(
        values.get(":pk"),
        Some(&AttributeValue::S("dress".to_string()))
    );
}

#[test]
fn key_condition_appends_sort_key_clause_only_when_supplied() {
    let (expression, values) =
        build_key_condition("dress", Some(("begins_with", "foo"))).expect("valid condition");
    assert_eq!(expression, "category = :pk AND begins_with(sku, :sk)");
    assert_eq!(
        values.get(":sk"),
        Some(&AttributeValue::S("foo".to_string()))
    );

    let (expression, _) = build_key_condition("dress", Some(("ge", "foo"))).expect("valid");
    assert_eq!(expression, "category = :pk AND sku >= :sk");
}

#[test]
fn key_condition_between_takes_two_bounds() {
    let (expression, values) =
        build_key_condition("dress", Some(("between", "bar-apparel-1,foo-apparel-9")))
            .expect("valid condition");
    assert_eq!(expression, "category = :pk AND sku BETWEEN :sk_lo AND :sk_hi");
    assert_eq!(
        values.get(":sk_lo"),
        Some(&AttributeValue::S("bar-apparel-1".to_string()))
    );
    assert_eq!(
        values.get(":sk_hi"),
        Some(&AttributeValue::S("foo-apparel-9".to_string()))
    );
}

#[test]
fn key_condition_rejects_unknown_condition_and_bad_between() {
    assert!(build_key_condition("dress", Some(("like", "foo"))).is_err());
    assert!(build_key_condition("dress", Some(("between", "only-one-bound"))).is_err());
}

#[test]
fn filter_expression_uses_name_placeholder() {
    let (expression, names, values) =
        build_filter_expression("product_name", "eq", "Apparel1").expect("valid filter");
    assert_eq!(expression, "#f = :f");
    assert_eq!(names.get("#f"), Some(&"product_name".to_string()));
    assert_eq!(
        values.get(":f"),
        Some(&AttributeValue::S("Apparel1".to_string()))
    );

    let (expression, _, _) =
        build_filter_expression("product_name", "begins_with", "Apparel").expect("valid filter");
    assert_eq!(expression, "begins_with(#f, :f)");
}

#[test]
fn update_expression_covers_every_attribute() {
    let attributes = serde_json::json!({
        "a": 1,
        "b": 2.5
    });
    let serde_json::Value::Object(attributes) = attributes else {
        unreachable!();
    };

    let (expression, names, values) = build_update_expression(&attributes);
    assert_eq!(expression, "SET #a = :a, #b = :b");
    assert_eq!(names.get("#a"), Some(&"a".to_string()));
    assert_eq!(names.get("#b"), Some(&"b".to_string()));
    assert_eq!(values.get(":a"), Some(&AttributeValue::N("1".to_string())));
    assert_eq!(
        values.get(":b"),
        Some(&AttributeValue::N("2.50".to_string()))
    );
}

#[test]
fn item_json_conversion_round_trips_plain_values() {
    let item = HashMap::from([
        (
            "sku".to_string(),
            AttributeValue::S("foo-apparel-1".to_string()),
        ),
        ("price".to_string(), AttributeValue::N("34.75".to_string())),
        ("in_stock".to_string(), AttributeValue::Bool(false)),
    ]);

    let json = item_to_json(&item);
    assert_eq!(json["sku"], serde_json::json!("foo-apparel-1"));
    assert_eq!(json["price"], serde_json::json!(34.75));
    assert_eq!(json["in_stock"], serde_json::json!(false));
}

#[test]
fn attr_json_handles_nested_and_set_values() {
    let value = AttributeValue::M(HashMap::from([(
        "tags".to_string(),
        AttributeValue::Ss(vec!["summer".to_string(), "sale".to_string()]),
    )]));

    assert_eq!(
        attr_to_json(&value),
        serde_json::json!({"tags": ["summer", "sale"]})
    );
}

#[test]
fn random_items_follow_the_sample_shape() {
    let items = random_items(10);
    assert_eq!(items.len(), 10);

    for (index, item) in items.iter().enumerate() {
        let Some(AttributeValue::S(sku)) = item.get("sku") else {
            panic!("missing sku");
        };
        assert!(sku.ends_with(&format!("-apparel-{}", index + 1)), "{}", sku);
        assert!(sku.starts_with("foo-") || sku.starts_with("bar-"), "{}", sku);

        let Some(AttributeValue::S(category)) = item.get("category") else {
            panic!("missing category");
        };
        assert!(["dress", "shorts", "sandals"].contains(&category.as_str()));

        let Some(AttributeValue::N(price)) = item.get("price") else {
            panic!("missing price");
        };
        assert!(["34.75", "49.75", "54.75"].contains(&price.as_str()));
    }
}
