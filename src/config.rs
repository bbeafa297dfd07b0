//! JSON definition files consumed by the `dynamo` binary.
//!
//! Two formats exist: a table definition (exactly the keys `table_name`,
//! `pk`, `pkdef`) and a product definition (`category` and `sku` plus
//! arbitrary free-form attributes). A table definition whose key set
//! differs from the required set is a configuration error and aborts the
//! invocation.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// One element of the table key schema, e.g.
/// `{"AttributeName": "category", "KeyType": "HASH"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct KeySchemaDef {
    #[serde(rename = "AttributeName")]
    pub attribute_name: String,
    #[serde(rename = "KeyType")]
    pub key_type: String,
}

/// One attribute definition, e.g.
/// `{"AttributeName": "category", "AttributeType": "S"}`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeDef {
    #[serde(rename = "AttributeName")]
    pub attribute_name: String,
    #[serde(rename = "AttributeType")]
    pub attribute_type: String,
}

/// Table definition file. The key set must be exactly
/// `{table_name, pk, pkdef}`; unknown keys are rejected.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDef {
    pub table_name: String,
    pub pk: Vec<KeySchemaDef>,
    pub pkdef: Vec<AttributeDef>,
}

/// Product definition file: the composite key plus free-form attributes.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductDef {
    pub category: String,
    pub sku: String,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

/// Parse a table definition file, rejecting files whose key set is not
/// exactly the required one.
pub fn parse_tabledef(path: &Path) -> Result<TableDef> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read table definition {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid table definition in {}", path.display()))
}

/// Parse a product definition file (`category` and `sku` required).
pub fn parse_productdef(path: &Path) -> Result<ProductDef> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read product definition {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Invalid product definition in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write");
        file
    }

    #[test]
    fn tabledef_accepts_exact_key_set() {
        let file = write_temp(
            r#"{
                "table_name": "products",
                "pk": [
                    {"AttributeName": "category", "KeyType": "HASH"},
                    {"AttributeName": "sku", "KeyType": "RANGE"}
                ],
                "pkdef": [
                    {"AttributeName": "category", "AttributeType": "S"},
                    {"AttributeName": "sku", "AttributeType": "S"}
                ]
            }"#,
        );

        let def = parse_tabledef(file.path()).expect("valid definition");
        assert_eq!(def.table_name, "products");
        assert_eq!(def.pk.len(), 2);
        assert_eq!(def.pk[0].key_type, "HASH");
        assert_eq!(def.pkdef[1].attribute_type, "S");
    }

    #[test]
    fn tabledef_rejects_extra_keys() {
        let file = write_temp(
            r#"{
                "table_name": "products",
                "pk": [],
                "pkdef": [],
                "billing_mode": "PAY_PER_REQUEST"
            }"#,
        );

        assert!(parse_tabledef(file.path()).is_err());
    }

    #[test]
    fn tabledef_rejects_missing_keys() {
        let file = write_temp(r#"{"table_name": "products", "pk": []}"#);
        assert!(parse_tabledef(file.path()).is_err());
    }

    #[test]
    fn productdef_requires_category_and_sku() {
        let file = write_temp(r#"{"sku": "foo-apparel-1", "price": 34.75}"#);
        assert!(parse_productdef(file.path()).is_err());
    }

    #[test]
    fn productdef_carries_free_form_attributes() {
        let file = write_temp(
            r#"{
                "category": "dress",
                "sku": "foo-apparel-1",
                "product_name": "Apparel1",
                "price": 34.75,
                "in_stock": true
            }"#,
        );

        let def = parse_productdef(file.path()).expect("valid definition");
        assert_eq!(def.category, "dress");
        assert_eq!(def.sku, "foo-apparel-1");
        assert_eq!(def.attributes.len(), 3);
        assert_eq!(
            def.attributes.get("product_name"),
            Some(&serde_json::Value::String("Apparel1".to_string()))
        );
    }
}
