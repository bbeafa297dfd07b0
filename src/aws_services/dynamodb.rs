use std::collections::HashMap;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use aws_sdk_dynamodb as dynamodb;
use dynamodb::types::{
    AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
    PutRequest, ScalarAttributeType, TableStatus, WriteRequest,
};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{ProductDef, TableDef};

const PARTITION_KEY: &str = "category";
const SORT_KEY: &str = "sku";

/// BatchWriteItem accepts at most 25 put requests per call.
const BATCH_WRITE_LIMIT: usize = 25;

const WAIT_ATTEMPTS: usize = 60;
const WAIT_DELAY: Duration = Duration::from_secs(2);

/// DynamoDB operations: table lifecycle plus product item CRUD over a
/// (category, sku) composite key.
pub struct DynamoDbService {
    client: dynamodb::Client,
}

impl DynamoDbService {
    pub fn new(client: dynamodb::Client) -> Self {
        Self { client }
    }

    pub async fn for_region(region: Option<String>) -> Self {
        let config = super::sdk_config(region).await;
        Self::new(dynamodb::Client::new(&config))
    }

    /// Create a table from a parsed definition with fixed 5/5 provisioned
    /// throughput, then wait until it reports ACTIVE.
    pub async fn create_table(&self, def: &TableDef) -> Result<serde_json::Value> {
        let key_schema = def
            .pk
            .iter()
            .map(|key| {
                KeySchemaElement::builder()
                    .attribute_name(&key.attribute_name)
                    .key_type(KeyType::from(key.key_type.as_str()))
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let attribute_definitions = def
            .pkdef
            .iter()
            .map(|attr| {
                AttributeDefinition::builder()
                    .attribute_name(&attr.attribute_name)
                    .attribute_type(ScalarAttributeType::from(attr.attribute_type.as_str()))
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.client
            .create_table()
            .table_name(&def.table_name)
            .set_key_schema(Some(key_schema))
            .set_attribute_definitions(Some(attribute_definitions))
            .provisioned_throughput(
                ProvisionedThroughput::builder()
                    .read_capacity_units(5)
                    .write_capacity_units(5)
                    .build()?,
            )
            .send()
            .await
            .with_context(|| format!("Failed to create table {}", def.table_name))?;

        self.wait_until_table_active(&def.table_name).await
    }

    /// Describe a table and return its description as JSON.
    pub async fn get_table(&self, table_name: &str) -> Result<serde_json::Value> {
        let response = self
            .client
            .describe_table()
            .table_name(table_name)
            .send()
            .await
            .with_context(|| format!("Failed to describe table {}", table_name))?;

        match response.table {
            Some(table) => Ok(table_to_json(&table)),
            None => bail!("Table {} not found", table_name),
        }
    }

    /// Put a product item, then read it back and return the stored item.
    pub async fn create_product(
        &self,
        table_name: &str,
        product: &ProductDef,
    ) -> Result<serde_json::Value> {
        let item = product_item(product);
        self.client
            .put_item()
            .table_name(table_name)
            .set_item(Some(item))
            .send()
            .await
            .with_context(|| format!("Failed to put item into table {}", table_name))?;

        self.get_product(table_name, &product.category, &product.sku)
            .await
    }

    /// Update the non-key attributes of a product item with a generated
    /// SET expression, then read the item back.
    pub async fn update_product(
        &self,
        table_name: &str,
        product: &ProductDef,
    ) -> Result<serde_json::Value> {
        if product.attributes.is_empty() {
            bail!("Product definition has no attributes to update");
        }

        let (expression, names, values) = build_update_expression(&product.attributes);
        self.client
            .update_item()
            .table_name(table_name)
            .set_key(Some(product_key(&product.category, &product.sku)))
            .update_expression(expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .send()
            .await
            .with_context(|| format!("Failed to update item in table {}", table_name))?;

        self.get_product(table_name, &product.category, &product.sku)
            .await
    }

    /// Fetch one product by composite key.
    pub async fn get_product(
        &self,
        table_name: &str,
        category: &str,
        sku: &str,
    ) -> Result<serde_json::Value> {
        let response = self
            .client
            .get_item()
            .table_name(table_name)
            .set_key(Some(product_key(category, sku)))
            .send()
            .await
            .with_context(|| format!("Failed to get item from table {}", table_name))?;

        match response.item {
            Some(item) => Ok(item_to_json(&item)),
            None => bail!("Item ({}, {}) not found in table {}", category, sku, table_name),
        }
    }

    /// Generate `n_items` random sample products and batch-write them in
    /// chunks of 25. Returns the number of items written.
    pub async fn create_items(&self, table_name: &str, n_items: usize) -> Result<usize> {
        let items = random_items(n_items);

        for chunk in items.chunks(BATCH_WRITE_LIMIT) {
            let requests = chunk
                .iter()
                .map(|item| {
                    Ok(WriteRequest::builder()
                        .put_request(PutRequest::builder().set_item(Some(item.clone())).build()?)
                        .build())
                })
                .collect::<Result<Vec<_>>>()?;

            self.client
                .batch_write_item()
                .request_items(table_name, requests)
                .send()
                .await
                .with_context(|| format!("Failed to batch-write items into {}", table_name))?;
        }

        Ok(items.len())
    }

    /// Query products by partition key, with an optional sort-key clause
    /// and an optional filter expression. The sort-key clause is appended
    /// only when a sort-key value is supplied; the filter only when all
    /// three filter parts are present.
    pub async fn query_products(
        &self,
        table_name: &str,
        pk_value: &str,
        sort_key: Option<(&str, &str)>,
        filter: Option<(&str, &str, &str)>,
    ) -> Result<Vec<serde_json::Value>> {
        let (key_expression, mut values) = build_key_condition(pk_value, sort_key)?;

        let mut request = self
            .client
            .query()
            .table_name(table_name)
            .key_condition_expression(key_expression);

        if let Some((attr_name, condition, attr_value)) = filter {
            let (filter_expression, names, filter_values) =
                build_filter_expression(attr_name, condition, attr_value)?;
            values.extend(filter_values);
            request = request
                .filter_expression(filter_expression)
                .set_expression_attribute_names(Some(names));
        }

        let response = request
            .set_expression_attribute_values(Some(values))
            .send()
            .await
            .with_context(|| format!("Failed to query table {}", table_name))?;

        Ok(response
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_json)
            .collect())
    }

    /// Scan products with a filter expression.
    pub async fn scan_products(
        &self,
        table_name: &str,
        attr_name: &str,
        condition: &str,
        attr_value: &str,
    ) -> Result<Vec<serde_json::Value>> {
        let (expression, names, values) =
            build_filter_expression(attr_name, condition, attr_value)?;

        let response = self
            .client
            .scan()
            .table_name(table_name)
            .filter_expression(expression)
            .set_expression_attribute_names(Some(names))
            .set_expression_attribute_values(Some(values))
            .send()
            .await
            .with_context(|| format!("Failed to scan table {}", table_name))?;

        Ok(response
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_json)
            .collect())
    }

    /// Delete a table and wait until it no longer exists.
    pub async fn delete_table(&self, table_name: &str) -> Result<()> {
        self.client
            .delete_table()
            .table_name(table_name)
            .send()
            .await
            .with_context(|| format!("Failed to delete table {}", table_name))?;

        self.wait_until_table_gone(table_name).await
    }

    async fn wait_until_table_active(&self, table_name: &str) -> Result<serde_json::Value> {
        for _ in 0..WAIT_ATTEMPTS {
            match self
                .client
                .describe_table()
                .table_name(table_name)
                .send()
                .await
            {
                Ok(response) => {
                    if let Some(table) = response.table {
                        if matches!(table.table_status, Some(TableStatus::Active)) {
                            return Ok(table_to_json(&table));
                        }
                    }
                }
                Err(err) => {
                    let service_err = err.into_service_error();
                    // Not-found right after CreateTable just means the
                    // table is still materializing.
                    if !service_err.is_resource_not_found_exception() {
                        return Err(service_err.into());
                    }
                }
            }
            tokio::time::sleep(WAIT_DELAY).await;
        }

        bail!("Timed out waiting for table {} to become active", table_name)
    }

    async fn wait_until_table_gone(&self, table_name: &str) -> Result<()> {
        for _ in 0..WAIT_ATTEMPTS {
            match self
                .client
                .describe_table()
                .table_name(table_name)
                .send()
                .await
            {
                Ok(_) => tokio::time::sleep(WAIT_DELAY).await,
                Err(err) => {
                    let service_err = err.into_service_error();
                    if service_err.is_resource_not_found_exception() {
                        return Ok(());
                    }
                    return Err(service_err.into());
                }
            }
        }

        bail!("Timed out waiting for table {} to be deleted", table_name)
    }
}

/// Composite key map for a product.
pub fn product_key(category: &str, sku: &str) -> HashMap<String, AttributeValue> {
    HashMap::from([
        (
            PARTITION_KEY.to_string(),
            AttributeValue::S(category.to_string()),
        ),
        (SORT_KEY.to_string(), AttributeValue::S(sku.to_string())),
    ])
}

/// Full item map for a product: the composite key plus the free-form
/// attributes, with floats rounded to two decimals.
pub fn product_item(product: &ProductDef) -> HashMap<String, AttributeValue> {
    let mut item = product_key(&product.category, &product.sku);
    for (name, value) in &product.attributes {
        item.insert(name.clone(), json_to_attr(value));
    }
    item
}

/// Convert a JSON value to a DynamoDB attribute value. Floating-point
/// numbers are rounded to two decimal places (currency precision policy);
/// integers pass through unchanged.
pub fn json_to_attr(value: &serde_json::Value) -> AttributeValue {
    match value {
        serde_json::Value::Null => AttributeValue::Null(true),
        serde_json::Value::Bool(flag) => AttributeValue::Bool(*flag),
        serde_json::Value::Number(number) => AttributeValue::N(number_to_dynamo(number)),
        serde_json::Value::String(text) => AttributeValue::S(text.clone()),
        serde_json::Value::Array(items) => {
            AttributeValue::L(items.iter().map(json_to_attr).collect())
        }
        serde_json::Value::Object(map) => AttributeValue::M(
            map.iter()
                .map(|(key, value)| (key.clone(), json_to_attr(value)))
                .collect(),
        ),
    }
}

fn number_to_dynamo(number: &serde_json::Number) -> String {
    if number.is_i64() || number.is_u64() {
        number.to_string()
    } else {
        format!("{:.2}", number.as_f64().unwrap_or(0.0))
    }
}

/// Convert a DynamoDB attribute value back to JSON. Binary variants have
/// no JSON rendering here and come back as null.
pub fn attr_to_json(value: &AttributeValue) -> serde_json::Value {
    match value {
        AttributeValue::S(text) => serde_json::Value::String(text.clone()),
        AttributeValue::N(number) => number
            .parse::<serde_json::Number>()
            .map(serde_json::Value::Number)
            .unwrap_or_else(|_| serde_json::Value::String(number.clone())),
        AttributeValue::Bool(flag) => serde_json::Value::Bool(*flag),
        AttributeValue::Null(_) => serde_json::Value::Null,
        AttributeValue::L(items) => {
            serde_json::Value::Array(items.iter().map(attr_to_json).collect())
        }
        AttributeValue::M(map) => serde_json::Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), attr_to_json(value)))
                .collect(),
        ),
        AttributeValue::Ss(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|item| serde_json::Value::String(item.clone()))
                .collect(),
        ),
        AttributeValue::Ns(items) => serde_json::Value::Array(
            items
                .iter()
                .map(|number| {
                    number
                        .parse::<serde_json::Number>()
                        .map(serde_json::Value::Number)
                        .unwrap_or_else(|_| serde_json::Value::String(number.clone()))
                })
                .collect(),
        ),
        _ => serde_json::Value::Null,
    }
}

pub fn item_to_json(item: &HashMap<String, AttributeValue>) -> serde_json::Value {
    serde_json::Value::Object(
        item.iter()
            .map(|(key, value)| (key.clone(), attr_to_json(value)))
            .collect(),
    )
}

pub fn table_to_json(table: &dynamodb::types::TableDescription) -> serde_json::Value {
    let mut json = serde_json::Map::new();

    if let Some(table_name) = &table.table_name {
        json.insert(
            "TableName".to_string(),
            serde_json::Value::String(table_name.clone()),
        );
    }

    if let Some(table_arn) = &table.table_arn {
        json.insert(
            "TableArn".to_string(),
            serde_json::Value::String(table_arn.clone()),
        );
    }

    if let Some(table_status) = &table.table_status {
        json.insert(
            "TableStatus".to_string(),
            serde_json::Value::String(table_status.as_str().to_string()),
        );
    }

    if let Some(creation_date_time) = table.creation_date_time {
        json.insert(
            "CreationDateTime".to_string(),
            serde_json::Value::String(creation_date_time.to_string()),
        );
    }

    if let Some(item_count) = table.item_count {
        json.insert(
            "ItemCount".to_string(),
            serde_json::Value::Number(item_count.into()),
        );
    }

    if let Some(table_size_bytes) = table.table_size_bytes {
        json.insert(
            "TableSizeBytes".to_string(),
            serde_json::Value::Number(table_size_bytes.into()),
        );
    }

    if let Some(key_schema) = &table.key_schema {
        let keys_json: Vec<serde_json::Value> = key_schema
            .iter()
            .map(|key| {
                let mut key_json = serde_json::Map::new();
                key_json.insert(
                    "AttributeName".to_string(),
                    serde_json::Value::String(key.attribute_name.clone()),
                );
                key_json.insert(
                    "KeyType".to_string(),
                    serde_json::Value::String(key.key_type.as_str().to_string()),
                );
                serde_json::Value::Object(key_json)
            })
            .collect();
        json.insert("KeySchema".to_string(), serde_json::Value::Array(keys_json));
    }

    if let Some(attribute_definitions) = &table.attribute_definitions {
        let attrs_json: Vec<serde_json::Value> = attribute_definitions
            .iter()
            .map(|attr| {
                let mut attr_json = serde_json::Map::new();
                attr_json.insert(
                    "AttributeName".to_string(),
                    serde_json::Value::String(attr.attribute_name.clone()),
                );
                attr_json.insert(
                    "AttributeType".to_string(),
                    serde_json::Value::String(attr.attribute_type.as_str().to_string()),
                );
                serde_json::Value::Object(attr_json)
            })
            .collect();
        json.insert(
            "AttributeDefinitions".to_string(),
            serde_json::Value::Array(attrs_json),
        );
    }

    if let Some(throughput) = &table.provisioned_throughput {
        let mut throughput_json = serde_json::Map::new();
        if let Some(read) = throughput.read_capacity_units {
            throughput_json.insert(
                "ReadCapacityUnits".to_string(),
                serde_json::Value::Number(read.into()),
            );
        }
        if let Some(write) = throughput.write_capacity_units {
            throughput_json.insert(
                "WriteCapacityUnits".to_string(),
                serde_json::Value::Number(write.into()),
            );
        }
        if !throughput_json.is_empty() {
            json.insert(
                "ProvisionedThroughput".to_string(),
                serde_json::Value::Object(throughput_json),
            );
        }
    }

    serde_json::Value::Object(json)
}

fn comparator(condition: &str) -> Option<&'static str> {
    match condition {
        "eq" => Some("="),
        "le" => Some("<="),
        "lt" => Some("<"),
        "ge" => Some(">="),
        "gt" => Some(">"),
        _ => None,
    }
}

/// Split a `between` argument of the form `low,high`.
fn between_bounds(value: &str) -> Result<(&str, &str)> {
    match value.split_once(',') {
        Some((low, high)) if !low.is_empty() && !high.is_empty() => {
            Ok((low.trim(), high.trim()))
        }
        _ => bail!("A between condition needs a 'low,high' value, got '{}'", value),
    }
}

/// Build the key condition expression and its value map. The sort-key
/// clause on `sku` is appended only when a sort-key value was supplied.
pub fn build_key_condition(
    pk_value: &str,
    sort_key: Option<(&str, &str)>,
) -> Result<(String, HashMap<String, AttributeValue>)> {
    let mut expression = format!("{} = :pk", PARTITION_KEY);
    let mut values = HashMap::from([(
        ":pk".to_string(),
        AttributeValue::S(pk_value.to_string()),
    )]);

    if let Some((condition, sk_value)) = sort_key {
        match condition {
            "begins_with" => {
                expression.push_str(&format!(" AND begins_with({}, :sk)", SORT_KEY));
                values.insert(":sk".to_string(), AttributeValue::S(sk_value.to_string()));
            }
            "between" => {
                let (low, high) = between_bounds(sk_value)?;
                expression.push_str(&format!(" AND {} BETWEEN :sk_lo AND :sk_hi", SORT_KEY));
                values.insert(":sk_lo".to_string(), AttributeValue::S(low.to_string()));
                values.insert(":sk_hi".to_string(), AttributeValue::S(high.to_string()));
            }
            other => match comparator(other) {
                Some(op) => {
                    expression.push_str(&format!(" AND {} {} :sk", SORT_KEY, op));
                    values.insert(":sk".to_string(), AttributeValue::S(sk_value.to_string()));
                }
                None => bail!("Unsupported sort key condition '{}'", other),
            },
        }
    }

    Ok((expression, values))
}

/// Build a filter expression over one attribute. The attribute name goes
/// through an expression-attribute-name placeholder so reserved words work.
pub fn build_filter_expression(
    attr_name: &str,
    condition: &str,
    attr_value: &str,
) -> Result<(String, HashMap<String, String>, HashMap<String, AttributeValue>)> {
    let names = HashMap::from([("#f".to_string(), attr_name.to_string())]);
    let mut values = HashMap::new();

    let expression = match condition {
        "begins_with" => {
            values.insert(":f".to_string(), AttributeValue::S(attr_value.to_string()));
            "begins_with(#f, :f)".to_string()
        }
        "between" => {
            let (low, high) = between_bounds(attr_value)?;
            values.insert(":f_lo".to_string(), AttributeValue::S(low.to_string()));
            values.insert(":f_hi".to_string(), AttributeValue::S(high.to_string()));
            "#f BETWEEN :f_lo AND :f_hi".to_string()
        }
        other => match comparator(other) {
            Some(op) => {
                values.insert(":f".to_string(), AttributeValue::S(attr_value.to_string()));
                format!("#f {} :f", op)
            }
            None => bail!("Unsupported filter condition '{}'", other),
        },
    };

    Ok((expression, names, values))
}

/// Build the SET update expression over the non-key attributes, with the
/// same name-placeholder discipline and two-decimal float rounding.
pub fn build_update_expression(
    attributes: &serde_json::Map<String, serde_json::Value>,
) -> (String, HashMap<String, String>, HashMap<String, AttributeValue>) {
    let mut clauses = Vec::new();
    let mut names = HashMap::new();
    let mut values = HashMap::new();

    for (name, value) in attributes {
        clauses.push(format!("#{} = :{}", name, name));
        names.insert(format!("#{}", name), name.clone());
        values.insert(format!(":{}", name), json_to_attr(value));
    }

    (format!("SET {}", clauses.join(", ")), names, values)
}

/// Random sample products for seeding a table.
pub fn random_items(n_items: usize) -> Vec<HashMap<String, AttributeValue>> {
    let mut rng = rand::thread_rng();
    let sku_types = ["foo", "bar"];
    let categories = ["dress", "shorts", "sandals"];
    let prices = ["34.75", "49.75", "54.75"];

    (1..=n_items)
        .map(|id| {
            let sku_type = sku_types.choose(&mut rng).copied().unwrap_or("foo");
            let category = categories.choose(&mut rng).copied().unwrap_or("dress");
            let price = prices.choose(&mut rng).copied().unwrap_or("34.75");

            HashMap::from([
                (
                    PARTITION_KEY.to_string(),
                    AttributeValue::S(category.to_string()),
                ),
                (
                    SORT_KEY.to_string(),
                    AttributeValue::S(format!("{}-apparel-{}", sku_type, id)),
                ),
                (
                    "product_name".to_string(),
                    AttributeValue::S(format!("Apparel{}", id)),
                ),
                (
                    "is_published".to_string(),
                    AttributeValue::Bool(rng.gen::<bool>()),
                ),
                ("price".to_string(), AttributeValue::N(price.to_string())),
                (
                    "in_stock".to_string(),
                    AttributeValue::Bool(rng.gen::<bool>()),
                ),
            ])
        })
        .collect()
}
