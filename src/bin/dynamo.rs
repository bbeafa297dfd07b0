#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use anyhow::Result;
use awsman::aws_services::DynamoDbService;
use awsman::config::{parse_productdef, parse_tabledef};
use clap::{Parser, Subcommand};

/// DynamoDB manager
#[derive(Parser, Debug)]
#[command(name = "dynamo", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a DynamoDB table
    CreateDynamoTable {
        /// Table definition file (JSON)
        tabledef: PathBuf,
    },
    /// Get a DynamoDB table
    GetDynamoTable {
        /// Name of DynamoDB table to get
        table_name: String,
    },
    /// Create a product in a DynamoDB table
    CreateProduct {
        /// DynamoDB table where to create product
        table_name: String,
        /// Product definition file (JSON)
        productdef: PathBuf,
    },
    /// Update a product in a DynamoDB table
    UpdateProduct {
        /// DynamoDB table where to update product
        table_name: String,
        /// Product definition file (JSON)
        productdef: PathBuf,
    },
    /// Create multiple random items in a DynamoDB table
    CreateDynamoItems {
        /// DynamoDB table where to create items
        table_name: String,
        /// Number of random items to create
        n_items: usize,
    },
    /// Query items in a DynamoDB table using a key filter and, possibly,
    /// a filter expression
    QueryProducts {
        /// DynamoDB table where to query items
        table_name: String,
        /// Partition key value for the key filter
        pk_value: String,
        /// Sort key value for the key filter
        #[arg(long)]
        sk_value: Option<String>,
        /// Sort key condition: eq, le, lt, ge, gt, between, begins_with
        #[arg(long, default_value = "begins_with")]
        sk_condition: String,
        /// Attribute name for the filter expression
        #[arg(long)]
        attr_name: Option<String>,
        /// Attribute condition for the filter expression
        #[arg(long, default_value = "begins_with")]
        attr_condition: String,
        /// Attribute value for the filter expression
        #[arg(long)]
        attr_value: Option<String>,
    },
    /// Scan items in a DynamoDB table using a filter expression
    ScanProducts {
        /// DynamoDB table where to scan for items
        table_name: String,
        /// Attribute name for the filter expression
        attr_name: String,
        /// Attribute condition: eq, le, lt, ge, gt, between, begins_with
        attr_condition: String,
        /// Attribute value for the filter expression
        attr_value: String,
    },
    /// Delete a DynamoDB table
    DeleteDynamoTable {
        /// Name of DynamoDB table to delete
        table_name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    awsman::telemetry::init_tracing();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        eprintln!("Invalid/Missing command.");
        std::process::exit(1);
    };

    let service = DynamoDbService::for_region(None).await;

    match command {
        Command::CreateDynamoTable { tabledef } => {
            let def = parse_tabledef(&tabledef)?;
            let table = service.create_table(&def).await?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        Command::GetDynamoTable { table_name } => {
            let table = service.get_table(&table_name).await?;
            println!("{}", serde_json::to_string_pretty(&table)?);
        }
        Command::CreateProduct {
            table_name,
            productdef,
        } => {
            let product = parse_productdef(&productdef)?;
            let item = service.create_product(&table_name, &product).await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        Command::UpdateProduct {
            table_name,
            productdef,
        } => {
            let product = parse_productdef(&productdef)?;
            let item = service.update_product(&table_name, &product).await?;
            println!("{}", serde_json::to_string_pretty(&item)?);
        }
        Command::CreateDynamoItems {
            table_name,
            n_items,
        } => {
            let count = service.create_items(&table_name, n_items).await?;
            println!("Wrote {} items", count);
        }
        Command::QueryProducts {
            table_name,
            pk_value,
            sk_value,
            sk_condition,
            attr_name,
            attr_condition,
            attr_value,
        } => {
            let sort_key = sk_value
                .as_deref()
                .map(|value| (sk_condition.as_str(), value));
            // The filter applies only when both name and value are present.
            let filter = match (attr_name.as_deref(), attr_value.as_deref()) {
                (Some(name), Some(value)) => Some((name, attr_condition.as_str(), value)),
                _ => None,
            };
            let items = service
                .query_products(&table_name, &pk_value, sort_key, filter)
                .await?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Command::ScanProducts {
            table_name,
            attr_name,
            attr_condition,
            attr_value,
        } => {
            let items = service
                .scan_products(&table_name, &attr_name, &attr_condition, &attr_value)
                .await?;
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        Command::DeleteDynamoTable { table_name } => {
            service.delete_table(&table_name).await?;
        }
    }

    println!("Done");
    Ok(())
}
