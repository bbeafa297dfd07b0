//! Thin wrappers around the per-service AWS SDK clients.
//!
//! Each service follows the same shape: a struct holding an SDK client,
//! async methods that issue exactly one API call each (with optional
//! parameters omitted when the caller did not supply them), and `*_to_json`
//! helpers that convert the relevant response substructure to
//! `serde_json::Value` for printing.

pub mod dynamodb;
pub mod logs;
pub mod s3;
pub mod sns;

pub use dynamodb::DynamoDbService;
pub use logs::LogsService;
pub use s3::S3Service;
pub use sns::SnsService;

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load the shared SDK configuration from the default provider chain,
/// overriding the region when one was supplied on the command line.
pub async fn sdk_config(region: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(Region::new(region));
    }
    loader.load().await
}
