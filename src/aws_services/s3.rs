use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use aws_sdk_s3 as s3;
use s3::error::DisplayErrorContext;
use s3::primitives::ByteStream;
use s3::types::{
    BucketLocationConstraint, BucketVersioningStatus, CreateBucketConfiguration, Delete,
    ObjectIdentifier, VersioningConfiguration,
};

/// DeleteObjects accepts at most 1000 object identifiers per call.
const DELETE_BATCH_LIMIT: usize = 1000;

const WAIT_ATTEMPTS: usize = 60;
const WAIT_DELAY: std::time::Duration = std::time::Duration::from_secs(2);

/// S3 operations: bucket lifecycle, object upload/download, versioning,
/// and versioned bulk deletion.
pub struct S3Service {
    client: s3::Client,
}

impl S3Service {
    pub fn new(client: s3::Client) -> Self {
        Self { client }
    }

    pub async fn for_region(region: Option<String>) -> Self {
        let config = super::sdk_config(region).await;
        Self::new(s3::Client::new(&config))
    }

    /// Create a bucket in the given region. A provider error is logged and
    /// reported as `false` rather than propagated; this is the one
    /// non-propagating error path in the repo.
    pub async fn create_bucket(&self, name: &str, region: &str) -> Result<bool> {
        let configuration = CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build();

        match self
            .client
            .create_bucket()
            .bucket(name)
            .create_bucket_configuration(configuration)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                tracing::error!(
                    "{} - bucket {} region {}",
                    DisplayErrorContext(&err),
                    name,
                    region
                );
                Ok(false)
            }
        }
    }

    /// List all buckets as `{Name, CreationDate}` JSON objects.
    pub async fn list_buckets(&self) -> Result<Vec<serde_json::Value>> {
        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .context("Failed to list buckets")?;

        let mut buckets = Vec::new();
        if let Some(bucket_list) = response.buckets {
            for bucket in bucket_list {
                let mut json = serde_json::Map::new();
                if let Some(name) = &bucket.name {
                    json.insert(
                        "Name".to_string(),
                        serde_json::Value::String(name.clone()),
                    );
                }
                if let Some(creation_date) = bucket.creation_date {
                    json.insert(
                        "CreationDate".to_string(),
                        serde_json::Value::String(creation_date.to_string()),
                    );
                }
                buckets.push(serde_json::Value::Object(json));
            }
        }

        Ok(buckets)
    }

    /// Get a bucket by name, optionally creating it when absent. Returns
    /// `None` when the bucket does not exist and `create` was not set (a
    /// warning is logged), or when creation itself failed.
    pub async fn get_bucket(
        &self,
        name: &str,
        create: bool,
        region: &str,
    ) -> Result<Option<serde_json::Value>> {
        if let Some(bucket) = self.find_bucket(name).await? {
            return Ok(Some(bucket));
        }

        if create {
            if !self.create_bucket(name, region).await? {
                return Ok(None);
            }
            return self.find_bucket(name).await;
        }

        tracing::warn!("Bucket {} does not exist!", name);
        Ok(None)
    }

    async fn find_bucket(&self, name: &str) -> Result<Option<serde_json::Value>> {
        let buckets = self.list_buckets().await?;
        Ok(buckets
            .into_iter()
            .find(|bucket| bucket.get("Name").and_then(|v| v.as_str()) == Some(name)))
    }

    /// Upload a local file under `{key_prefix}{file_path}`.
    pub async fn create_bucket_object(
        &self,
        bucket_name: &str,
        file_path: &str,
        key_prefix: Option<&str>,
    ) -> Result<serde_json::Value> {
        let key = format!("{}{}", key_prefix.unwrap_or(""), file_path);
        let body = ByteStream::from_path(Path::new(file_path))
            .await
            .with_context(|| format!("Failed to read {}", file_path))?;

        self.client
            .put_object()
            .bucket(bucket_name)
            .key(&key)
            .body(body)
            .send()
            .await
            .with_context(|| format!("Failed to upload {} to bucket {}", file_path, bucket_name))?;

        Ok(serde_json::json!({
            "Bucket": bucket_name,
            "Key": key,
        }))
    }

    /// Download an object (optionally a specific version) into `dest`,
    /// keeping the file name portion of the key. Returns the local path.
    pub async fn get_bucket_object(
        &self,
        bucket_name: &str,
        object_key: &str,
        dest: Option<&str>,
        version_id: Option<&str>,
    ) -> Result<PathBuf> {
        let file_name = Path::new(object_key)
            .file_name()
            .with_context(|| format!("Object key {} has no file name", object_key))?;
        let file_path = Path::new(dest.unwrap_or("")).join(file_name);

        let response = self
            .client
            .get_object()
            .bucket(bucket_name)
            .key(object_key)
            .set_version_id(version_id.map(String::from))
            .send()
            .await
            .with_context(|| {
                format!("Failed to get object {} from bucket {}", object_key, bucket_name)
            })?;

        let body = response
            .body
            .collect()
            .await
            .with_context(|| format!("Failed to read body of object {}", object_key))?
            .into_bytes();
        std::fs::write(&file_path, &body)
            .with_context(|| format!("Failed to write {}", file_path.display()))?;

        Ok(file_path)
    }

    /// Turn on bucket versioning and return the resulting status string.
    pub async fn enable_bucket_versioning(&self, bucket_name: &str) -> Result<String> {
        self.client
            .put_bucket_versioning()
            .bucket(bucket_name)
            .versioning_configuration(
                VersioningConfiguration::builder()
                    .status(BucketVersioningStatus::Enabled)
                    .build(),
            )
            .send()
            .await
            .with_context(|| format!("Failed to enable versioning on bucket {}", bucket_name))?;

        let response = self
            .client
            .get_bucket_versioning()
            .bucket(bucket_name)
            .send()
            .await
            .with_context(|| format!("Failed to get versioning of bucket {}", bucket_name))?;

        Ok(response
            .status
            .map(|status| status.as_str().to_string())
            .unwrap_or_default())
    }

    /// Delete every object in the bucket, all versions and delete markers
    /// included, optionally restricted to a key prefix. Returns the number
    /// of targets deleted.
    pub async fn delete_bucket_objects(
        &self,
        bucket_name: &str,
        key_prefix: Option<&str>,
    ) -> Result<usize> {
        let mut targets = Vec::new();
        let mut key_marker: Option<String> = None;
        let mut version_marker: Option<String> = None;

        loop {
            let response = self
                .client
                .list_object_versions()
                .bucket(bucket_name)
                .set_prefix(key_prefix.map(String::from))
                .set_key_marker(key_marker.take())
                .set_version_id_marker(version_marker.take())
                .send()
                .await
                .with_context(|| {
                    format!("Failed to list object versions of bucket {}", bucket_name)
                })?;

            for version in response.versions() {
                targets.push(
                    ObjectIdentifier::builder()
                        .key(version.key().unwrap_or_default())
                        .set_version_id(version.version_id().map(String::from))
                        .build()?,
                );
            }
            // Delete markers are separate entries; leaving them behind
            // keeps the bucket non-empty.
            for marker in response.delete_markers() {
                targets.push(
                    ObjectIdentifier::builder()
                        .key(marker.key().unwrap_or_default())
                        .set_version_id(marker.version_id().map(String::from))
                        .build()?,
                );
            }

            if response.is_truncated().unwrap_or(false) {
                key_marker = response.next_key_marker().map(String::from);
                version_marker = response.next_version_id_marker().map(String::from);
            } else {
                break;
            }
        }

        for chunk in targets.chunks(DELETE_BATCH_LIMIT) {
            self.client
                .delete_objects()
                .bucket(bucket_name)
                .delete(
                    Delete::builder()
                        .set_objects(Some(chunk.to_vec()))
                        .quiet(true)
                        .build()?,
                )
                .send()
                .await
                .with_context(|| format!("Failed to delete objects in bucket {}", bucket_name))?;
        }

        Ok(targets.len())
    }

    /// Delete one bucket by name, or every bucket when no name is given.
    /// In the delete-everything case a per-bucket provider error is logged
    /// and skipped. Returns the number of buckets deleted.
    pub async fn delete_buckets(&self, name: Option<&str>) -> Result<usize> {
        let mut count = 0;

        match name {
            Some(name) => {
                if self.find_bucket(name).await?.is_none() {
                    tracing::warn!("Bucket {} does not exist!", name);
                    return Ok(0);
                }
                self.client
                    .delete_bucket()
                    .bucket(name)
                    .send()
                    .await
                    .with_context(|| format!("Failed to delete bucket {}", name))?;
                self.wait_until_bucket_gone(name).await?;
                count += 1;
            }
            None => {
                let buckets = self.list_buckets().await?;
                for bucket in buckets {
                    let Some(bucket_name) = bucket.get("Name").and_then(|v| v.as_str()) else {
                        continue;
                    };
                    match self.client.delete_bucket().bucket(bucket_name).send().await {
                        Ok(_) => {
                            self.wait_until_bucket_gone(bucket_name).await?;
                            count += 1;
                        }
                        Err(err) => {
                            tracing::warn!(
                                "Bucket {}: {}",
                                bucket_name,
                                DisplayErrorContext(&err)
                            );
                        }
                    }
                }
            }
        }

        Ok(count)
    }

    async fn wait_until_bucket_gone(&self, name: &str) -> Result<()> {
        for _ in 0..WAIT_ATTEMPTS {
            match self.client.head_bucket().bucket(name).send().await {
                Ok(_) => tokio::time::sleep(WAIT_DELAY).await,
                Err(err) => {
                    let service_err = err.into_service_error();
                    if service_err.is_not_found() {
                        return Ok(());
                    }
                    return Err(service_err.into());
                }
            }
        }

        bail!("Timed out waiting for bucket {} to be deleted", name)
    }
}

/// Create a text file in the working directory, named after `file_name`
/// (or a random UUID hex) with `content` (or `"0"`) repeated `size` times.
/// Returns the path of the created file.
pub fn create_tempfile(
    file_name: Option<&str>,
    content: Option<&str>,
    size: usize,
) -> Result<PathBuf> {
    let name = match file_name {
        Some(name) => name.to_string(),
        None => uuid::Uuid::new_v4().simple().to_string(),
    };
    let path = PathBuf::from(format!("{}.txt", name));
    let body = content.unwrap_or("0").repeat(size);
    std::fs::write(&path, body)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}
