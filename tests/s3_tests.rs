use aws_credential_types::Credentials;
use aws_sdk_s3 as s3;
use awsman::aws_services::{s3::create_tempfile, S3Service};
use pretty_assertions::assert_eq;

/// Client with static credentials pointed at an unroutable local endpoint,
/// so every request fails at dispatch without touching the network.
fn offline_client() -> s3::Client {
    let config = s3::config::Builder::new()
        .behavior_version(s3::config::BehaviorVersion::latest())
        .region(s3::config::Region::new("ap-southeast-1"))
        .credentials_provider(Credentials::from_keys("AKIDEXAMPLE", "secret", None))
        .endpoint_url("http://127.0.0.1:1")
        .retry_config(s3::config::retry::RetryConfig::disabled())
        .build();
    s3::Client::from_conf(config)
}

#[tokio::test]
async fn create_bucket_reports_provider_error_as_false() {
    let service = S3Service::new(offline_client());
    let created = service
        .create_bucket("awsman-test-bucket", "ap-southeast-1")
        .await
        .expect("provider errors must not propagate out of create_bucket");
    assert!(!created);
}

#[tokio::test]
async fn list_buckets_propagates_provider_errors() {
    let service = S3Service::new(offline_client());
    assert!(service.list_buckets().await.is_err());
}

#[test]
fn tempfile_defaults_to_zeroes_times_300() {
    let dir = tempfile::tempdir().expect("temp dir");
    let name = dir.path().join("filler").display().to_string();

    let path = create_tempfile(Some(&name), None, 300).expect("temp file");
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("txt"));

    let body = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(body.len(), 300);
    assert!(body.chars().all(|c| c == '0'));
}

#[test]
fn tempfile_repeats_custom_content() {
    let dir = tempfile::tempdir().expect("temp dir");
    let name = dir.path().join("custom").display().to_string();

    let path = create_tempfile(Some(&name), Some("ab"), 300).expect("temp file");
    let body = std::fs::read_to_string(&path).expect("read back");
    assert_eq!(body.len(), 600);
    assert!(body.starts_with("abab"));
}
