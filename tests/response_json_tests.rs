use aws_sdk_cloudwatchlogs as logs;
use aws_sdk_sns as sns;
use awsman::aws_services::logs::{log_event_to_json, log_group_to_json, log_stream_to_json};
use awsman::aws_services::sns::{subscription_to_json, topic_to_json};
use pretty_assertions::assert_eq;

#[test]
fn log_group_json_carries_the_documented_fields() {
    let log_group = logs::types::LogGroup::builder()
        .log_group_name("/aws/lambda/orders")
        .creation_time(1_700_000_000_000_i64)
        .retention_in_days(14)
        .arn("arn:aws:logs:ap-southeast-1:123456789012:log-group:/aws/lambda/orders")
        .stored_bytes(2048)
        .build();

    let json = log_group_to_json(&log_group);
    assert_eq!(json["LogGroupName"], serde_json::json!("/aws/lambda/orders"));
    assert_eq!(json["CreationTime"], serde_json::json!(1_700_000_000_000_i64));
    assert_eq!(json["RetentionInDays"], serde_json::json!(14));
    assert_eq!(json["StoredBytes"], serde_json::json!(2048));
    // Absent optionals are omitted, never rendered as null.
    assert!(json.get("KmsKeyId").is_none());
}

#[test]
fn log_stream_json_carries_timestamps() {
    let log_stream = logs::types::LogStream::builder()
        .log_stream_name("2026/08/26/[$LATEST]abc")
        .creation_time(1_700_000_000_000_i64)
        .first_event_timestamp(1_700_000_001_000_i64)
        .last_event_timestamp(1_700_000_002_000_i64)
        .build();

    let json = log_stream_to_json(&log_stream);
    assert_eq!(
        json["LogStreamName"],
        serde_json::json!("2026/08/26/[$LATEST]abc")
    );
    assert_eq!(
        json["FirstEventTimestamp"],
        serde_json::json!(1_700_000_001_000_i64)
    );
    assert_eq!(
        json["LastEventTimestamp"],
        serde_json::json!(1_700_000_002_000_i64)
    );
    assert!(json.get("LastIngestionTime").is_none());
}

#[test]
fn log_event_json_carries_message_and_stream() {
    let event = logs::types::FilteredLogEvent::builder()
        .log_stream_name("2026/08/26/[$LATEST]abc")
        .timestamp(1_700_000_001_500_i64)
        .message("ERROR something broke")
        .event_id("37313337")
        .build();

    let json = log_event_to_json(&event);
    assert_eq!(json["Message"], serde_json::json!("ERROR something broke"));
    assert_eq!(json["Timestamp"], serde_json::json!(1_700_000_001_500_i64));
    assert_eq!(json["EventId"], serde_json::json!("37313337"));
}

#[test]
fn topic_json_derives_name_from_arn_tail() {
    let topic = sns::types::Topic::builder()
        .topic_arn("arn:aws:sns:ap-southeast-1:123456789012:orders")
        .build();

    let json = topic_to_json(&topic);
    assert_eq!(
        json["TopicArn"],
        serde_json::json!("arn:aws:sns:ap-southeast-1:123456789012:orders")
    );
    assert_eq!(json["Name"], serde_json::json!("orders"));
}

#[test]
fn subscription_json_carries_endpoint_and_protocol() {
    let subscription = sns::types::Subscription::builder()
        .subscription_arn("arn:aws:sns:ap-southeast-1:123456789012:orders:deadbeef")
        .owner("123456789012")
        .protocol("sms")
        .endpoint("+6512345678")
        .topic_arn("arn:aws:sns:ap-southeast-1:123456789012:orders")
        .build();

    let json = subscription_to_json(&subscription);
    assert_eq!(json["Protocol"], serde_json::json!("sms"));
    assert_eq!(json["Endpoint"], serde_json::json!("+6512345678"));
    assert_eq!(
        json["TopicArn"],
        serde_json::json!("arn:aws:sns:ap-southeast-1:123456789012:orders")
    );
}
