use anyhow::{Context, Result};
use aws_sdk_cloudwatchlogs as logs;

/// CloudWatch Logs operations: list log groups and streams, filter events.
pub struct LogsService {
    client: logs::Client,
}

impl LogsService {
    pub fn new(client: logs::Client) -> Self {
        Self { client }
    }

    pub async fn for_region(region: Option<String>) -> Self {
        let config = super::sdk_config(region).await;
        Self::new(logs::Client::new(&config))
    }

    /// List log groups, optionally restricted to a name prefix.
    pub async fn list_log_groups(&self, group_name: Option<&str>) -> Result<Vec<serde_json::Value>> {
        let response = self
            .client
            .describe_log_groups()
            .set_log_group_name_prefix(group_name.map(String::from))
            .send()
            .await
            .context("Failed to describe log groups")?;

        let mut log_groups = Vec::new();
        if let Some(log_group_list) = response.log_groups {
            for log_group in log_group_list {
                log_groups.push(log_group_to_json(&log_group));
            }
        }

        Ok(log_groups)
    }

    /// List the streams of a log group, optionally restricted to a stream
    /// name prefix.
    pub async fn list_log_group_streams(
        &self,
        group_name: &str,
        stream_name: Option<&str>,
    ) -> Result<Vec<serde_json::Value>> {
        let response = self
            .client
            .describe_log_streams()
            .log_group_name(group_name)
            .set_log_stream_name_prefix(stream_name.map(String::from))
            .send()
            .await
            .with_context(|| format!("Failed to describe streams of log group {}", group_name))?;

        let mut log_streams = Vec::new();
        if let Some(log_stream_list) = response.log_streams {
            for log_stream in log_stream_list {
                log_streams.push(log_stream_to_json(&log_stream));
            }
        }

        Ok(log_streams)
    }

    /// Filter the events of a log group by pattern and optional epoch
    /// millisecond time range.
    pub async fn filter_log_events(
        &self,
        group_name: &str,
        filter_pattern: &str,
        start: Option<i64>,
        stop: Option<i64>,
    ) -> Result<Vec<serde_json::Value>> {
        let response = self
            .client
            .filter_log_events()
            .log_group_name(group_name)
            .filter_pattern(filter_pattern)
            .set_start_time(start)
            .set_end_time(stop)
            .send()
            .await
            .with_context(|| format!("Failed to filter events of log group {}", group_name))?;

        let mut events = Vec::new();
        if let Some(event_list) = response.events {
            for event in event_list {
                events.push(log_event_to_json(&event));
            }
        }

        Ok(events)
    }
}

pub fn log_group_to_json(log_group: &logs::types::LogGroup) -> serde_json::Value {
    let mut json = serde_json::Map::new();

    if let Some(log_group_name) = &log_group.log_group_name {
        json.insert(
            "LogGroupName".to_string(),
            serde_json::Value::String(log_group_name.clone()),
        );
    }

    if let Some(creation_time) = log_group.creation_time {
        json.insert(
            "CreationTime".to_string(),
            serde_json::Value::Number(creation_time.into()),
        );
    }

    if let Some(retention_in_days) = log_group.retention_in_days {
        json.insert(
            "RetentionInDays".to_string(),
            serde_json::Value::Number(retention_in_days.into()),
        );
    }

    if let Some(metric_filter_count) = log_group.metric_filter_count {
        json.insert(
            "MetricFilterCount".to_string(),
            serde_json::Value::Number(metric_filter_count.into()),
        );
    }

    if let Some(arn) = &log_group.arn {
        json.insert("Arn".to_string(), serde_json::Value::String(arn.clone()));
    }

    if let Some(stored_bytes) = log_group.stored_bytes {
        json.insert(
            "StoredBytes".to_string(),
            serde_json::Value::Number(stored_bytes.into()),
        );
    }

    if let Some(kms_key_id) = &log_group.kms_key_id {
        json.insert(
            "KmsKeyId".to_string(),
            serde_json::Value::String(kms_key_id.clone()),
        );
    }

    serde_json::Value::Object(json)
}

pub fn log_stream_to_json(log_stream: &logs::types::LogStream) -> serde_json::Value {
    let mut json = serde_json::Map::new();

    if let Some(log_stream_name) = &log_stream.log_stream_name {
        json.insert(
            "LogStreamName".to_string(),
            serde_json::Value::String(log_stream_name.clone()),
        );
    }

    if let Some(creation_time) = log_stream.creation_time {
        json.insert(
            "CreationTime".to_string(),
            serde_json::Value::Number(creation_time.into()),
        );
    }

    if let Some(first_event_timestamp) = log_stream.first_event_timestamp {
        json.insert(
            "FirstEventTimestamp".to_string(),
            serde_json::Value::Number(first_event_timestamp.into()),
        );
    }

    if let Some(last_event_timestamp) = log_stream.last_event_timestamp {
        json.insert(
            "LastEventTimestamp".to_string(),
            serde_json::Value::Number(last_event_timestamp.into()),
        );
    }

    if let Some(last_ingestion_time) = log_stream.last_ingestion_time {
        json.insert(
            "LastIngestionTime".to_string(),
            serde_json::Value::Number(last_ingestion_time.into()),
        );
    }

    if let Some(arn) = &log_stream.arn {
        json.insert("Arn".to_string(), serde_json::Value::String(arn.clone()));
    }

    serde_json::Value::Object(json)
}

pub fn log_event_to_json(event: &logs::types::FilteredLogEvent) -> serde_json::Value {
    let mut json = serde_json::Map::new();

    if let Some(log_stream_name) = &event.log_stream_name {
        json.insert(
            "LogStreamName".to_string(),
            serde_json::Value::String(log_stream_name.clone()),
        );
    }

    if let Some(timestamp) = event.timestamp {
        json.insert(
            "Timestamp".to_string(),
            serde_json::Value::Number(timestamp.into()),
        );
    }

    if let Some(message) = &event.message {
        json.insert(
            "Message".to_string(),
            serde_json::Value::String(message.clone()),
        );
    }

    if let Some(ingestion_time) = event.ingestion_time {
        json.insert(
            "IngestionTime".to_string(),
            serde_json::Value::Number(ingestion_time.into()),
        );
    }

    if let Some(event_id) = &event.event_id {
        json.insert(
            "EventId".to_string(),
            serde_json::Value::String(event_id.clone()),
        );
    }

    serde_json::Value::Object(json)
}
