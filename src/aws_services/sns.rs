use anyhow::{Context, Result};
use aws_sdk_sns as sns;

/// SNS operations: topic lifecycle, single-page listings with continuation
/// tokens, SMS subscriptions, and publishing.
pub struct SnsService {
    client: sns::Client,
}

impl SnsService {
    pub fn new(client: sns::Client) -> Self {
        Self { client }
    }

    pub async fn for_region(region: Option<String>) -> Self {
        let config = super::sdk_config(region).await;
        Self::new(sns::Client::new(&config))
    }

    pub async fn create_topic(&self, topic_name: &str) -> Result<bool> {
        self.client
            .create_topic()
            .name(topic_name)
            .send()
            .await
            .with_context(|| format!("Failed to create topic {}", topic_name))?;
        Ok(true)
    }

    /// List one page of topics. The continuation token is included in the
    /// request only when supplied, and the next token is handed back to
    /// the caller for resumption.
    pub async fn list_topics(
        &self,
        next_token: Option<String>,
    ) -> Result<(Vec<serde_json::Value>, Option<String>)> {
        let response = self
            .client
            .list_topics()
            .set_next_token(next_token)
            .send()
            .await
            .context("Failed to list topics")?;

        let mut topics = Vec::new();
        if let Some(topic_list) = response.topics {
            for topic in topic_list {
                topics.push(topic_to_json(&topic));
            }
        }

        Ok((topics, response.next_token))
    }

    /// List one page of subscriptions, same token contract as
    /// [`Self::list_topics`].
    pub async fn list_subscriptions(
        &self,
        next_token: Option<String>,
    ) -> Result<(Vec<serde_json::Value>, Option<String>)> {
        let response = self
            .client
            .list_subscriptions()
            .set_next_token(next_token)
            .send()
            .await
            .context("Failed to list subscriptions")?;

        let mut subscriptions = Vec::new();
        if let Some(subscription_list) = response.subscriptions {
            for subscription in subscription_list {
                subscriptions.push(subscription_to_json(&subscription));
            }
        }

        Ok((subscriptions, response.next_token))
    }

    /// Subscribe a mobile number to a topic over SMS. Returns the
    /// subscription ARN (which can be "pending confirmation").
    pub async fn subscribe_topic(
        &self,
        topic_arn: &str,
        mobile_number: &str,
    ) -> Result<Option<String>> {
        let response = self
            .client
            .subscribe()
            .topic_arn(topic_arn)
            .protocol("sms")
            .endpoint(mobile_number)
            .send()
            .await
            .with_context(|| format!("Failed to subscribe to topic {}", topic_arn))?;

        Ok(response.subscription_arn)
    }

    /// Publish a message to a topic. Returns the message id.
    pub async fn send_message(&self, topic_arn: &str, message: &str) -> Result<Option<String>> {
        let response = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .message(message)
            .send()
            .await
            .with_context(|| format!("Failed to publish to topic {}", topic_arn))?;

        Ok(response.message_id)
    }

    pub async fn unsubscribe_topic(&self, subscription_arn: &str) -> Result<bool> {
        self.client
            .unsubscribe()
            .subscription_arn(subscription_arn)
            .send()
            .await
            .with_context(|| format!("Failed to unsubscribe {}", subscription_arn))?;
        Ok(true)
    }

    pub async fn delete_topic(&self, topic_arn: &str) -> Result<bool> {
        self.client
            .delete_topic()
            .topic_arn(topic_arn)
            .send()
            .await
            .with_context(|| format!("Failed to delete topic {}", topic_arn))?;
        Ok(true)
    }
}

pub fn topic_to_json(topic: &sns::types::Topic) -> serde_json::Value {
    let mut json = serde_json::Map::new();

    if let Some(topic_arn) = &topic.topic_arn {
        json.insert(
            "TopicArn".to_string(),
            serde_json::Value::String(topic_arn.clone()),
        );
        // The topic name is the last ARN segment.
        if let Some(name) = topic_arn.split(':').next_back() {
            json.insert(
                "Name".to_string(),
                serde_json::Value::String(name.to_string()),
            );
        }
    }

    serde_json::Value::Object(json)
}

pub fn subscription_to_json(subscription: &sns::types::Subscription) -> serde_json::Value {
    let mut json = serde_json::Map::new();

    if let Some(subscription_arn) = &subscription.subscription_arn {
        json.insert(
            "SubscriptionArn".to_string(),
            serde_json::Value::String(subscription_arn.clone()),
        );
    }

    if let Some(owner) = &subscription.owner {
        json.insert("Owner".to_string(), serde_json::Value::String(owner.clone()));
    }

    if let Some(protocol) = &subscription.protocol {
        json.insert(
            "Protocol".to_string(),
            serde_json::Value::String(protocol.clone()),
        );
    }

    if let Some(endpoint) = &subscription.endpoint {
        json.insert(
            "Endpoint".to_string(),
            serde_json::Value::String(endpoint.clone()),
        );
    }

    if let Some(topic_arn) = &subscription.topic_arn {
        json.insert(
            "TopicArn".to_string(),
            serde_json::Value::String(topic_arn.clone()),
        );
    }

    serde_json::Value::Object(json)
}
