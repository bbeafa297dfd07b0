#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use awsman::aws_services::SnsService;
use clap::{Parser, Subcommand};

/// SNS manager
#[derive(Parser, Debug)]
#[command(name = "sns", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an SNS topic
    CreateSnsTopic {
        /// Name of SNS topic to create
        topic_name: String,
    },
    /// List SNS topics
    ListSnsTopics {
        /// Continuation token from a previous listing
        #[arg(long)]
        next_token: Option<String>,
    },
    /// List SNS subscriptions
    ListSnsSubscriptions {
        /// Continuation token from a previous listing
        #[arg(long)]
        next_token: Option<String>,
    },
    /// Subscribe to an SNS topic using SMS
    SubscribeSnsTopic {
        /// ARN of SNS topic to subscribe to
        topic_arn: String,
        /// Mobile number to subscribe to the topic
        mobile_number: String,
    },
    /// Publish a message to an SNS topic
    SendSnsMessage {
        /// ARN of SNS topic where to publish the message
        topic_arn: String,
        /// Message to publish
        message: String,
    },
    /// Unsubscribe from an SNS topic
    UnsubscribeSnsTopic {
        /// ARN of SNS subscription to delete
        subscription_arn: String,
    },
    /// Delete an SNS topic
    DeleteSnsTopic {
        /// ARN of SNS topic to delete
        topic_arn: String,
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

    let service = SnsService::for_region(None).await;

    match command {
        Command::CreateSnsTopic { topic_name } => {
            service.create_topic(&topic_name).await?;
        }
        Command::ListSnsTopics { next_token } => {
            let (topics, next_token) = service.list_topics(next_token).await?;
            println!("{}", serde_json::to_string_pretty(&topics)?);
            if let Some(token) = next_token {
                println!("NextToken: {}", token);
            }
        }
        Command::ListSnsSubscriptions { next_token } => {
            let (subscriptions, next_token) = service.list_subscriptions(next_token).await?;
            println!("{}", serde_json::to_string_pretty(&subscriptions)?);
            if let Some(token) = next_token {
                println!("NextToken: {}", token);
            }
        }
        Command::SubscribeSnsTopic {
            topic_arn,
            mobile_number,
        } => {
            let subscription_arn = service.subscribe_topic(&topic_arn, &mobile_number).await?;
            println!("{}", subscription_arn.unwrap_or_default());
        }
        Command::SendSnsMessage { topic_arn, message } => {
            let message_id = service.send_message(&topic_arn, &message).await?;
            println!("{}", message_id.unwrap_or_default());
        }
        Command::UnsubscribeSnsTopic { subscription_arn } => {
            service.unsubscribe_topic(&subscription_arn).await?;
        }
        Command::DeleteSnsTopic { topic_arn } => {
            service.delete_topic(&topic_arn).await?;
        }
    }

    println!("Done");
    Ok(())
}
