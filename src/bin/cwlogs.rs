#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use awsman::aws_services::LogsService;
use clap::{Parser, Subcommand};

/// CloudWatch Logs manager
#[derive(Parser, Debug)]
#[command(name = "cwlogs", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List log groups
    ListLogGroups {
        /// Name prefix of log groups to list
        #[arg(long)]
        group_name: Option<String>,
        /// Region where to list log groups
        #[arg(long, default_value = "ap-southeast-1")]
        region_name: String,
    },
    /// List log group streams
    ListLogGroupStreams {
        /// Name of log group
        group_name: String,
        /// Name prefix of log group streams to list
        #[arg(long)]
        stream_name: Option<String>,
        /// Region where to list log group streams
        #[arg(long, default_value = "ap-southeast-1")]
        region_name: String,
    },
    /// Filter log events using group name and filter pattern
    FilterLogEvents {
        /// Name of log group
        group_name: String,
        /// Pattern to use to filter log events
        filter_pat: String,
        /// Start time (epoch milliseconds) to filter log events
        #[arg(long)]
        start: Option<i64>,
        /// End time (epoch milliseconds) to filter log events
        #[arg(long)]
        stop: Option<i64>,
        /// Region where to filter log events
        #[arg(long, default_value = "ap-southeast-1")]
        region_name: String,
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

    match command {
        Command::ListLogGroups {
            group_name,
            region_name,
        } => {
            let service = LogsService::for_region(Some(region_name)).await;
            let log_groups = service.list_log_groups(group_name.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&log_groups)?);
        }
        Command::ListLogGroupStreams {
            group_name,
            stream_name,
            region_name,
        } => {
            let service = LogsService::for_region(Some(region_name)).await;
            let log_streams = service
                .list_log_group_streams(&group_name, stream_name.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&log_streams)?);
        }
        Command::FilterLogEvents {
            group_name,
            filter_pat,
            start,
            stop,
            region_name,
        } => {
            let service = LogsService::for_region(Some(region_name)).await;
            let events = service
                .filter_log_events(&group_name, &filter_pat, start, stop)
                .await?;
            println!("{}", serde_json::to_string_pretty(&events)?);
        }
    }

    println!("Done");
    Ok(())
}
