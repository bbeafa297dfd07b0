#![warn(clippy::all, rust_2018_idioms)]

use anyhow::Result;
use awsman::aws_services::{s3::create_tempfile, S3Service};
use clap::{Parser, Subcommand};

const DEFAULT_REGION: &str = "ap-southeast-1";

/// S3 manager
#[derive(Parser, Debug)]
#[command(name = "s3", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an S3 bucket
    CreateBucket {
        /// Name of bucket to create
        name: String,
        /// Region where to create the bucket
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
    },
    /// List S3 buckets
    ListBuckets,
    /// Get an S3 bucket
    GetBucket {
        /// Name of bucket to get
        name: String,
        /// Create the bucket when it does not exist
        #[arg(long)]
        create: bool,
        /// Region where to create the bucket
        #[arg(long, default_value = DEFAULT_REGION)]
        region: String,
    },
    /// Create a temporary text file
    CreateTempfile {
        /// Name of temp file to create
        #[arg(long, short = 'F')]
        file_name: Option<String>,
        /// Content to add to the temp file
        #[arg(long, short = 'C')]
        content: Option<String>,
    },
    /// Upload a file as a bucket object
    CreateBucketObject {
        /// Name of bucket where to create the object
        bucket_name: String,
        /// Path to the file to be uploaded to the bucket
        file_path: String,
        /// Optional key prefix to set in the bucket for the file
        #[arg(long)]
        key_prefix: Option<String>,
    },
    /// Download a bucket object
    GetBucketObject {
        /// Name of bucket
        bucket_name: String,
        /// The bucket object to get
        object_key: String,
        /// Optional local directory where the downloaded file is stored
        #[arg(long)]
        dest: Option<String>,
        /// Optional object version to get
        #[arg(long)]
        version_id: Option<String>,
    },
    /// Enable bucket versioning
    EnableBucketVersioning {
        /// Name of bucket
        bucket_name: String,
    },
    /// Delete bucket objects, all versions included
    DeleteBucketObjects {
        /// Name of bucket
        bucket_name: String,
        /// Optional key prefix restricting what gets deleted
        #[arg(long)]
        key_prefix: Option<String>,
    },
    /// Delete one bucket, or every bucket when no name is given
    DeleteBuckets {
        /// Name of bucket to delete
        bucket_name: Option<String>,
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
        Command::CreateBucket { name, region } => {
            let service = S3Service::for_region(Some(region.clone())).await;
            service.create_bucket(&name, &region).await?;
        }
        Command::ListBuckets => {
            let service = S3Service::for_region(None).await;
            let buckets = service.list_buckets().await?;
            for bucket in &buckets {
                if let Some(name) = bucket.get("Name").and_then(|v| v.as_str()) {
                    println!("{}", name);
                }
            }
            println!("Found {} buckets!", buckets.len());
        }
        Command::GetBucket {
            name,
            create,
            region,
        } => {
            let service = S3Service::for_region(Some(region.clone())).await;
            if let Some(bucket) = service.get_bucket(&name, create, &region).await? {
                println!("{}", serde_json::to_string_pretty(&bucket)?);
            }
        }
        Command::CreateTempfile { file_name, content } => {
            let path = create_tempfile(file_name.as_deref(), content.as_deref(), 300)?;
            println!("{}", path.display());
        }
        Command::CreateBucketObject {
            bucket_name,
            file_path,
            key_prefix,
        } => {
            let service = S3Service::for_region(None).await;
            let object = service
                .create_bucket_object(&bucket_name, &file_path, key_prefix.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&object)?);
        }
        Command::GetBucketObject {
            bucket_name,
            object_key,
            dest,
            version_id,
        } => {
            let service = S3Service::for_region(None).await;
            let path = service
                .get_bucket_object(
                    &bucket_name,
                    &object_key,
                    dest.as_deref(),
                    version_id.as_deref(),
                )
                .await?;
            println!("{}", path.display());
        }
        Command::EnableBucketVersioning { bucket_name } => {
            let service = S3Service::for_region(None).await;
            let status = service.enable_bucket_versioning(&bucket_name).await?;
            println!("{}", status);
        }
        Command::DeleteBucketObjects {
            bucket_name,
            key_prefix,
        } => {
            let service = S3Service::for_region(None).await;
            let count = service
                .delete_bucket_objects(&bucket_name, key_prefix.as_deref())
                .await?;
            println!("Deleted {} objects", count);
        }
        Command::DeleteBuckets { bucket_name } => {
            let service = S3Service::for_region(None).await;
            let count = service.delete_buckets(bucket_name.as_deref()).await?;
            println!("Deleted {} buckets", count);
        }
    }

    println!("Done");
    Ok(())
}
