//! awsman - Command line managers for a handful of AWS services
//!
//! Each binary in this package wraps a single AWS service with a one-to-one
//! mapping from CLI subcommands to SDK calls:
//!
//! - `cwlogs`: CloudWatch Logs (list log groups and streams, filter events)
//! - `dynamo`: DynamoDB (table lifecycle, product items, query/scan)
//! - `s3`: S3 (bucket lifecycle, object upload/download, versioned delete)
//! - `sns`: SNS (topic lifecycle, SMS subscriptions, publish)
//!
//! The library side is a thin translation layer: every operation builds one
//! SDK request (omitting parameters whose optional CLI flags were not
//! supplied), sends it, and converts the relevant response substructure to
//! JSON. All persistence and consistency guarantees belong to AWS; nothing
//! here retries, caches, or coordinates beyond what the SDK does internally.
//!
//! See [`aws_services`] for the per-service wrappers and [`config`] for the
//! JSON definition-file formats consumed by the `dynamo` binary.

#![warn(clippy::all, rust_2018_idioms)]

pub mod aws_services;
pub mod config;
pub mod telemetry;
