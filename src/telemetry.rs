//! Tracing setup shared by the binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directives when `RUST_LOG` is not set. AWS SDK internals
/// are noisy at info level, so they are capped at warn.
const DEFAULT_FILTER: &str = "awsman=info,cwlogs=info,dynamo=info,s3=info,sns=info,\
                              aws_config=warn,aws_smithy_runtime=warn,aws_smithy_http=warn,\
                              aws_sigv4=warn,hyper=warn";

/// Initialize the tracing subscriber for a CLI invocation.
///
/// Logs go to stderr so stdout stays clean for the JSON the subcommands
/// print. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_FILTER.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT"),
        "awsman starting"
    );
}
