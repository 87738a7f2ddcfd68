//! `eduhire` -- terminal driver for institution onboarding and course
//! curriculum editing against the eduhire REST API.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                     | Description                     |
//! |------------------------|----------|-----------------------------|---------------------------------|
//! | `API_BASE_URL`         | no       | `http://localhost:8000/api` | API root                        |
//! | `API_TOKEN`            | no       | --                          | Bearer token                    |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`                        | Client-side request timeout     |
//! | `DRAFT_DIR`            | no       | `.eduhire`                  | Where the wizard draft is saved |
//! | `LOG_FORMAT`           | no       | `pretty`                    | `json` for structured logs      |

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eduhire_cli::{commands, Cli, CliConfig, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = CliConfig::from_env();
    init_tracing(config.log_format);

    let cli = Cli::parse();
    tracing::debug!(base_url = %config.client.base_url, "Starting eduhire");

    let mut stdout = std::io::stdout().lock();
    commands::run(cli, &config, &mut stdout).await
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "eduhire_cli=info,eduhire_core=info,eduhire_client=info".into()
    });
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
