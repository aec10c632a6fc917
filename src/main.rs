//! HMA client - command-line access to a hasher-matcher-actioner API.
//!
//! Every subcommand maps to one domain operation. JSON results go to stdout;
//! logs go to stderr.

use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hma_client::{
    config::{parse_metadata, Cli, Command, ConnectionConfig, TokenSource},
    HmaClient, LocalFile, OpinionChange, SessionProvider, StaticTokenProvider, Token,
    TokenFileProvider,
};

type Client = HmaClient<Arc<dyn SessionProvider>>;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.connection.verbose);

    if let Err(e) = cli.connection.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let client = match build_client(&cli.connection) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run_command(&client, cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "hma_client=debug"
    } else {
        "hma_client=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the session provider and client from validated settings.
fn build_client(connection: &ConnectionConfig) -> Result<Client, Box<dyn Error>> {
    let session: Arc<dyn SessionProvider> = match connection.token_source() {
        Some(TokenSource::Inline(token)) => Arc::new(StaticTokenProvider::new(Token::new(token)?)),
        Some(TokenSource::File(path)) => {
            debug!("Reading token from {} on every request", path.display());
            Arc::new(TokenFileProvider::new(path))
        }
        None => return Err("no credentials configured".into()),
    };

    let config = connection.api_config()?;
    info!("Using {} at {}", config.name, config.base_url);

    Ok(HmaClient::connect(config, session)?)
}

// =============================================================================
// Commands
// =============================================================================

async fn run_command(client: &Client, command: Command) -> Result<(), Box<dyn Error>> {
    match command {
        Command::Matches {
            signal_id,
            signal_source,
            content_id,
        } => {
            let matches = match (signal_id, signal_source, content_id) {
                (Some(id), Some(source), _) => {
                    client.fetch_matches_by_signal(&id, &source).await?
                }
                (_, _, Some(content_id)) => client.fetch_matches_by_content(&content_id).await?,
                _ => client.fetch_all_matches().await?,
            };
            print_json(&matches)
        }
        Command::MatchDetails { key } => print_json(&client.fetch_match_details(&key).await?),
        Command::Hash { key } => print_json(&client.fetch_hash(&key).await?),
        Command::Image { key, output } => {
            let image = client.fetch_image(&key).await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, &image).await?;
                    info!("Wrote {} bytes to {}", image.len(), path.display());
                }
                None => {
                    let mut stdout = tokio::io::stdout();
                    stdout.write_all(&image).await?;
                    stdout.flush().await?;
                }
            }
            Ok(())
        }
        Command::Signals => print_json(&client.fetch_signal_summary().await?),
        Command::Dashboard { path } => {
            print_json(&client.fetch_dashboard_card_summary(&path).await?)
        }
        Command::UploadImage { file } => {
            let file = LocalFile::new(file);
            print_json(&client.upload_image(&file).await?)
        }
        Command::OpinionChange {
            signal_id,
            signal_source,
            dataset,
            change,
        } => {
            let response = client
                .request_signal_opinion_change(
                    &signal_id,
                    &signal_source,
                    &dataset,
                    OpinionChange::from(change),
                )
                .await?;
            print_json(&response)
        }
        Command::Submit {
            submission_type,
            content_id,
            content_type,
            content_ref,
            metadata,
        } => {
            let metadata = parse_metadata(&metadata)?;
            let response = client
                .submit_content(
                    &submission_type,
                    &content_id,
                    &content_type,
                    &content_ref,
                    metadata,
                )
                .await?;
            print_json(&response)
        }
        Command::SubmitUpload {
            submission_type,
            content_id,
            content_type,
            file,
            metadata,
        } => {
            let metadata = parse_metadata(&metadata)?;
            let file = LocalFile::new(file);
            let response = client
                .submit_content_upload(
                    &submission_type,
                    &content_id,
                    &content_type,
                    &file,
                    metadata,
                )
                .await?;
            print_json(&response)
        }
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
