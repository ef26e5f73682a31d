use advisor_core::client::http::HttpTransport;
use advisor_core::client::AdvisorClient;
use advisor_core::config::Settings;
use advisor_core::session::{AnalysisSession, DeleteOutcome, HistorySession, LoadState};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod prompt;
mod render;

#[derive(Debug, Parser)]
#[command(name = "advisor", about = "Client analysis and history viewer")]
struct Args {
    /// Backend base URL. Overrides ADVISOR_API_BASE_URL.
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Print the view model as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the analysis for one client and show it.
    Analyze { client_id: String },

    /// Show every stored analysis, newest first.
    History,

    /// Delete one stored analysis (by client id and exact timestamp), then show the history.
    Delete {
        client_id: String,
        timestamp: String,

        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },

    /// List the client database.
    Clients,

    /// List the product catalogue.
    Products,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut settings = Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    if let Some(base_url) = &args.base_url {
        settings.api_base_url = Some(base_url.clone());
    }

    let result = run(&settings, &args).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
    }
    result
}

async fn run(settings: &Settings, args: &Args) -> anyhow::Result<()> {
    let transport = HttpTransport::from_settings(settings)?;
    tracing::debug!(base_url = transport.base_url(), "using advisor backend");
    let client = AdvisorClient::from_settings(settings, Arc::new(transport));

    match &args.command {
        Command::Analyze { client_id } => {
            let session = AnalysisSession::new(client);
            session.load(client_id).await;
            let view = settled(session.state())?;
            emit(args.json, &view, |out| render::analysis(out, &view))
        }
        Command::History => {
            let mut session = HistorySession::new(client);
            session.refresh().await;
            let view = settled(session.state().clone())?;
            emit(args.json, &view, |out| render::history(out, &view))
        }
        Command::Delete {
            client_id,
            timestamp,
            yes,
        } => {
            let mut session = HistorySession::new(client);
            let confirm = prompt::StdinConfirm { assume_yes: *yes };
            match session.delete(&confirm, client_id, timestamp).await {
                DeleteOutcome::Cancelled => {
                    writeln!(std::io::stdout(), "Cancelled; nothing was deleted.")?;
                    Ok(())
                }
                DeleteOutcome::Failed => {
                    let message = session.delete_error().unwrap_or("Delete failed");
                    anyhow::bail!("{message}")
                }
                DeleteOutcome::Deleted => {
                    let view = settled(session.state().clone())?;
                    emit(args.json, &view, |out| render::history(out, &view))
                }
            }
        }
        Command::Clients => {
            let clients = client.fetch_clients().await?;
            emit(args.json, &clients, |out| render::clients(out, &clients))
        }
        Command::Products => {
            let products = client.fetch_products().await?;
            emit(args.json, &products, |out| render::products(out, &products))
        }
    }
}

fn settled<T>(state: LoadState<T>) -> anyhow::Result<T> {
    match state {
        LoadState::Success(v) => Ok(v),
        LoadState::Failed(message) => anyhow::bail!(message),
        LoadState::Idle | LoadState::Loading => anyhow::bail!("request did not complete"),
    }
}

fn emit<T: serde::Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce(&mut dyn Write) -> std::io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
    } else {
        text(&mut out)?;
    }
    Ok(())
}

fn init_sentry(settings: &Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
