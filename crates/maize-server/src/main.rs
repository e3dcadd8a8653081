use anyhow::Context;
use clap::Parser;
use maize_config::MaizeConfig;
use maize_db::MaizeService;
use maize_server::cli::{Cli, Commands};
use maize_server::{AppState, build_router};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("maizecare error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => MaizeConfig::load_from_file(path),
        None => MaizeConfig::load_with_dotenv(),
    }
    .context("failed to load configuration")?;

    match cli.subcommand() {
        Commands::Serve => serve(config).await,
        Commands::Seed { owner } => seed(&config, &owner).await,
    }
}

async fn serve(config: MaizeConfig) -> anyhow::Result<()> {
    let addr = config.server.bind_addr();
    if config.dev_header_enabled() {
        tracing::warn!(
            header = %config.auth.dev_header,
            "development identity header is accepted; do not expose this instance"
        );
    }

    let state = AppState::from_config(config).await?;
    let app = build_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("MaizeCare API listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    tracing::info!("server stopped");
    Ok(())
}

async fn seed(config: &MaizeConfig, owner: &str) -> anyhow::Result<()> {
    let db = MaizeService::new_local(&config.database.path)
        .await
        .with_context(|| format!("failed to open database at {}", config.database.path))?;
    let summary = db
        .seed_dashboard(owner)
        .await
        .context("failed to seed dashboard data")?;
    println!(
        "Seeded {} plants, {} diseases and {} soil readings for {owner}",
        summary.plants, summary.diseases, summary.humidity
    );
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}

fn init_tracing(verbose: bool) -> anyhow::Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("MAIZECARE_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing: {error}"))?;
    Ok(())
}
