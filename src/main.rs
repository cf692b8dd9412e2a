use clap::Parser;
use produce_analyzer::cli::commands::{cmd_analyze, cmd_price};
use produce_analyzer::cli::config::{BASE_URL_ENV, Cli, Commands, load_config, resolve_base_url};
use produce_analyzer::client::client::AnalysisClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let default_filter = match cli.verbose {
        0 => "produce_analyzer=warn",
        1 => "produce_analyzer=info",
        _ => "produce_analyzer=debug",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Resolve base URL: CLI > config > env > default
    let env_base_url = std::env::var(BASE_URL_ENV).ok();
    let base_url = resolve_base_url(cli.base_url.as_deref(), &config, env_base_url.as_deref());
    let client = AnalysisClient::http(&base_url).with_price_enrichment(config.service.enrich_prices);

    let ok = match cli.command {
        Commands::Analyze {
            source,
            format,
            trace,
        } => {
            cmd_analyze(
                &source,
                &format,
                trace.as_deref(),
                client,
                config.workflow.to_workflow_config(),
                cli.verbose,
            )
            .await?
        }
        Commands::Price { name } => cmd_price(&name, &client).await?,
    };

    if !ok {
        std::process::exit(1);
    }

    Ok(())
}
