use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use feedwatch::app::AppContext;
use feedwatch::cli::{commands, Cli, Commands};
use feedwatch::config::Config;
use feedwatch::watch::WatchConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let ctx = AppContext::new(config, cli.cache_dir)?;

    match cli.command {
        Commands::Sync(args) => {
            commands::sync_feeds(&ctx, &args).await?;
        }
        Commands::Watch {
            sync,
            interval,
            no_initial_run,
        } => {
            let interval_secs = WatchConfig::parse_interval(&interval).map_err(anyhow::Error::msg)?;
            let config = WatchConfig {
                interval_secs,
                run_on_start: !no_initial_run,
            };
            commands::watch_feeds(&ctx, &sync, config).await?;
        }
        Commands::List => {
            commands::list_feeds(&ctx)?;
        }
        Commands::Clear => {
            commands::clear_cache(&ctx.store)?;
        }
    }

    Ok(())
}
