//! netcrawl: seed a crawl, wait for it to complete, export the inventory.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use netcrawl::config;
use netcrawl::db::{run_migrations, DbPool, Store};
use netcrawl::engine::Engine;
use netcrawl::export;
use netcrawl::frontier::Frontier;
use netcrawl::util::normalize_hostname;

#[derive(Parser)]
#[command(name = "netcrawl", about = "Concurrent CDP-neighbor network discovery and inventory crawler")]
struct Cli {
    /// Device username
    #[arg(short, long)]
    username: String,

    /// Device password
    #[arg(short, long)]
    password: String,

    /// Seed device hostname
    #[arg(long = "seed-hostname")]
    seed_hostname: String,

    /// Seed device management IP
    #[arg(long = "seed-ip")]
    seed_ip: String,

    /// Override threading.max_workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Configuration directory
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug output
    #[arg(short = 'D', long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref().map(std::path::Path::new))?;
    if cli.debug {
        config.log = "debug".into();
    }
    if let Some(workers) = cli.workers {
        config.threading.max_workers = workers;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(config.log.parse()?))
        .init();

    let db = DbPool::new(&config.database).await?;
    run_migrations(db.get_pool()).await?;
    let store = Store::new(db.get_pool().clone());

    let cleared = store.clear_stale_processing().await?;
    if cleared > 0 {
        tracing::info!(cleared, "requeued entries left mid-flight by a previous run");
    }

    let frontier = Frontier::new();
    for entry in store.unprocessed_entries().await? {
        frontier.push(entry.hostname, entry.ip_address);
    }

    let seed_hostname = normalize_hostname(&cli.seed_hostname);
    if store.admit_if_absent(&seed_hostname, &cli.seed_ip).await? {
        frontier.push(seed_hostname, cli.seed_ip);
    }

    let mut engine = Engine::new(
        cli.username,
        cli.password,
        config.connection.clone(),
        config.filtering.clone(),
        &config.threading,
        store.clone(),
        frontier,
    );
    engine.start(config.threading.max_workers);
    engine.wait_for_completion().await;
    engine.stop().await;

    export::export_inventory(&store, &config.output).await?;

    Ok(())
}
