mod ledger;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use revmon_core::Target;
use revmon_monitor::{
    IncrementalMonitor, LocalStoreOracle, PgReviewStore, RemoteArbiterOracle, RunLoop, TracingSink,
};
use revmon_scraper::ScraperServiceClient;

use crate::ledger::PgRunLedger;

#[derive(Debug, Parser)]
#[command(name = "revmon")]
#[command(about = "Report new reviews for each listing page in a target list")]
struct Cli {
    /// Target list: one `address` or `name address` per line
    #[arg(short = 'i', long = "input", default_value = "urls.txt")]
    input: PathBuf,

    /// Ignore reviews older than this date (local store only)
    #[arg(long = "from-date", value_name = "YYYY-MM-DD")]
    from_date: Option<String>,

    #[arg(long, value_enum, default_value_t = OracleKind::Local)]
    oracle: OracleKind,

    #[arg(long, default_value = "monitor.log", env = "REVMON_LOG_FILE")]
    log_file: PathBuf,

    #[arg(long, default_value = "info", env = "REVMON_LOG_LEVEL")]
    log_level: String,

    /// Print the parsed targets and exit without contacting any service
    #[arg(long)]
    dry_run: bool,
}

/// Where "already seen" answers come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OracleKind {
    /// Postgres review store owned by this process
    Local,
    /// External arbiter service that also persists
    Remote,
}

impl OracleKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_file, &cli.log_level) {
        eprintln!("error: {e:#}");
        return ExitCode::FAILURE;
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "monitor aborted");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let targets = revmon_core::load_targets(&cli.input)?;
    let min_date = cli
        .from_date
        .as_deref()
        .map(revmon_core::parse_min_date)
        .transpose()?;

    if cli.dry_run {
        print_targets(&targets);
        return Ok(());
    }

    let config = revmon_core::load_app_config_from_env()?;
    let feed = ScraperServiceClient::new(
        &config.feed_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?;
    let monitor = IncrementalMonitor::new(
        Duration::from_secs(config.call_timeout_secs),
        config.max_pages,
    );

    tracing::info!(
        targets = targets.len(),
        oracle = cli.oracle.as_str(),
        min_date = ?min_date,
        "starting monitor run"
    );

    match cli.oracle {
        OracleKind::Local => {
            let pool = revmon_db::connect_pool_from_config(&config).await?;
            revmon_db::ping(&pool)
                .await
                .context("review store is unreachable")?;
            revmon_db::run_migrations(&pool).await?;

            let ledger = PgRunLedger::open(pool.clone(), cli.oracle.as_str()).await?;
            let oracle = LocalStoreOracle::new(PgReviewStore::new(pool), min_date);
            let summaries = RunLoop::new(monitor, feed, oracle)
                .run_all(&targets, &ledger)
                .await;
            ledger.finish(&summaries).await;
        }
        OracleKind::Remote => {
            if min_date.is_some() {
                tracing::warn!("--from-date has no effect with the remote arbiter");
            }
            let endpoint = config
                .arbiter_url
                .as_deref()
                .context("REVMON_ARBITER_URL must be set for --oracle remote")?;
            let oracle =
                RemoteArbiterOracle::new(endpoint, config.request_timeout_secs, &config.user_agent)?;
            RunLoop::new(monitor, feed, oracle)
                .run_all(&targets, &TracingSink)
                .await;
        }
    }

    Ok(())
}

fn print_targets(targets: &[Target]) {
    println!("{} target(s)", targets.len());
    for target in targets {
        println!("  {target}");
    }
}
