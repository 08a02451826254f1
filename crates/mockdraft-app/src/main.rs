// Mock draft entry point.
//
// Startup sequence:
// 1. Parse the command line
// 2. Initialize tracing (log to file, the terminal shows the board)
// 3. Load config
// 4. Load the pool, draft order and profiles
// 5. Open the database and resume the current draft
// 6. Run the command and print its output

use mockdraft_app::app::{self, AppState};
use mockdraft_app::cli::{self, Cli};
use mockdraft_app::config;
use mockdraft_app::data::{self, normalize::Normalizer};
use mockdraft_app::db;

use anyhow::Context;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Parse the command line
    let cli = Cli::parse();

    // 2. Initialize tracing
    init_tracing()?;
    info!("Mock draft starting up");

    // 3. Load config
    let config = config::load_config(&cli.dir).context("failed to load configuration")?;
    info!(
        "Config loaded: year={}, quota year={}",
        config.draft.year, config.draft.quota_year
    );

    // 4. Load input data
    let normalizer = Normalizer::new().context("failed to build name normalizer")?;
    let draft_data =
        data::load_all(&config, &cli.dir, &normalizer).context("failed to load draft data")?;
    let session = data::build_session(&config, draft_data, &normalizer);

    // 5. Open database and resume
    let db_path = cli.dir.join(&config.db_path);
    let db = db::Database::open(&db_path.to_string_lossy()).context("failed to open database")?;
    info!("Database opened at {}", db_path.display());

    let user_manager = config.draft.user_manager.as_deref().map(|m| normalizer.name(m));
    let seed = cli.seed.or(config.draft.seed);
    let mut app_state = AppState::new(session, db, user_manager, seed)?;
    match app::recover_from_db(&mut app_state) {
        Ok(true) => info!("Draft state restored from previous session"),
        Ok(false) => info!("Starting fresh draft session"),
        Err(e) => return Err(e.context("draft recovery failed")),
    }

    // 6. Run the command
    let output = cli::execute(&mut app_state, cli.command, &normalizer, config.pacing.delay_ms).await?;
    print!("{output}");

    info!("Mock draft exiting");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which shows the board).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("mockdraft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("mockdraft_app=info,mockdraft_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
