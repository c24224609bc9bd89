use anyhow::Result;
use clap::{Parser, Subcommand};
use habitrack::config::Config;
use habitrack::routes::Dashboard;
use habitrack_core::{
    Clock, FixedClock, SystemClock, compute_stats, parse_iso_date,
    stats::{frequency_text, streak_text},
};
use sqlx::migrate::MigrateDatabase;

/// habitrack - personal habit tracking
#[derive(Parser)]
#[command(name = "habitrack")]
#[command(about = "Track daily habits, streaks and progress", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Print the dashboard summary and per-habit stats
    Stats {
        /// Evaluate as of this date (YYYY-MM-DD) instead of today
        #[arg(long)]
        today: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    habitrack::observability::init_observability(
        "habitrack",
        env!("CARGO_PKG_VERSION"),
        &config.logging.level,
        config.logging.format,
    )?;

    match cli.command {
        Commands::Serve { host, port } => habitrack::server::serve(config, host, port).await,
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::Stats { today } => stats_command(config, today).await,
    }
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = habitrack::db::create_pool(&config.database.url, 1).await?;
    habitrack::store::run_migrations(&pool).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: Config) -> Result<()> {
    tracing::info!("Resetting database...");

    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
        tracing::info!("Database dropped successfully");
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate_command(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn stats_command(config: Config, today: Option<String>) -> Result<()> {
    let now = match today.as_deref() {
        Some(value) => {
            let date = parse_iso_date(value)
                .ok_or_else(|| anyhow::anyhow!("Invalid date {value}, expected YYYY-MM-DD"))?;
            FixedClock::on(date).now()
        }
        None => SystemClock.now(),
    };

    let store = habitrack::store::open_store(&config).await?;
    let habits = store.load_all().await?;
    let dashboard = Dashboard::build(&habits, now);

    println!("Habits as of {}", now.date_naive());
    println!("  Total habits:   {}", dashboard.total_habits);
    println!(
        "  Today:          {}/{} ({}%)",
        dashboard.today.completed, dashboard.today.total, dashboard.today.percentage
    );
    println!("  Best streak:    {}", dashboard.best_streak);
    println!("  This week:      {}%", dashboard.weekly_percentage);

    for habit in &habits {
        let stats = compute_stats(habit, now);
        println!();
        println!("{} ({})", habit.title, frequency_text(habit));
        println!("  Current:        {}", streak_text(stats.current_streak));
        println!("  Best streak:    {}", stats.best_streak);
        println!("  Completion:     {}%", stats.completion_rate);
    }

    Ok(())
}
