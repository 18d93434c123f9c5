use std::sync::Arc;

use cas_bridge::{
    config::CasConfig,
    db::DbPool,
    observability,
    retention::{self, SweepPolicy},
    services::SettingsHandle,
};
use chrono::Utc;
use clap::Parser;

/// CLI arguments for the CAS bridge
#[derive(Parser, Debug)]
#[command(version, about = "CAS bridge maintenance service", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to config file (built-in defaults when omitted)
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Run the sweep worker until interrupted (default)
    Serve,
    /// Run a single sweep and print what was deleted
    Sweep,
    /// Run database migrations and exit
    Migrate,
    /// Validate the configuration file and exit
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let config = load_config(args.config.as_deref());

    match args.command {
        Some(Command::CheckConfig) => {
            println!("Configuration OK");
            println!("  database: {}", database_label(&config));
            println!(
                "  single_logout_session_lifetime: {} days",
                config.logout.single_logout_session_lifetime
            );
            println!(
                "  sweep: {}",
                if config.sweep.enabled {
                    format!("every {}s", config.sweep.interval_secs)
                } else {
                    "disabled".to_string()
                }
            );
        }
        Some(Command::Migrate) => run_migrate(config).await,
        Some(Command::Sweep) => run_sweep_once(config).await,
        Some(Command::Serve) | None => run_server(config).await,
    }
}

fn load_config(explicit_path: Option<&str>) -> CasConfig {
    let Some(path) = explicit_path else {
        return CasConfig::default();
    };
    match CasConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config from {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn database_label(config: &CasConfig) -> &'static str {
    if config.database.is_memory() {
        "memory"
    } else {
        "sqlite"
    }
}

fn init_tracing(config: &CasConfig) {
    if let Err(e) = observability::init_tracing(&config.observability) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn connect(config: &CasConfig) -> (Arc<DbPool>, Arc<SettingsHandle>) {
    let db = match DbPool::from_config(&config.database).await {
        Ok(db) => Arc::new(db),
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            eprintln!("Error: Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    let settings = match SettingsHandle::load(db.clone(), config.settings()).await {
        Ok(handle) => Arc::new(handle),
        Err(e) => {
            tracing::error!(error = %e, "Failed to load CAS settings");
            eprintln!("Error: Failed to load CAS settings: {}", e);
            std::process::exit(1);
        }
    };

    (db, settings)
}

async fn run_server(config: CasConfig) {
    init_tracing(&config);
    let (db, settings) = connect(&config).await;

    tracing::info!(
        database = db.backend_name(),
        sweep_enabled = config.sweep.enabled,
        "CAS bridge started"
    );

    let worker = tokio::spawn(retention::start_sweep_worker(
        db.clone(),
        settings,
        config.sweep.clone(),
    ));

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping sweep worker");
    worker.abort();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn run_sweep_once(config: CasConfig) {
    init_tracing(&config);
    let (db, settings) = connect(&config).await;

    let policy = SweepPolicy::from_settings(&*settings.snapshot().await);
    match retention::run_sweep(&db, Utc::now(), &policy).await {
        Ok(result) => {
            println!("PGTs deleted: {}", result.pgts_deleted);
            if result.login_data_skipped {
                println!("Login data: skipped (lifetime disabled)");
            } else {
                println!("Login data deleted: {}", result.login_data_deleted);
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Sweep failed");
            eprintln!("Error: Sweep failed: {}", e);
            std::process::exit(1);
        }
    }
}

async fn run_migrate(config: CasConfig) {
    init_tracing(&config);

    if config.database.is_memory() {
        eprintln!("Error: Database is in-memory. Nothing to migrate.");
        std::process::exit(1);
    }

    match DbPool::from_config(&config.database).await {
        Ok(pool) => match pool.run_migrations().await {
            Ok(()) => tracing::info!("Database migrations completed successfully"),
            Err(e) => {
                tracing::error!(error = %e, "Database migrations failed");
                eprintln!("Error: Database migrations failed: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            eprintln!("Error: Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    }
}
