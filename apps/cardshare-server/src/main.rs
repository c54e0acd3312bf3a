use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context as _, Result};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use business_card::{BusinessCardConfig, BusinessCardModule};
use cardkit::bootstrap::app_config::redact_dsn_password;
use cardkit::bootstrap::{
    AppConfig, AppConfigProvider, CliArgs, EnvAlias, init_logging, wait_for_shutdown,
};
use cardkit::http::apply_middleware_stack;
use cardkit::module_config_required;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Plain variables accepted next to the `CARDSHARE__*` overrides.
const ENV_ALIASES: &[EnvAlias] = &[
    EnvAlias {
        var: "DATABASE_URL",
        key: "database.dsn",
    },
    EnvAlias {
        var: "PUBLIC_ORIGIN",
        key: "server.public_origin",
    },
    EnvAlias {
        var: "SUPABASE_URL",
        key: "modules.business_card.config.identity.url",
    },
    EnvAlias {
        var: "SUPABASE_ANON_KEY",
        key: "modules.business_card.config.identity.anon_key",
    },
    EnvAlias {
        var: "SUPABASE_JWT_SECRET",
        key: "modules.business_card.config.auth.jwt_secret",
    },
    EnvAlias {
        var: "RESEND_API_KEY",
        key: "modules.business_card.config.email.api_key",
    },
];

/// cardshare server - digital business cards
#[derive(Parser)]
#[command(name = "cardshare-server")]
#[command(about = "cardshare server - digital business cards")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port override for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Validate configuration and exit
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.config
        && !Path::new(path).is_file()
    {
        anyhow::bail!("config file does not exist: {}", path.display());
    }

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().into_owned()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // defaults -> YAML -> CARDSHARE__* -> aliases -> CLI
    let mut config = AppConfig::load_layered(cli.config.as_deref(), ENV_ALIASES)?;
    config.apply_cli_overrides(&args);

    if cli.print_config {
        println!("Effective configuration:\n{}", config.to_yaml()?);
        return Ok(());
    }

    let _log_guard = init_logging(&config.logging)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cardshare server starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(&config),
    }
}

fn check_config(config: &AppConfig) -> Result<()> {
    tracing::info!("Checking configuration...");
    config.validate()?;

    let provider = AppConfigProvider::new(config.clone());
    let module: BusinessCardConfig = module_config_required(&provider, BusinessCardModule::NAME)?;
    module.validate()?;

    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}

async fn connect_db(config: &AppConfig) -> Result<DatabaseConnection> {
    let dsn = config
        .database
        .dsn
        .clone()
        .context("database.dsn is required")?;
    tracing::info!(dsn = %redact_dsn_password(&dsn), "connecting to database");

    let mut opts = ConnectOptions::new(dsn);
    opts.max_connections(config.database.max_conns)
        .connect_timeout(Duration::from_secs(config.database.connect_timeout_secs))
        .sqlx_logging(false);
    Database::connect(opts)
        .await
        .context("failed to connect to database")
}

async fn health(State(db): State<DatabaseConnection>) -> impl IntoResponse {
    match db.ping().await {
        Ok(()) => (StatusCode::OK, axum::Json(serde_json::json!({ "status": "ok" }))),
        Err(err) => {
            tracing::warn!(error = %err, "health check: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                axum::Json(serde_json::json!({ "status": "unavailable" })),
            )
        }
    }
}

async fn run_server(config: AppConfig) -> Result<()> {
    config.validate()?;

    let db = connect_db(&config).await?;
    BusinessCardModule::migrate(&db).await?;

    let provider = AppConfigProvider::new(config.clone());
    let module =
        BusinessCardModule::from_config(&provider, db.clone(), &config.server.public_origin)?;

    let health_routes = Router::new()
        .route("/health", get(health))
        .with_state(db.clone());
    let router = apply_middleware_stack(module.router().merge(health_routes), &config.server)?;

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_addr))?;
    tracing::info!(
        addr = %config.server.bind_addr,
        origin = %config.server.public_origin,
        "HTTP server listening"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(err) = wait_for_shutdown().await {
                tracing::error!(error = %err, "signal handling failed, shutting down");
            }
        })
        .await
        .context("HTTP server failed")?;

    db.close().await.context("failed to close database")?;
    tracing::info!("cardshare server stopped");
    Ok(())
}
