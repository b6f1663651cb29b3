use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tokio::net::TcpListener;
use tracing::{debug, info};

use mentora::api::{AppState, create_router};
use mentora::auth::{AuthConfig, AuthState};
use mentora::db::Database;
use mentora::settings::{self, APP_NAME, AppConfig};
use mentora::tutor::HttpTutorBackend;

fn main() {
    if let Err(err) = try_main() {
        let _ = writeln!(io::stderr(), "{err:?}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn async_serve(ctx: RuntimeContext, cmd: ServeCommand) -> Result<()> {
    handle_serve(&ctx, cmd).await
}

fn try_main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = RuntimeContext::new(cli.common.clone())?;
    ctx.init_logging();
    debug!("config file: {}", ctx.config_file.display());

    match cli.command {
        Command::Serve(cmd) => async_serve(ctx, cmd),
        Command::Config { command } => handle_config(&ctx, command),
        Command::Secret => handle_secret(),
        Command::Completions { shell } => handle_completions(shell),
    }
}

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Mentora - education platform API server.",
    propagate_version = true
)]
struct Cli {
    #[command(flatten)]
    common: CommonOpts,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Args)]
struct CommonOpts {
    /// Override the config file path
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Reduce output to only errors
    #[arg(short, long, action = clap::ArgAction::SetTrue, global = true)]
    quiet: bool,
    /// Increase logging verbosity (stackable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Enable debug logging (equivalent to -vv)
    #[arg(long, global = true)]
    debug: bool,
    /// Enable trace logging (overrides other levels)
    #[arg(long, global = true)]
    trace: bool,
    /// Output machine readable JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve(ServeCommand),
    /// Inspect and manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Generate a JWT signing secret suitable for auth.jwt_secret
    Secret,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Args)]
struct ServeCommand {
    /// Host address to bind to (overrides config)
    #[arg(long)]
    host: Option<String>,
    /// Port to listen on (overrides config)
    #[arg(short, long)]
    port: Option<u16>,
    /// Path to the SQLite database file (overrides config)
    #[arg(long, value_name = "PATH")]
    database: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Output the effective configuration
    Show,
    /// Print the resolved config file path
    Path,
    /// Write the default configuration file
    Init,
}

#[derive(Debug)]
struct RuntimeContext {
    common: CommonOpts,
    config_file: PathBuf,
    config: AppConfig,
}

impl RuntimeContext {
    fn new(common: CommonOpts) -> Result<Self> {
        let config_file = settings::config_file_path(common.config.as_deref())?;
        let config = settings::load_config(&config_file)?;

        Ok(Self {
            common,
            config_file,
            config,
        })
    }

    fn init_logging(&self) {
        use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

        let level = if self.common.trace {
            "trace"
        } else if self.common.debug || self.common.verbose >= 2 {
            "debug"
        } else if self.common.quiet {
            "error"
        } else if self.common.verbose == 1 {
            "debug"
        } else {
            "info"
        };

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{APP_NAME}={level},tower_http={level}")));

        if self.common.json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()
                .ok();
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .try_init()
                .ok();
        }
    }
}

async fn handle_serve(ctx: &RuntimeContext, cmd: ServeCommand) -> Result<()> {
    let config = &ctx.config;

    // Fail fast on auth misconfiguration, before touching the database
    // or binding the listener.
    let auth = AuthState::new(config.auth.clone()).context("invalid auth configuration")?;

    let db_path = cmd
        .database
        .clone()
        .unwrap_or_else(|| config.database.path.clone());
    let db = Database::new(&db_path).await?;
    info!("database ready at {}", db_path.display());

    let tutor_backend = Arc::new(HttpTutorBackend::new(config.tutor.clone())?);
    info!(
        model = %config.tutor.model,
        base_url = %config.tutor.base_url,
        "tutor provider configured"
    );

    let state = AppState::new(db, auth, tutor_backend, config.cors.allowed_origins.clone());
    let app = create_router(state);

    let host = cmd.host.clone().unwrap_or_else(|| config.server.host.clone());
    let port = cmd.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("invalid listen address {host}:{port}"))?;

    info!("Listening on http://{addr}");

    let listener = TcpListener::bind(addr)
        .await
        .context("binding to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

fn handle_config(ctx: &RuntimeContext, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            if ctx.common.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&ctx.config)
                        .context("serializing config to JSON")?
                );
            } else {
                println!("{:#?}", ctx.config);
            }
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", ctx.config_file.display());
            Ok(())
        }
        ConfigCommand::Init => settings::write_default_config(&ctx.config_file),
    }
}

fn handle_secret() -> Result<()> {
    println!("{}", AuthConfig::generate_jwt_secret());
    Ok(())
}

fn handle_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, APP_NAME, &mut io::stdout());
    Ok(())
}
