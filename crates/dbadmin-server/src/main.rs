use clap::{Parser, Subcommand};
use dbadmin_adapter_pg::{PgCredentialStore, PgDocumentStore};
use dbadmin_biscuit::{KeyOrigin, KeyPair, TokenIssuer};
use dbadmin_server::auth::bootstrap::bootstrap_admin;
use dbadmin_server::config::{CONFIG_ENV, load_config};
use dbadmin_server::{ApiSettings, AppState, create_router, server};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dbadmin", version, about = "Admin API over a PostgreSQL schema")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Listen address, overrides server.bind
    #[arg(long)]
    bind: Option<String>,

    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,

    /// Generate a token signing key and print it
    Keygen {
        /// Write the private key here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd.unwrap_or(Command::Serve) {
        Command::Keygen { output } => keygen(output),
        Command::Serve => run(cli.config, cli.bind).await,
    }
}

fn keygen(output: Option<PathBuf>) -> anyhow::Result<()> {
    let keypair = KeyPair::generate()?;
    match output {
        Some(path) => {
            keypair.save_private_key(&path)?;
            println!("private key written to {}", path.display());
        }
        None => println!("private key: {}", keypair.private_key_hex()),
    }
    println!("public key:  {}", keypair.public_key_hex());
    Ok(())
}

async fn run(config: Option<PathBuf>, bind: Option<String>) -> anyhow::Result<()> {
    let cfg = load_config(config, bind)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.logging.filter)),
        )
        .init();

    let pool = dbadmin_adapter_pg::connect(&cfg.database).await?;
    tracing::info!(schema = %cfg.database.schema, "connected to database");

    let credentials =
        PgCredentialStore::new(pool.clone(), &cfg.database.schema, &cfg.auth.admin_table)?;
    credentials.ensure_table().await?;

    if let Some(username) = &cfg.auth.bootstrap_admin {
        let password = std::env::var(&cfg.auth.bootstrap_password_env).unwrap_or_default();
        bootstrap_admin(&credentials, username, &password).await?;
    }

    let (keypair, origin) = KeyPair::resolve(&cfg.auth)?;
    if origin == KeyOrigin::Ephemeral {
        tracing::warn!(
            "no token signing key configured; using an ephemeral key, tokens will not survive a restart"
        );
    }

    let documents = PgDocumentStore::new(pool, &cfg.database);
    let state = AppState::new(
        Arc::new(documents),
        Arc::new(credentials),
        TokenIssuer::new(keypair),
        ApiSettings::from_config(&cfg),
    );

    server::serve(create_router(state), &cfg.server).await
}
