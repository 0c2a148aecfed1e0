use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jotion_server::{
    auth::create_access_token,
    create_router, db,
    store::{DocumentStore, MemoryDocumentStore, PgDocumentStore},
    Config,
};

#[derive(Parser)]
#[command(name = "jotion-server", about = "Document store backend for Jotion")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a signed development token for the given subject
    IssueToken {
        #[arg(long)]
        subject: String,
        /// Display name carried in the token
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jotion_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::IssueToken { subject, name } => {
            let token = create_access_token(
                &subject,
                name.as_deref(),
                &config.jwt_secret,
                config.jwt_expires_in,
            )?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let store: Arc<dyn DocumentStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::create_pool(url)
                .await
                .context("Could not connect to database")?;
            db::run_migrations(&pool)
                .await
                .context("Could not run migrations")?;
            tracing::info!("Using Postgres document store");
            Arc::new(PgDocumentStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, documents will be kept in memory");
            Arc::new(MemoryDocumentStore::new())
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = create_router(store, config);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
