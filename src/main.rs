use anyhow::Context;
use clap::Parser;
use todo_service::config::{Config, IN_MEMORY};
use todo_service::db::Database;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Load `.env` from the working directory or its parents. Only a missing file
/// is tolerated; a file that fails to parse aborts startup.
fn load_dotenv() -> anyhow::Result<()> {
    match dotenvy::dotenv() {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(anyhow::Error::new(e).context("invalid .env file")),
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let ignored = config.ignored_settings();
    if !ignored.is_empty() {
        tracing::warn!(
            settings = ?ignored,
            "database server settings have no effect on the SQLite backend"
        );
    }

    let db_path = config.database_path();
    let mut db = if config.db_name == IN_MEMORY {
        Database::open_in_memory()
    } else {
        Database::open(&db_path)
    }
    .context("cannot open database")?;

    db.migrate().context("failed creating schema resources")?;
    tracing::info!(
        path = %db_path.display(),
        schema_version = db.schema_version()?,
        "database ready"
    );

    let addr = config.bind_addr();
    todo_service::web::serve(db, &addr)
        .await
        .with_context(|| format!("server error on {addr}"))
}

#[tokio::main]
async fn main() {
    if let Err(e) = load_dotenv() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
    let config = Config::parse();
    init_tracing();

    if let Err(e) = run(config).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
