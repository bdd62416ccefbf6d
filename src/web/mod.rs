use crate::db::Database;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub use errors::AppError;
pub use graphql::{TodoSchema, build_schema};

mod errors;
mod graphql;
mod handlers;

/// Database handle shared by the REST handlers and the GraphQL resolvers.
pub type SharedDb = Arc<Mutex<Database>>;

/// Shared application state for the web server.
#[derive(Clone)]
pub struct AppState {
    pub db: SharedDb,
    pub schema: TodoSchema,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        let db = Arc::new(Mutex::new(db));
        let schema = build_schema(db.clone());
        AppState { db, schema }
    }
}

/// Lock the shared database, reporting a poisoned lock as an internal error.
pub(crate) fn lock_db(db: &SharedDb) -> Result<MutexGuard<'_, Database>, AppError> {
    db.lock()
        .map_err(|e| AppError::internal("Database unavailable", e))
}

/// Parse a todo id from a path segment or GraphQL argument.
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(errors::INVALID_ID.to_string()))
}

/// Build the axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .route("/graphql", post(graphql::graphql_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router on `addr` until Ctrl-C or SIGTERM.
pub async fn serve(db: Database, addr: &str) -> std::io::Result<()> {
    let app = create_router(AppState::new(db));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "todo service listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
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
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
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
    tracing::info!("shutting down");
}
