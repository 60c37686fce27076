mod admin;
mod auth;
mod error;
pub mod flash;
pub mod pages;
mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::auth::{SessionManager, Viewer};
use crate::config::Config;
use crate::db::Database;
use crate::posts::PostStore;

pub use error::AppError;
use flash::Flashes;
use pages::PageContext;

/// Slack on top of the upload limit for the other multipart fields.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub posts: PostStore,
    pub sessions: SessionManager,
}

impl AppState {
    /// Wire the stores together from configuration and an open database.
    #[must_use]
    pub fn new(config: Config, db: Database) -> Self {
        let sessions = SessionManager::new(
            db.pool().clone(),
            &config.secret_key,
            config.session_ttl,
            config.secure_cookies,
        );
        let posts = PostStore::new(config.posts_path.clone());

        Self {
            db,
            config: Arc::new(config),
            posts,
            sessions,
        }
    }
}

/// Layout context for a page rendered in response to this request.
fn page_context<'a>(state: &'a AppState, viewer: Viewer, flashes: &'a Flashes) -> PageContext<'a> {
    PageContext {
        site_name: &state.config.site_name,
        viewer,
        flashes: &flashes.messages,
    }
}

impl FromRef<AppState> for SessionManager {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.config)
    }
}

/// Start the web server and run until `shutdown` fires.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails.
pub async fn serve(state: AppState, shutdown: CancellationToken) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.web_host, state.config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Web server error")?;

    Ok(())
}

/// Serve until `signal` resolves or the server stops on its own.
///
/// `shutdown` is cancelled either way, so background workers stop with the
/// server.
///
/// # Errors
///
/// Returns the server's error if it fails, for example when the port is taken.
pub async fn run_until<F>(state: AppState, shutdown: CancellationToken, signal: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let mut server = tokio::spawn(serve(state, shutdown.clone()));

    let finished = tokio::select! {
        joined = &mut server => Some(joined),
        () = signal => None,
    };
    shutdown.cancel();

    let joined = if let Some(joined) = finished {
        joined
    } else {
        info!("Shutting down...");
        server.await
    };
    joined.context("Web server task panicked")?
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let body_limit = state
        .config
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);
    info!(static_dir = %static_dir.display(), body_limit, "Serving static files");

    Router::new()
        .merge(routes::router())
        .merge(auth::router())
        .merge(admin::router())
        .nest_service("/static", ServeDir::new(&static_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
