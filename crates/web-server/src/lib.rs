use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use chrono::Utc;
use configuration::Settings;
use database::DbRepository;
use std::sync::Arc;
use std::time::Duration;
use storage::MediaStore;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod auth;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod views;

/// How often expired sign-in sessions are swept from the database.
const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// The shared application state that all handlers can access.
pub struct AppState {
    pub db_repo: DbRepository,
    pub media: MediaStore,
    pub settings: Settings,
}

impl AppState {
    pub fn new(db_repo: DbRepository, settings: Settings) -> Self {
        let media = MediaStore::new(
            settings.media.root.clone(),
            settings.media.default_image.clone(),
        );
        Self {
            db_repo,
            media,
            settings,
        }
    }
}

/// Builds the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.settings.server.body_limit_bytes();
    let media_root = state.settings.media.root.clone();

    // --- Gated routes: the login guard runs before any of these handlers ---
    let gated = Router::new()
        .route(
            "/entrenamientos/crear",
            get(handlers::workouts::create_form).post(handlers::workouts::create),
        )
        .route(
            "/entrenamientos/editar/:id",
            get(handlers::workouts::edit_form).post(handlers::workouts::edit),
        )
        .route("/entrenamientos/eliminar/:id", post(handlers::workouts::delete))
        .route(
            "/ejercicios/crear",
            get(handlers::exercises::create_form).post(handlers::exercises::create),
        )
        .route(
            "/ejercicios/editar/:id",
            get(handlers::exercises::edit_form).post(handlers::exercises::edit),
        )
        .route("/ejercicios/eliminar/:id", post(handlers::exercises::delete))
        .route(
            "/cerrar_sesion",
            get(handlers::accounts::sign_out).post(handlers::accounts::sign_out),
        )
        .route("/entrenamiento/:id/apuntarse", post(handlers::bookmarks::add))
        .route("/entrenamiento/:id/desapuntarse", post(handlers::bookmarks::remove))
        .route("/entrenamientos/apuntados", get(handlers::bookmarks::list))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_login,
        ));

    // --- Public routes ---
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/", get(handlers::catalog::home))
        .route("/entrenamientos", get(handlers::catalog::workouts))
        .route("/ejercicios", get(handlers::catalog::exercises))
        .route("/entrenamiento/:id", get(handlers::catalog::workout_detail))
        .route(
            "/registro",
            get(handlers::accounts::register_form).post(handlers::accounts::register),
        )
        .route(
            "/inicio_sesion",
            get(handlers::accounts::login_form).post(handlers::accounts::login),
        )
        .merge(gated)
        .nest_service("/media", ServeDir::new(media_root))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
}

/// The main function to configure and run the web server.
///
/// Tracing is initialized by the binary before this is called.
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let addr = settings.server.socket_addr()?;

    let db_pool = database::connect(&settings.database).await?;
    database::run_migrations(&db_pool).await?;
    let db_repo = DbRepository::new(db_pool);

    tokio::fs::create_dir_all(&settings.media.root).await?;
    let app_state = Arc::new(AppState::new(db_repo, settings));

    spawn_session_purge(app_state.clone());

    let app = build_router(app_state);

    tracing::info!("Web server started and listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn spawn_session_purge(state: Arc<AppState>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            match state.db_repo.purge_expired_sessions(Utc::now()).await {
                Ok(0) => {}
                Ok(purged) => tracing::info!(purged, "Expired sessions removed."),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired sessions."),
            }
        }
    });
}
