/// Application state and router builder
///
/// `AppState` is the explicit application context handed to every handler:
/// the database pool, the session store and the configuration.
///
/// # Example
///
/// ```no_run
/// use minishop_api::{app::{build_router, AppState}, config::Config};
/// use minishop_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// })
/// .await?;
///
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::session::require_session, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use minishop_shared::auth::session::SessionManager;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Server-side session store
    pub sessions: SessionManager,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state with an empty session store
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let sessions = SessionManager::new(config.session.ttl());
        Self {
            db,
            sessions,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /health
/// ├── POST   /login
/// ├── POST   /logout                       (session)
/// └── /api
///     ├── GET    /products
///     ├── GET    /products/:id
///     ├── POST   /products/add             (session)
///     ├── PUT    /products/update/:id      (session)
///     ├── DELETE /products/delete/:id      (session)
///     ├── GET    /cart                     (session)
///     ├── POST   /cart/add/:product_id     (session)
///     ├── DELETE /cart/remove/:item_id     (session)
///     ├── POST   /cart/checkout            (session)
///     └── POST   /user/add
/// ```
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/login", post(routes::auth::login))
        .route("/api/products", get(routes::products::list_products))
        .route("/api/products/:id", get(routes::products::get_product))
        .route("/api/user/add", post(routes::users::add_user));

    // Guarded with route_layer so unknown paths still 404 instead of 401
    let protected_routes = Router::new()
        .route("/logout", post(routes::auth::logout))
        .route("/api/products/add", post(routes::products::add_product))
        .route(
            "/api/products/update/:id",
            put(routes::products::update_product),
        )
        .route(
            "/api/products/delete/:id",
            delete(routes::products::delete_product),
        )
        .route("/api/cart", get(routes::cart::list_cart))
        .route("/api/cart/add/:product_id", post(routes::cart::add_to_cart))
        .route(
            "/api/cart/remove/:item_id",
            delete(routes::cart::remove_from_cart),
        )
        .route("/api/cart/checkout", post(routes::cart::checkout))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// CORS: `*` in development, an explicit origin list with credentials otherwise
fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
