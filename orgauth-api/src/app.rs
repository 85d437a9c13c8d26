/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use orgauth_api::{app::{build_router, AppState}, config::Config};
/// use orgauth_shared::store::MemoryStore;
/// use std::sync::Arc;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(Arc::new(MemoryStore::new()), config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, routes};
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use orgauth_shared::store::Store;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler; both fields are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete router
///
/// ```text
/// /
/// ├── GET  /ping
/// ├── GET  /health
/// ├── /auth/
/// │   ├── POST /register
/// │   └── POST /login
/// └── /api/
///     ├── GET  /users/:id                      (session)
///     ├── GET  /organisations                  (session)
///     ├── POST /organisations                  (session)
///     ├── GET  /organisations/:orgId
///     └── POST /organisations/:orgId/users     (session)
/// ```
///
/// Handlers that need a session take [`crate::middleware::auth::AuthUser`]
/// as a parameter, so protection is visible in each signature.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let api_routes = Router::new()
        .route("/users/:id", get(routes::users::get_user))
        .route(
            "/organisations",
            get(routes::organisations::list_organisations)
                .post(routes::organisations::create_organisation),
        )
        .route(
            "/organisations/:org_id",
            get(routes::organisations::get_organisation),
        )
        .route(
            "/organisations/:org_id/users",
            post(routes::organisations::add_member),
        );

    let cors = cors_layer(&state.config.api.cors_origins);

    Router::new()
        .route("/ping", get(routes::health::ping))
        .route("/health", get(routes::health::health_check))
        .nest("/auth", auth_routes)
        .nest("/api", api_routes)
        .fallback(|| async { ApiError::NotFound("Route not found".to_string()) })
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// `*` allows any origin without credentials; anything else is an allow-list
/// with credentials so the session cookie crosses origins.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}
