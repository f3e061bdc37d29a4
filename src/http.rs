//! The HTTP session facade: four JSON endpoints plus a static file
//! responder for a login/session web frontend.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::session::SessionStore;

/// Facade configuration, populated from environment variables by the
/// `session_server` binary.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory `index.html`, `styles.css` and `app.js` are served from.
    pub static_dir: PathBuf,
}

#[derive(Debug, Clone)]
struct AppState {
    sessions: SessionStore,
    config: Arc<AppConfig>,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    correo: String,
    password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct TokenRequest {
    token: String,
}

#[derive(Debug, Deserialize)]
struct ServicioQuery {
    token: String,
}

/// Build the router: the four JSON endpoints plus static asset serving,
/// wrapped in a permissive CORS layer that answers every origin, method,
/// and header, including `OPTIONS` preflight requests.
pub fn router(sessions: SessionStore, config: AppConfig) -> Router {
    let state = AppState {
        sessions,
        config: Arc::new(config.clone()),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/login", post(login))
        .route("/servicio", get(servicio))
        .route("/logout", post(logout))
        .route("/admin/clear", post(admin_clear))
        .fallback_service(ServeDir::new(&config.static_dir))
        .layer(cors)
        .with_state(state)
}

async fn login(State(state): State<AppState>, Json(body): Json<LoginRequest>) -> impl IntoResponse {
    let token = state.sessions.login(body.correo, body.password);
    log::debug!("login issued token");
    (StatusCode::OK, Json(LoginResponse { token }))
}

async fn servicio(State(state): State<AppState>, Query(query): Query<ServicioQuery>) -> impl IntoResponse {
    match state.sessions.authenticate(&query.token) {
        Some(session) => (
            StatusCode::OK,
            Json(json!({ "mensaje": "sesion activa", "correo": session.email })),
        )
            .into_response(),
        None => {
            log::warn!("rejected expired or unknown token");
            unauthorized()
        }
    }
}

async fn logout(State(state): State<AppState>, Json(body): Json<TokenRequest>) -> impl IntoResponse {
    if state.sessions.logout(&body.token) {
        (StatusCode::OK, Json(json!({ "mensaje": "sesion cerrada" }))).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({ "error": "token no encontrado" }))).into_response()
    }
}

async fn admin_clear(State(state): State<AppState>) -> impl IntoResponse {
    state.sessions.clear_all();
    log::info!("admin cleared all sessions");
    (StatusCode::OK, Json(json!({ "cleared": true })))
}

fn unauthorized() -> axum::response::Response {
    (StatusCode::UNAUTHORIZED, Json(json!({ "error": "invalid or expired session" }))).into_response()
}

/// Bind and serve the facade until `shutdown` resolves.
///
/// `shutdown` lets callers wire in `tokio::signal::ctrl_c()` or any other
/// cancellation source, so the sweeper and the listener can be torn down
/// together instead of leaving a detached, unjoinable thread running.
pub async fn serve(
    addr: SocketAddr,
    sessions: SessionStore,
    config: AppConfig,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = router(sessions, config);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("listening on {addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_state() -> (SessionStore, AppConfig) {
        (
            SessionStore::new(4, Duration::from_secs(300)),
            AppConfig { static_dir: PathBuf::from(".") },
        )
    }

    #[test]
    fn test_router_builds() {
        let (sessions, config) = test_state();
        let _router = router(sessions, config);
    }
}
