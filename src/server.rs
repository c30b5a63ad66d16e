//! REST API over the move engine.
//!
//! - `POST /game/play?difficulty=<easy|medium|hard>` with an `Authorization`
//!   header naming the user and a `{ "row": r, "column": c }` body.
//! - `POST /users/login` with a `{ "email": "..." }` body.

use crate::engine::{EngineError, MoveEngine, MoveOutcome, MoveRequest};
use crate::session::SessionLocks;
use crate::store::{GameStore, StoreError, UserId, UserProfile};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Request, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{debug, error, info, instrument, warn};

/// Shared state for request handlers.
pub struct AppState<S> {
    engine: Arc<MoveEngine<S>>,
    sessions: SessionLocks,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            sessions: self.sessions.clone(),
        }
    }
}

impl<S: GameStore> AppState<S> {
    /// Wraps an engine with a fresh lock registry.
    #[instrument(skip(engine))]
    pub fn new(engine: MoveEngine<S>) -> Self {
        info!("Creating app state");
        Self {
            engine: Arc::new(engine),
            sessions: SessionLocks::new(),
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &MoveEngine<S> {
        &self.engine
    }
}

/// Query string of a play request.
#[derive(Debug, Clone, Deserialize)]
pub struct PlayQuery {
    /// Bot difficulty label.
    pub difficulty: String,
}

/// Body of a login request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// User identity.
    pub email: String,
}

/// Error body returned for failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub message: String,
}

/// Request failure mapped to an HTTP status.
#[derive(Debug, Display, Error)]
pub enum ApiError {
    /// No user identity was supplied.
    #[display("Missing user identity")]
    MissingIdentity,
    /// The query string or body could not be decoded.
    #[display("Malformed request: {_0}")]
    Malformed(#[error(not(source))] String),
    /// The engine rejected or failed the move.
    #[display("{_0}")]
    Engine(EngineError),
    /// The store failed outside a move.
    #[display("{_0}")]
    Store(StoreError),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::Engine(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Malformed(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingIdentity | ApiError::Malformed(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Engine(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }
        let body = ErrorBody {
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Builds the router with request logging.
pub fn router<S: GameStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/game/play", post(play::<S>))
        .route("/users/login", post(login::<S>))
        .with_state(state)
        .layer(ServiceBuilder::new().map_request(|req: Request<axum::body::Body>| {
            info!(
                method = %req.method(),
                uri = %req.uri(),
                "Incoming HTTP request"
            );
            req
        }))
}

/// Plays one turn for the user named in the `Authorization` header.
#[instrument(skip_all)]
async fn play<S: GameStore + 'static>(
    State(state): State<AppState<S>>,
    query: Result<Query<PlayQuery>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveOutcome>, ApiError> {
    let Query(query) = query?;
    let Json(request) = body?;
    let user = user_from_headers(&headers)?;
    debug!(
        user = %user,
        difficulty = %query.difficulty,
        row = request.row,
        column = request.column,
        "Play request"
    );

    let _session = state.sessions.acquire(&user).await;
    let outcome = state
        .engine
        .handle_move(&user, &query.difficulty, request)
        .await?;
    debug!(user = %user, "Move handled");
    Ok(Json(outcome))
}

/// Finds or creates the user and returns their profile.
#[instrument(skip_all)]
async fn login<S: GameStore + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<UserProfile>, ApiError> {
    let Json(body) = body?;
    let email = body.email.trim();
    if email.is_empty() {
        return Err(ApiError::MissingIdentity);
    }
    let user = UserId::from(email);

    let _session = state.sessions.acquire(&user).await;
    let profile = state.engine.store().load_profile(&user).await?;
    info!(user = %user, games_played = profile.statistics().games_played, "User logged in");
    Ok(Json(profile))
}

/// Reads the opaque user identity from the `Authorization` header.
fn user_from_headers(headers: &HeaderMap) -> Result<UserId, ApiError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(UserId::from)
        .ok_or(ApiError::MissingIdentity)
}
