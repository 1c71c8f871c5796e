//! Polling matchmaking handlers: join/leave and the lobby snapshot.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{
    JoinResponse, LeaveResponse, LobbyEntryDto, LobbySnapshotResponse, MatchmakingRequest,
    MatchmakingResponse,
};
use crate::app_state::AppState;
use crate::error::{BrokerError, ErrorResponse};

/// `POST /api/matchmaking`: Join or leave the polling lobby.
///
/// # Errors
///
/// Returns [`BrokerError`] on a malformed body, an email outside the
/// admission domain, or an unknown action. The email is checked first.
#[utoipa::path(
    post,
    path = "/api/matchmaking",
    tag = "Matchmaking",
    summary = "Join or leave the lobby",
    description = "With `action = \"join\"` the email is added to the lobby (or refreshed) and matched with the longest-waiting other email. With `action = \"leave\"` the email is removed.",
    request_body = MatchmakingRequest,
    responses(
        (status = 200, description = "Action applied", body = MatchmakingResponse),
        (status = 400, description = "Invalid email, action, or body", body = ErrorResponse),
    )
)]
pub async fn matchmaking_handler(
    State(state): State<AppState>,
    payload: Result<Json<MatchmakingRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BrokerError> {
    let Json(req) = payload.map_err(|rejection| BrokerError::InvalidRequest(rejection.body_text()))?;

    let response = match req.action.as_str() {
        "join" => {
            let outcome = state.lobby.join(&req.email).await?;
            MatchmakingResponse::Join(JoinResponse::from(outcome))
        }
        "leave" => {
            state.lobby.leave(&req.email).await?;
            MatchmakingResponse::Leave(LeaveResponse {
                success: true,
                message: "Left waiting pool".to_string(),
            })
        }
        other => {
            if !state.lobby.accepts(&req.email) {
                return Err(BrokerError::InvalidEmail(req.email));
            }
            return Err(BrokerError::InvalidAction(other.to_string()));
        }
    };

    Ok((StatusCode::OK, Json(response)))
}

/// `GET /api/matchmaking`: Current lobby contents.
#[utoipa::path(
    get,
    path = "/api/matchmaking",
    tag = "Matchmaking",
    summary = "Lobby snapshot",
    description = "Returns every waiting email with its last join time, in match order.",
    responses(
        (status = 200, description = "Lobby snapshot", body = LobbySnapshotResponse),
    )
)]
pub async fn lobby_snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    let waiting_users: Vec<LobbyEntryDto> = state
        .lobby
        .snapshot()
        .await
        .into_iter()
        .map(LobbyEntryDto::from)
        .collect();

    (
        StatusCode::OK,
        Json(LobbySnapshotResponse {
            waiting_count: waiting_users.len(),
            waiting_users,
        }),
    )
}

/// Matchmaking routes, relative to `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/matchmaking",
        get(lobby_snapshot_handler).post(matchmaking_handler),
    )
}
