//! OpenAPI document for the REST surface.

use utoipa::OpenApi;

use crate::api::dto::{
    JoinResponse, LeaveResponse, LobbyEntryDto, LobbySnapshotResponse, MatchmakingRequest,
    MatchmakingResponse,
};
use crate::api::handlers::{matchmaking, system};
use crate::error::{ErrorBody, ErrorResponse};
use crate::service::BrokerStats;

/// Generated OpenAPI specification, served at `/api-docs/openapi.json`.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "meet-broker", description = "Matchmaking and signaling broker"),
    paths(
        system::health_handler,
        system::stats_handler,
        matchmaking::matchmaking_handler,
        matchmaking::lobby_snapshot_handler,
    ),
    components(schemas(
        system::HealthResponse,
        BrokerStats,
        MatchmakingRequest,
        MatchmakingResponse,
        JoinResponse,
        LeaveResponse,
        LobbyEntryDto,
        LobbySnapshotResponse,
        ErrorResponse,
        ErrorBody,
    )),
    tags(
        (name = "System", description = "Health and counters"),
        (name = "Matchmaking", description = "Polling lobby"),
    )
)]
pub struct ApiDoc;
