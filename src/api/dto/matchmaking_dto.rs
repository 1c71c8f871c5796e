//! DTOs for the polling matchmaking endpoint.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{LobbyEntry, LobbyOutcome};

/// Request body for `POST /api/matchmaking`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MatchmakingRequest {
    /// Participant email.
    #[serde(default)]
    pub email: String,
    /// `"join"` or `"leave"`.
    #[serde(default)]
    pub action: String,
}

/// Response to a `join` action.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JoinResponse {
    /// Whether a partner was found.
    pub matched: bool,
    /// Room shared with the partner (only when matched).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_name: Option<String>,
    /// Partner email (only when matched).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partner_email: Option<String>,
    /// Status text (only while waiting).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<LobbyOutcome> for JoinResponse {
    fn from(outcome: LobbyOutcome) -> Self {
        match outcome {
            LobbyOutcome::Waiting => Self {
                matched: false,
                room_name: None,
                partner_email: None,
                message: Some("Waiting for a partner...".to_string()),
            },
            LobbyOutcome::Matched {
                room_name,
                partner_email,
            } => Self {
                matched: true,
                room_name: Some(room_name),
                partner_email: Some(partner_email),
                message: None,
            },
        }
    }
}

/// Response to a `leave` action.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveResponse {
    /// Always `true`; leaving is idempotent.
    pub success: bool,
    /// Status text.
    pub message: String,
}

/// Response for either action.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum MatchmakingResponse {
    /// Result of `join`.
    Join(JoinResponse),
    /// Result of `leave`.
    Leave(LeaveResponse),
}

/// One waiting email in the debug snapshot.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LobbyEntryDto {
    /// Waiting email.
    pub email: String,
    /// Last join time, epoch milliseconds.
    pub timestamp: i64,
}

impl From<LobbyEntry> for LobbyEntryDto {
    fn from(entry: LobbyEntry) -> Self {
        Self {
            email: entry.email,
            timestamp: entry.joined_at.timestamp_millis(),
        }
    }
}

/// Response for `GET /api/matchmaking`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LobbySnapshotResponse {
    /// Number of waiting emails.
    pub waiting_count: usize,
    /// Waiting emails in match order.
    pub waiting_users: Vec<LobbyEntryDto>,
}
