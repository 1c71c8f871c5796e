//! Data Transfer Objects for REST request/response serialization.

pub mod matchmaking_dto;

pub use matchmaking_dto::*;
