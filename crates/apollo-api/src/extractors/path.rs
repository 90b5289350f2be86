//! Path parameter extractors
//!
//! Type-safe extraction of entity ids and relation kinds from path parameters.

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use apollo_core::{EntityId, RelationKind};
use serde::Deserialize;

use crate::response::ApiError;

fn parse_id(raw: &str) -> Result<EntityId, ApiError> {
    EntityId::parse(raw).map_err(|e| ApiError::invalid_path(format!("{raw}: {e}")))
}

fn parse_kind(raw: &str) -> Result<RelationKind, ApiError> {
    RelationKind::parse(raw)
        .ok_or_else(|| ApiError::invalid_path(format!("unknown relation kind: {raw}")))
}

/// A single `:id` segment
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub EntityId);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        parse_id(&raw).map(IdPath)
    }
}

/// A single `:kind` segment
#[derive(Debug, Clone, Copy)]
pub struct KindPath(pub RelationKind);

#[async_trait]
impl<S> FromRequestParts<S> for KindPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        parse_kind(&raw).map(KindPath)
    }
}

#[derive(Debug, Deserialize)]
struct RawRelationPath {
    kind: String,
    event_id: String,
}

/// `:kind/:event_id`
#[derive(Debug, Clone, Copy)]
pub struct RelationPath {
    pub kind: RelationKind,
    pub event_id: EntityId,
}

#[async_trait]
impl<S> FromRequestParts<S> for RelationPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<RawRelationPath>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_path(e.to_string()))?;

        Ok(RelationPath {
            kind: parse_kind(&raw.kind)?,
            event_id: parse_id(&raw.event_id)?,
        })
    }
}
