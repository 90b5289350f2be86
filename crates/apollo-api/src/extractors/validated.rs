//! Form and query extractors
//!
//! Rejections are turned into the `validation_failed` envelope instead of
//! axum's plain-text bodies.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Form,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// Form-encoded body, decoded but not validated
///
/// Used by nonce-protected endpoints, which check the nonce before
/// validating the rest of the form.
#[derive(Debug, Clone)]
pub struct FormBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for FormBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_form(e.body_text()))?;

        Ok(FormBody(value))
    }
}

/// Form-encoded body validated with the `validator` crate
#[derive(Debug, Clone)]
pub struct ValidatedForm<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let FormBody(value) = FormBody::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedForm(value))
    }
}

/// Query string with `validation_failed` rejections
#[derive(Debug, Clone)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;

        Ok(QueryParams(value))
    }
}
