//! Caller identity.
//!
//! Authentication happens at the gateway, which forwards the authenticated
//! user and company as `x-user-id` and `x-company-id` headers. Every plan
//! route requires both.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use madori_core::logging;
use uuid::Uuid;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const COMPANY_ID_HEADER: &str = "x-company-id";

/// Authenticated caller, scoped to one company.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub company_id: Uuid,
}

fn header_uuid(parts: &Parts, name: &str) -> Result<Uuid, ApiError> {
    let value = parts
        .headers
        .get(name)
        .ok_or_else(|| ApiError::Unauthorized(format!("Missing {} header", name)))?;
    value
        .to_str()
        .ok()
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| ApiError::Unauthorized(format!("Invalid {} header", name)))
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal {
            user_id: header_uuid(parts, USER_ID_HEADER)?,
            company_id: header_uuid(parts, COMPANY_ID_HEADER)?,
        };

        let span = tracing::Span::current();
        span.record(logging::USER_ID, tracing::field::display(principal.user_id));
        span.record(
            logging::COMPANY_ID,
            tracing::field::display(principal.company_id),
        );

        Ok(principal)
    }
}
