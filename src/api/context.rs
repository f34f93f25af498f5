//! Caller context extraction.
//!
//! Authentication itself lives in an external collaborator; by the time
//! a request reaches this API it carries the verified caller identity in
//! headers. This extractor turns those headers into the tenant scope
//! threaded through every store operation.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::models::{TenantId, TenantScope};

use super::response::{ApiError, ApiErrorResponse};

/// Header carrying the caller's tenant identifier.
const TENANT_HEADER: &str = "x-tenant-id";
/// Header carrying the caller's role.
const ROLE_HEADER: &str = "x-role";
/// The role allowed to operate without tenant restriction.
const ADMIN_ROLE: &str = "admin";

/// The authenticated caller's visibility.
#[derive(Debug, Clone, Copy)]
pub struct CallerContext {
    /// Tenant scope applied to every store operation in the request.
    pub scope: TenantScope,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CallerContext
where
    S: Send + Sync,
{
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let role = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok());
        if role == Some(ADMIN_ROLE) {
            return Ok(CallerContext {
                scope: TenantScope::Unrestricted,
            });
        }

        let tenant = parts
            .headers
            .get(TENANT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok());
        match tenant {
            Some(id) => Ok(CallerContext {
                scope: TenantScope::Tenant(TenantId(id)),
            }),
            None => Err(ApiErrorResponse {
                status: StatusCode::UNAUTHORIZED,
                error: ApiError::new(
                    "UNAUTHENTICATED",
                    "Caller identity headers are missing or invalid",
                ),
            }),
        }
    }
}
