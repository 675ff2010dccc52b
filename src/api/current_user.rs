use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::models::Batch;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_BATCH_HEADER: &str = "x-user-batch";

/// Caller identity as forwarded by the authenticating gateway in front of
/// this service. Squad and batch membership are resolved upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub batch: Batch,
}

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| AppError::Unauthenticated(format!("missing {USER_ID_HEADER} header")))?;
        let batch = header(parts, USER_BATCH_HEADER)
            .ok_or_else(|| AppError::Unauthenticated(format!("missing {USER_BATCH_HEADER} header")))?
            .parse::<Batch>()
            .map_err(AppError::BadRequest)?;

        Ok(Self {
            id: id.to_string(),
            batch,
        })
    }
}
