use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::{
    error::{AppError, Result},
    models::Actor,
    utils::jwt,
};

/// Resolves the authenticated seller from the `Authorization: Bearer` header.
/// Handlers take `Option<CurrentSeller>` and hand the actor to the service,
/// which decides whether an anonymous caller is acceptable (it never is for
/// seller routes).
pub struct CurrentSeller(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentSeller
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|header| header.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Unauthorized("Invalid token format".to_string()))?;

        let claims = jwt::verify_token(token)?;

        let id = claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()))?;

        Ok(CurrentSeller(Actor {
            id,
            email: claims.email,
        }))
    }
}
