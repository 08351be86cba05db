use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::common::{ActorId, AuthError, DomainError, Identity, Role};

/// Header carrying the caller's UUID, set by the identity collaborator
pub const ACTOR_ID_HEADER: &str = "x-actor-id";

/// Header carrying the caller's role
pub const ACTOR_ROLE_HEADER: &str = "x-actor-role";

/// Identity middleware
///
/// Reads the identity headers and adds the `Identity` to request extensions.
/// Missing or malformed headers leave the request anonymous (public access).
pub async fn identity_middleware(
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    match extract_identity(request.headers()) {
        Some(identity) => {
            debug!(actor_id = %identity.actor_id, role = %identity.role, "Identified caller");
            request.extensions_mut().insert(identity);
        }
        None => debug!("Anonymous request"),
    }

    next.run(request).await
}

fn extract_identity(headers: &HeaderMap) -> Option<Identity> {
    let actor_id = headers.get(ACTOR_ID_HEADER)?.to_str().ok()?;
    let role = headers.get(ACTOR_ROLE_HEADER)?.to_str().ok()?;

    Some(Identity {
        actor_id: ActorId::parse(actor_id).ok()?,
        role: role.parse::<Role>().ok()?,
    })
}

/// Extractor for handlers that need a caller. Rejects anonymous requests.
#[derive(Debug, Clone, Copy)]
pub struct RequireIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for RequireIdentity
where
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(RequireIdentity)
            .ok_or_else(|| AuthError::IdentityRequired.into())
    }
}

/// Extractor for handlers open to anonymous callers
#[derive(Debug, Clone, Copy)]
pub struct MaybeIdentity(pub Option<Identity>);

#[async_trait]
impl<S> FromRequestParts<S> for MaybeIdentity
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeIdentity(parts.extensions.get::<Identity>().copied()))
    }
}
