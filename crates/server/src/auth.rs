//! Bearer token authentication.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use engine::{Engine, EngineError, User};

use crate::{AuthFailure, ServerError, server::ServerState};

/// Maps an opaque bearer token to the user it was issued to.
pub trait IdentityResolver: Send + Sync {
    fn resolve(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<User>, EngineError>> + Send;
}

impl IdentityResolver for Engine {
    fn resolve(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Option<User>, EngineError>> + Send {
        self.user_by_token(token)
    }
}

/// Puts the caller's [`User`] in the request extensions.
pub(crate) async fn auth(
    auth_header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(Authorization(bearer))) = auth_header else {
        return Err(ServerError::Unauthorized(AuthFailure::MissingToken));
    };
    let token = bearer.token().trim();
    if token.is_empty() {
        return Err(ServerError::Unauthorized(AuthFailure::MissingToken));
    }

    let Some(user) = state.engine.resolve(token).await? else {
        tracing::warn!("rejected request with unknown bearer token");
        return Err(ServerError::Unauthorized(AuthFailure::InvalidToken));
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
