use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{
    auth::{error::AuthError, read_session_token},
    error::Error,
    model::UserId,
    state::SharedAppState,
};

/// Rejects the request with 401 unless it carries a live session cookie.
/// The handler behind it finds the caller as an `Extension<UserId>`.
#[tracing::instrument(name = "[MIDDLEWARE] session auth", skip_all)]
pub async fn session_auth_middleware(
    State(app_state): State<SharedAppState>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, Error> {
    let token = match read_session_token(req.headers(), &app_state.config.session.cookie_name) {
        Some(token) => token,
        None => {
            return Err(Error::Auth(AuthError::Unauthenticated));
        }
    };

    let user_id = app_state.sessions.validate_session(&token).await?;

    req.extensions_mut().insert(UserId(user_id));

    Ok(next.run(req).await)
}
