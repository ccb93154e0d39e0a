use axum::response::Redirect;
use axum_extra::extract::cookie::CookieJar;

use crate::{
    session::Session,
    web::{AppState, auth},
};

/// Resolve the caller's session from the cookie jar, falling back to the
/// anonymous guest session for missing, malformed, or expired tokens.
pub async fn current_session(state: &AppState, jar: &CookieJar) -> Session {
    let Some(token) = auth::token_from_jar(jar) else {
        return Session::default();
    };

    state.session_for(token).await.unwrap_or_default()
}

/// Admit only authenticated admins; everyone else is bounced to the
/// login page or the landing page.
pub async fn require_admin(state: &AppState, jar: &CookieJar) -> Result<Session, Redirect> {
    let session = current_session(state, jar).await;

    if !session.authenticated {
        return Err(Redirect::to("/login"));
    }

    if !session.is_admin() {
        return Err(Redirect::to("/?error=not_authorized"));
    }

    Ok(session)
}
