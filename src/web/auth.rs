use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use cookie::time::Duration as CookieDuration;
use rand_core::OsRng;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::PortalError,
    session::Session,
    web::{AppState, render_login_page},
};

pub const SESSION_COOKIE: &str = "portal_session";
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, Redirect> {
    if resolve_token(&state, &jar).await.is_some() {
        return Err(Redirect::to("/"));
    }

    Ok(Html(render_login_page(None)))
}

pub async fn process_login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), (StatusCode, Html<String>)> {
    let username = form.username.trim();

    let session = match authenticate(&state, username, &form.password).await {
        Ok(session) => session,
        Err(_) => {
            return Err((
                StatusCode::UNAUTHORIZED,
                Html(render_login_page(Some(
                    "Invalid username or password.",
                ))),
            ));
        }
    };

    let role = session.role.map(|r| r.as_str()).unwrap_or("");
    info!(username, role, "login");
    let token = state.create_session(session).await;

    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::days(SESSION_TTL_DAYS));

    let jar = jar.add(cookie);
    Ok((jar, Redirect::to("/")))
}

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut jar = jar;

    if let Some(token) = token_from_jar(&jar) {
        state.remove_session(token).await;
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");
    removal.set_http_only(true);
    removal.set_same_site(SameSite::Lax);
    removal.set_max_age(CookieDuration::seconds(0));
    jar = jar.remove(removal);

    (jar, Redirect::to("/?status=logged_out"))
}

/// Check credentials and build a fully-populated session.
///
/// Stored passwords are argon2 hashes; verification runs in constant
/// time regardless of which check fails.
pub async fn authenticate(
    state: &AppState,
    username: &str,
    password: &str,
) -> Result<Session, PortalError> {
    let user = state
        .lookup_user(username)
        .await
        .ok_or(PortalError::AuthFailure)?;

    if !verify_password(password, &user.password) {
        return Err(PortalError::AuthFailure);
    }

    let mut session = Session::default();
    session.login(username, user.role, &user.name);
    Ok(session)
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub fn token_from_jar(jar: &CookieJar) -> Option<Uuid> {
    let cookie = jar.get(SESSION_COOKIE)?;
    Uuid::parse_str(cookie.value()).ok()
}

async fn resolve_token(state: &AppState, jar: &CookieJar) -> Option<Session> {
    let token = token_from_jar(jar)?;
    state.session_for(token).await
}
