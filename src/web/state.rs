use std::{collections::HashMap, sync::Arc};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    config::PortalConfig,
    credentials::{self, User},
    records::RecordStore,
    session::Session,
    web::SESSION_TTL_DAYS,
};

struct SessionEntry {
    session: Session,
    expires_at: DateTime<Utc>,
}

/// Shared application state handed to every handler.
///
/// Credentials are loaded once at startup and cached behind a lock with an
/// explicit [`AppState::reload_credentials`] hook. Sessions live in
/// process memory keyed by the cookie token; restarting the server logs
/// everyone out, which is acceptable for this portal.
#[derive(Clone)]
pub struct AppState {
    config: PortalConfig,
    credentials: Arc<RwLock<HashMap<String, User>>>,
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
    store: RecordStore,
}

impl AppState {
    pub fn new(config: PortalConfig) -> Self {
        let users = credentials::load_users(&config.users_file);
        let store = RecordStore::new(&config.data_dir);

        Self {
            config,
            credentials: Arc::new(RwLock::new(users)),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            store,
        }
    }

    /// Write the starter credential file if none exists, then pick it up.
    pub async fn ensure_seed_users(&self) -> Result<()> {
        credentials::ensure_seed_users(&self.config.users_file)
            .context("failed to seed credential file")?;
        self.reload_credentials().await;
        Ok(())
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub async fn lookup_user(&self, username: &str) -> Option<User> {
        let guard = self.credentials.read().await;
        guard.get(username).cloned()
    }

    /// Re-read the credential file. Exposed for operators and tests.
    pub async fn reload_credentials(&self) {
        let latest = credentials::load_users(&self.config.users_file);
        let mut guard = self.credentials.write().await;
        *guard = latest;
    }

    pub async fn create_session(&self, session: Session) -> Uuid {
        let token = Uuid::new_v4();
        let entry = SessionEntry {
            session,
            expires_at: Utc::now() + ChronoDuration::days(SESSION_TTL_DAYS),
        };
        let mut guard = self.sessions.write().await;
        guard.insert(token, entry);
        token
    }

    /// Resolve a cookie token to its session. Unknown or expired tokens
    /// resolve to `None`; callers fall back to the guest session.
    pub async fn session_for(&self, token: Uuid) -> Option<Session> {
        let guard = self.sessions.read().await;
        let entry = guard.get(&token)?;
        if entry.expires_at <= Utc::now() {
            return None;
        }
        Some(entry.session.clone())
    }

    pub async fn remove_session(&self, token: Uuid) {
        let mut guard = self.sessions.write().await;
        guard.remove(&token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::Role;
    use tempfile::TempDir;

    fn state(dir: &TempDir) -> AppState {
        let config = PortalConfig {
            port: 0,
            users_file: dir.path().join("users.yaml"),
            data_dir: dir.path().join("data"),
            content_dir: dir.path().join("content"),
        };
        AppState::new(config)
    }

    #[tokio::test]
    async fn sessions_round_trip() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);

        let mut session = Session::default();
        session.login("user1", Role::User, "First User");
        let token = state.create_session(session.clone()).await;

        assert_eq!(state.session_for(token).await, Some(session));

        state.remove_session(token).await;
        assert_eq!(state.session_for(token).await, None);
    }

    #[tokio::test]
    async fn unknown_token_resolves_to_none() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        assert_eq!(state.session_for(Uuid::new_v4()).await, None);
    }

    #[tokio::test]
    async fn reload_picks_up_credential_changes() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        assert!(state.lookup_user("user1").await.is_none());

        std::fs::write(
            dir.path().join("users.yaml"),
            "users:\n  user1:\n    password: hash\n    role: user\n    name: First User\n",
        )
        .unwrap();
        state.reload_credentials().await;

        let user = state.lookup_user("user1").await.unwrap();
        assert_eq!(user.name, "First User");
    }

    #[tokio::test]
    async fn seed_then_lookup_admin() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir);
        state.ensure_seed_users().await.unwrap();
        assert!(state.lookup_user("admin1").await.is_some());
    }
}
