use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::access::Role;

/// A configured account. The `password` field holds an argon2 PHC hash
/// string, not the plaintext; see `web::auth` for hashing and
/// verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub password: String,
    pub role: Role,
    pub name: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct UsersFile {
    #[serde(default)]
    users: HashMap<String, User>,
}

/// Load the credential file. Accounts are read-only for the process
/// lifetime; `AppState` caches the result and exposes an explicit reload.
///
/// A missing or malformed file degrades to an empty map with a logged
/// warning so the portal still serves public content.
pub fn load_users(path: &Path) -> HashMap<String, User> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            warn!(?err, path = %path.display(), "credential file unavailable");
            return HashMap::new();
        }
    };

    match serde_yaml::from_str::<UsersFile>(&text) {
        Ok(file) => file.users,
        Err(err) => {
            warn!(?err, path = %path.display(), "failed to parse credential file");
            HashMap::new()
        }
    }
}

/// Write a starter credential file with a single admin account when none
/// exists yet, so a fresh deployment is reachable.
pub fn ensure_seed_users(path: &Path) -> Result<()> {
    if path.exists() {
        return Ok(());
    }

    let password = crate::web::auth::hash_password("change-me")
        .map_err(|err| anyhow!("failed to hash seed admin password: {err}"))?;

    let mut users = HashMap::new();
    users.insert(
        "admin1".to_string(),
        User {
            password,
            role: Role::Admin,
            name: "Site Admin".to_string(),
        },
    );

    let text = serde_yaml::to_string(&UsersFile { users })
        .context("failed to serialize seed credential file")?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create credential directory {}", parent.display())
            })?;
        }
    }
    std::fs::write(path, text)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!("Seeded default admin user 'admin1' (password: 'change-me'). Update it promptly.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn loads_users_mapping() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.yaml");
        std::fs::write(
            &path,
            concat!(
                "users:\n",
                "  user1:\n",
                "    password: not-a-real-hash\n",
                "    role: user\n",
                "    name: First User\n",
                "  special1:\n",
                "    password: not-a-real-hash\n",
                "    role: special\n",
                "    name: Special User\n",
            ),
        )
        .unwrap();

        let users = load_users(&path);
        assert_eq!(users.len(), 2);
        assert_eq!(users["user1"].role, Role::User);
        assert_eq!(users["special1"].name, "Special User");
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let users = load_users(&dir.path().join("absent.yaml"));
        assert!(users.is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.yaml");
        std::fs::write(&path, "users: [not, a, mapping]").unwrap();
        assert!(load_users(&path).is_empty());
    }

    #[test]
    fn seed_creates_verifiable_admin() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.yaml");

        ensure_seed_users(&path).unwrap();
        let users = load_users(&path);
        let admin = &users["admin1"];
        assert_eq!(admin.role, Role::Admin);
        assert!(crate::web::auth::verify_password("change-me", &admin.password));
    }

    #[test]
    fn seed_leaves_existing_file_alone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("users.yaml");
        std::fs::write(&path, "users: {}\n").unwrap();

        ensure_seed_users(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "users: {}\n");
    }
}
