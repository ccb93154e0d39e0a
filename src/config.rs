use std::{env, path::PathBuf};

/// Runtime configuration, collected from the environment once at startup.
/// `.env` files are honored by `main` before this is read.
#[derive(Clone, Debug)]
pub struct PortalConfig {
    pub port: u16,
    pub users_file: PathBuf,
    pub data_dir: PathBuf,
    pub content_dir: PathBuf,
}

impl PortalConfig {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        Self {
            port,
            users_file: path_from_env("PORTAL_USERS_FILE", "users.yaml"),
            data_dir: path_from_env("PORTAL_DATA_DIR", "data"),
            content_dir: path_from_env("PORTAL_CONTENT_DIR", "content"),
        }
    }

    /// Base directory for a named content tier under the content root.
    pub fn tier_dir(&self, tier_name: &str) -> PathBuf {
        self.content_dir.join(tier_name)
    }
}

fn path_from_env(key: &str, default: &str) -> PathBuf {
    env::var(key)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_dir_joins_under_content_root() {
        let config = PortalConfig {
            port: 8080,
            users_file: PathBuf::from("users.yaml"),
            data_dir: PathBuf::from("data"),
            content_dir: PathBuf::from("content"),
        };
        assert_eq!(config.tier_dir("public"), PathBuf::from("content/public"));
    }
}
