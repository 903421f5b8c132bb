use anyhow::{Context, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::AppConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(default, alias = "userId")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// Signed-in admin: the bearer token and who it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub user: AdminUser,
}

impl Session {
    pub fn display_name(&self) -> &str {
        if self.user.name.is_empty() {
            &self.user.email
        } else {
            &self.user.name
        }
    }
}

/// `session.json` in the data dir.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::at(AppConfig::session_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing or unreadable file means "signed out".
    pub fn load(&self) -> Option<Session> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring corrupt session file {:?}: {}", self.path, e);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session).context("Serializing session")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Writing {:?}", self.path))?;
        debug!("Session saved for {}", session.user.email);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)
                .with_context(|| format!("Removing {:?}", self.path))?;
        }
        Ok(())
    }

    pub fn token(&self) -> Option<String> {
        self.load()
            .map(|s| s.access_token)
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            access_token: "tok-123".into(),
            user: AdminUser {
                id: "u1".into(),
                name: "Priya".into(),
                email: "priya@example.in".into(),
                role: Some("ADMIN".into()),
            },
        }
    }

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::at(dir.path().join("data").join("session.json"));
        assert!(store.load().is_none());

        store.save(&session()).unwrap();
        assert_eq!(store.load(), Some(session()));
        assert_eq!(store.token().as_deref(), Some("tok-123"));

        store.clear().unwrap();
        assert!(store.token().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_is_signed_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(SessionStore::at(path).load().is_none());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut s = session();
        assert_eq!(s.display_name(), "Priya");
        s.user.name.clear();
        assert_eq!(s.display_name(), "priya@example.in");
    }
}
