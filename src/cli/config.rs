use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::user::PublicUser;

const SESSION_FILE: &str = "session.json";

/// Saved login: which server, the bearer token, and who it belongs to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub base_url: String,
    pub token: String,
    pub user: PublicUser,
    pub saved_at: DateTime<Utc>,
}

impl Session {
    pub fn new(base_url: String, token: String, user: PublicUser) -> Self {
        Self {
            base_url,
            token,
            user,
            saved_at: Utc::now(),
        }
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("LEADBLOCKS_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("leadblocks")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Option<Session>> {
    load_session_from(&get_config_dir()?)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    save_session_to(&get_config_dir()?, session)
}

/// Remove the saved session. Returns whether one existed.
pub fn clear_session() -> anyhow::Result<bool> {
    clear_session_in(&get_config_dir()?)
}

pub fn load_session_from(dir: &Path) -> anyhow::Result<Option<Session>> {
    let session_file = dir.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(session_file)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(Some(session))
}

pub fn save_session_to(dir: &Path, session: &Session) -> anyhow::Result<()> {
    let session_file = dir.join(SESSION_FILE);

    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_file, content)?;
    Ok(())
}

pub fn clear_session_in(dir: &Path) -> anyhow::Result<bool> {
    let session_file = dir.join(SESSION_FILE);

    if !session_file.exists() {
        return Ok(false);
    }
    fs::remove_file(session_file)?;
    Ok(true)
}
