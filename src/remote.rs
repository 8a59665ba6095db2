//! Authenticated key/value records and the single-retry-after-refresh policy.
//!
//! The store and the auth service are collaborators; callers hand them in
//! explicitly instead of reading them from ambient state.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use tracing::warn;

pub const CHATS_ROOT: &str = "user_chats";
pub const PROFILES_ROOT: &str = "user_data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub id_token: String,
    pub refresh_token: String,
}

/// Small JSON documents addressed by slash-separated paths
pub trait KeyValueStore {
    async fn get(&self, path: &str, token: &str) -> Result<Option<Value>>;

    async fn set(&self, path: &str, value: &Value, token: &str) -> Result<()>;
}

pub trait SessionRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<Session>;
}

/// Run `op` with the current session. If it fails, refresh the session once,
/// store the renewed session, and run `op` one more time.
pub async fn with_refresh_retry<T, Op, OpFut, Refresh, RefreshFut>(
    session: &mut Session,
    mut op: Op,
    refresh: Refresh,
) -> Result<T>
where
    Op: FnMut(Session) -> OpFut,
    OpFut: Future<Output = Result<T>>,
    Refresh: FnOnce(String) -> RefreshFut,
    RefreshFut: Future<Output = Result<Session>>,
{
    let first_error = match op(session.clone()).await {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    warn!(user_id = %session.user_id, error = %first_error, "remote write failed, refreshing session");

    let renewed = refresh(session.refresh_token.clone())
        .await
        .context("Session expired and could not be refreshed")?;
    *session = renewed;

    op(session.clone())
        .await
        .context("Remote write failed again after session refresh")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub state: String,
    pub district: String,
    pub month: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            state: "Select State".to_string(),
            district: "Select a state first".to_string(),
            month: current_month(),
        }
    }
}

/// Soil nutrients in kg/ha, pH, and rainfall in mm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Soil {
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub ph: f64,
    pub rainfall: f64,
}

impl Default for Soil {
    fn default() -> Self {
        Self {
            n: 50.0,
            p: 25.0,
            k: 25.0,
            ph: 6.5,
            rainfall: 100.0,
        }
    }
}

/// Stored profiles may lack any field; missing parts fall back to defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmProfile {
    pub location: Location,
    pub soil: Soil,
}

fn current_month() -> String {
    time::OffsetDateTime::now_local()
        .unwrap_or_else(|_| time::OffsetDateTime::now_utc())
        .month()
        .to_string()
}

/// Per-user documents: chat history and farm profile
pub struct UserRecords<S, R> {
    store: S,
    refresher: R,
}

impl<S: KeyValueStore, R: SessionRefresher> UserRecords<S, R> {
    pub fn new(store: S, refresher: R) -> Self {
        Self { store, refresher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn chats_path(session: &Session) -> String {
        format!("{}/{}", CHATS_ROOT, session.user_id)
    }

    fn profile_path(session: &Session) -> String {
        format!("{}/{}", PROFILES_ROOT, session.user_id)
    }

    async fn write(&self, session: &mut Session, path: &str, value: Value) -> Result<()> {
        let store = &self.store;
        let refresher = &self.refresher;
        let value = &value;
        with_refresh_retry(
            session,
            move |current: Session| async move { store.set(path, value, &current.id_token).await },
            move |refresh_token: String| async move { refresher.refresh(&refresh_token).await },
        )
        .await
        .with_context(|| format!("Failed to write {}", path))
    }

    /// Missing history reads as an empty conversation
    pub async fn load_chat_history(&self, session: &Session) -> Result<Vec<ChatMessage>> {
        let path = Self::chats_path(session);
        let value = self.store.get(&path, &session.id_token).await
            .with_context(|| format!("Failed to load {}", path))?;

        match value {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value)
                .with_context(|| format!("Malformed chat history at {}", path)),
        }
    }

    pub async fn save_chat_history(&self, session: &mut Session, messages: &[ChatMessage]) -> Result<()> {
        let path = Self::chats_path(session);
        let value = serde_json::to_value(messages)?;
        self.write(session, &path, value).await
    }

    pub async fn clear_chat_history(&self, session: &mut Session) -> Result<()> {
        self.save_chat_history(session, &[]).await
    }

    /// Missing profile reads as the default profile
    pub async fn load_profile(&self, session: &Session) -> Result<FarmProfile> {
        let path = Self::profile_path(session);
        let value = self.store.get(&path, &session.id_token).await
            .with_context(|| format!("Failed to load {}", path))?;

        match value {
            None | Some(Value::Null) => Ok(FarmProfile::default()),
            Some(value) => serde_json::from_value(value)
                .with_context(|| format!("Malformed farm profile at {}", path)),
        }
    }

    pub async fn save_profile(&self, session: &mut Session, profile: &FarmProfile) -> Result<()> {
        let path = Self::profile_path(session);
        let value = serde_json::to_value(profile)?;
        self.write(session, &path, value).await
    }
}
