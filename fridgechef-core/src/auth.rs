//! Token session: single owner of the access/refresh token pair.
//!
//! The backend issues a bearer access token plus a refresh token at login.
//! Everything that needs a token goes through [`Session`], which is injected
//! into the HTTP transport; nothing else reads or writes token storage.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex as StdMutex;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// The token pair issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Persistence for the token pair.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> io::Result<Option<Tokens>>;
    fn save(&self, tokens: &Tokens) -> io::Result<()>;
    fn clear(&self) -> io::Result<()>;
}

/// Token store backed by a JSON file (the CLI analogue of browser storage).
pub struct DiskTokenStore {
    path: PathBuf,
}

impl DiskTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl TokenStore for DiskTokenStore {
    fn load(&self) -> io::Result<Option<Tokens>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(tokens) => Ok(Some(tokens)),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable token file");
                    Ok(None)
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&self, tokens: &Tokens) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(tokens)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, contents)
    }

    fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// In-memory token store for tests.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: StdMutex<Option<Tokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: Tokens) -> Self {
        Self {
            tokens: StdMutex::new(Some(tokens)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> io::Result<Option<Tokens>> {
        Ok(self.tokens.lock().unwrap().clone())
    }

    fn save(&self, tokens: &Tokens) -> io::Result<()> {
        *self.tokens.lock().unwrap() = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> io::Result<()> {
        *self.tokens.lock().unwrap() = None;
        Ok(())
    }
}

/// Thread-safe holder of the current token pair.
///
/// The mutex also serializes refresh-and-replay within this process; a
/// refresh race between separate processes is accepted, as in the original
/// client.
pub struct Session {
    store: Box<dyn TokenStore>,
    tokens: Mutex<Option<Tokens>>,
}

impl Session {
    /// Create a session, loading any persisted tokens from the store.
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        let tokens = match store.load() {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load stored tokens");
                None
            }
        };
        Self {
            store,
            tokens: Mutex::new(tokens),
        }
    }

    pub async fn access_token(&self) -> Option<String> {
        self.tokens
            .lock()
            .await
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .lock()
            .await
            .as_ref()
            .map(|t| t.refresh_token.clone())
    }

    pub async fn is_logged_in(&self) -> bool {
        self.tokens.lock().await.is_some()
    }

    /// Store a new token pair (login, signup auto-login).
    pub async fn set_tokens(&self, tokens: Tokens) -> io::Result<()> {
        let mut guard = self.tokens.lock().await;
        self.store.save(&tokens)?;
        *guard = Some(tokens);
        Ok(())
    }

    /// Replace only the access token, keeping the refresh token (refresh flow).
    pub async fn replace_access_token(&self, access_token: String) -> io::Result<()> {
        let mut guard = self.tokens.lock().await;
        if let Some(tokens) = guard.as_mut() {
            tokens.access_token = access_token;
            self.store.save(tokens)?;
        }
        Ok(())
    }

    /// Drop the token pair (logout, account deletion, failed refresh).
    pub async fn clear(&self) -> io::Result<()> {
        let mut guard = self.tokens.lock().await;
        *guard = None;
        self.store.clear()
    }
}
