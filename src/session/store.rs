use super::token::{decode_claims, Claims};
use crate::{api::ApiClient, error::Result};
use parking_lot::Mutex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{info, warn};

/// Fixed key the bearer token is persisted under.
pub const TOKEN_KEY: &str = "token";

/// Durable storage for the bearer token.
pub trait TokenStore: Send {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Stores the token as a single file named [`TOKEN_KEY`] inside `dir`.
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(TOKEN_KEY)
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let p = self.path();
        if !p.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&p)?;
        let tok = raw.trim();
        Ok((!tok.is_empty()).then(|| tok.to_string()))
    }

    fn save(&self, token: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        write_private(&self.path(), token)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let p = self.path();
        if p.exists() {
            fs::remove_file(p)?;
        }
        Ok(())
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;
    let mut f = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    f.write_all(contents.as_bytes())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &str) -> std::io::Result<()> {
    fs::write(path, contents)
}

/// In-memory store; clones share the same slot.
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }

    pub fn peek(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.peek())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot.lock() = None;
        Ok(())
    }
}

/// Snapshot of who is logged in.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub username: Option<String>,
    /// True only while the persisted token is being read. `SessionStore::open`
    /// reads synchronously, so every session a caller sees has this `false`.
    pub loading: bool,
    claims: Option<Claims>,
}

impl Session {
    fn from_token(token: Option<String>) -> Self {
        let claims = token.as_deref().and_then(decode_claims);
        let username = claims
            .as_ref()
            .and_then(|c| c.sub.clone())
            .filter(|s| !s.is_empty());
        Self {
            token,
            username,
            loading: false,
            claims,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The token's `exp` claim, unix seconds. Informational only.
    pub fn expires_at(&self) -> Option<i64> {
        self.claims.as_ref().and_then(|c| c.exp)
    }
}

/// Owns the session for the lifetime of the client. Created once with
/// [`SessionStore::open`] and passed to whatever needs it.
pub struct SessionStore {
    store: Box<dyn TokenStore>,
    session: Session,
}

impl SessionStore {
    /// Read the persisted token. Unreadable storage counts as logged out.
    pub fn open(store: impl TokenStore + 'static) -> Self {
        let token = match store.load() {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "could not read persisted token");
                None
            }
        };
        let session = Session::from_token(token);
        if session.token.is_some() && session.username.is_none() {
            warn!("persisted token does not decode; identity unknown");
        }
        Self {
            store: Box::new(store),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    pub fn login(&mut self, api: &ApiClient, username: &str, password: &str) -> Result<()> {
        let token = api.login(username, password)?;
        self.adopt(token)
    }

    pub fn register(
        &mut self,
        api: &ApiClient,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<()> {
        let token = api.register(username, email, password)?;
        self.adopt(token)
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "could not remove persisted token");
        }
        self.session = Session::from_token(None);
        info!("logged out");
    }

    fn adopt(&mut self, token: String) -> Result<()> {
        self.store.save(&token)?;
        self.session = Session::from_token(Some(token));
        info!(user = ?self.session.username, "session authenticated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::token::make_token;
    use tempfile::tempdir;

    #[test]
    fn open_reads_persisted_identity() {
        let mem = MemoryTokenStore::with_token(make_token(r#"{"sub":"carol"}"#));
        let s = SessionStore::open(mem);
        assert!(!s.session().loading);
        assert_eq!(s.session().username.as_deref(), Some("carol"));
    }

    #[test]
    fn corrupt_token_keeps_no_identity() {
        let s = SessionStore::open(MemoryTokenStore::with_token("garbage"));
        assert_eq!(s.token(), Some("garbage"));
        assert!(s.session().username.is_none());
    }

    #[test]
    fn logout_clears_store_and_session() {
        let mem = MemoryTokenStore::with_token(make_token(r#"{"sub":"dan"}"#));
        let mut s = SessionStore::open(mem.clone());
        s.logout();
        assert!(mem.peek().is_none());
        assert!(!s.session().is_authenticated());
        assert!(s.session().username.is_none());
    }

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempdir().unwrap();
        let fs_store = FileTokenStore::new(dir.path().join("nested"));
        assert_eq!(fs_store.load().unwrap(), None);
        fs_store.save("abc.def.ghi").unwrap();
        assert_eq!(fs_store.load().unwrap().as_deref(), Some("abc.def.ghi"));
        fs_store.clear().unwrap();
        assert!(!fs_store.path().exists());
        fs_store.clear().unwrap();
    }
}
