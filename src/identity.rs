// src/identity.rs

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};

use crate::{error::ClientError, models::user::User};

/// Source of the signed-in identity.
/// Components receive one at construction instead of reading storage themselves.
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<User>;

    fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|u| u.is_admin)
    }
}

/// Identity provider for anonymous use.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user(&self) -> Option<User> {
        None
    }
}

/// Signed-in identity, persisted as JSON so it survives restarts.
///
/// Loaded once on startup with [`SessionStore::load`], written on sign-in and
/// removed on sign-out. Clones share the same state.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
    user: Arc<RwLock<Option<User>>>,
}

impl SessionStore {
    /// Store that never touches the filesystem.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            user: Arc::new(RwLock::new(None)),
        }
    }

    /// Reads the persisted identity from `path`.
    ///
    /// A missing file means nobody is signed in. A corrupt file is discarded
    /// with a warning rather than failing startup.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();

        let user = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => {
                    tracing::debug!("Restored session for {}", user.username);
                    Some(user)
                }
                Err(e) => {
                    tracing::warn!("Discarding unreadable session file {:?}: {}", path, e);
                    None
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path: Some(path),
            user: Arc::new(RwLock::new(user)),
        })
    }

    pub fn sign_in(&self, user: User) -> Result<(), ClientError> {
        if let Some(path) = &self.path {
            let raw = serde_json::to_string_pretty(&user)?;
            fs::write(path, raw)?;
        }
        tracing::info!("Signed in as {}", user.username);
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user);
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), ClientError> {
        let previous = self
            .user
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }

        if let Some(user) = previous {
            tracing::info!("Signed out {}", user.username);
        }
        Ok(())
    }
}

impl IdentityProvider for SessionStore {
    fn current_user(&self) -> Option<User> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
