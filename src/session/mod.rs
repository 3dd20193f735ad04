use crate::models::{AccountInfo, Role};
use crate::storage::{Storage, AUTH_KEY};
use leptos::logging::log;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct AuthSession {
    pub token: String,
    pub user: AccountInfo,
    pub role: Role,
}

impl AuthSession {
    /// Admin if either the session role or the user object says so.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin || self.user.role() == Some(Role::Admin)
    }
}

type Listener = Arc<dyn Fn(Option<&AuthSession>) + Send + Sync>;

/// Owns the persisted auth session and tells subscribers when it changes.
///
/// Views receive this through context instead of reading storage directly.
#[derive(Clone)]
pub(crate) struct SessionAccessor {
    storage: Storage,
    listeners: Arc<Mutex<Vec<Listener>>>,
}

impl SessionAccessor {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            listeners: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Reads the stored session. A blank token counts as signed out.
    pub fn current(&self) -> Option<AuthSession> {
        self.storage
            .load::<AuthSession>(AUTH_KEY)
            .filter(|s| !s.token.trim().is_empty())
    }

    pub fn establish(&self, session: AuthSession) {
        self.storage.set(AUTH_KEY, &session);
        log!("session established (role: {:?})", session.role);
        self.notify(Some(&session));
    }

    pub fn clear(&self) {
        self.storage.remove(AUTH_KEY);
        log!("session cleared");
        self.notify(None);
    }

    /// Call `listener` on every later establish or clear.
    pub fn subscribe(&self, listener: impl Fn(Option<&AuthSession>) + Send + Sync + 'static) {
        if let Ok(mut ls) = self.listeners.lock() {
            ls.push(Arc::new(listener));
        }
    }

    fn notify(&self, session: Option<&AuthSession>) {
        // Snapshot so a listener may subscribe without deadlocking.
        let listeners: Vec<Listener> = match self.listeners.lock() {
            Ok(ls) => ls.clone(),
            Err(_) => return,
        };
        for l in listeners {
            l(session);
        }
    }
}
