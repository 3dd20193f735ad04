mod reorder_sync;
mod topic_fetch;

pub(crate) use reorder_sync::{sync_order, SyncedList};
pub(crate) use topic_fetch::fetch_topic_detail;

use crate::api::{ApiClient, ApiError, EnvConfig};
use crate::session::{AuthSession, SessionAccessor};
use crate::storage::Storage;
use crate::theme::Theme;
use leptos::prelude::*;
use std::time::Duration;

/// Transient banner shown above a page body.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(t) | Notice::Error(t) => t,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

const NOTICE_TTL: Duration = Duration::from_secs(4);

/// Show `notice` and clear it again after a few seconds, unless it has been
/// replaced in the meantime.
pub(crate) fn flash(target: RwSignal<Option<Notice>>, notice: Notice) {
    target.set(Some(notice.clone()));
    set_timeout(
        move || {
            let _ = target.try_update(|cur| {
                if cur.as_ref() == Some(&notice) {
                    *cur = None;
                }
            });
        },
        NOTICE_TTL,
    );
}

#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub api_client: RwSignal<ApiClient>,
    pub session: StoredValue<SessionAccessor>,

    /// Mirrors the stored session; kept current by a session subscription.
    pub auth: RwSignal<Option<AuthSession>>,

    pub theme: RwSignal<Theme>,
}

impl AppState {
    pub fn new() -> Self {
        Self::with_storage(Storage::browser(), EnvConfig::new())
    }

    pub fn with_storage(storage: Storage, config: EnvConfig) -> Self {
        let session = SessionAccessor::new(storage);
        let stored = session.current();

        let mut client = ApiClient::from_config(&config);
        client.set_token(stored.as_ref().map(|s| s.token.clone()));

        let api_client = RwSignal::new(client);
        let auth = RwSignal::new(stored);
        let theme = RwSignal::new(Theme::load(session.storage()));

        session.subscribe(move |s| {
            auth.set(s.cloned());
            api_client.update(|c| c.set_token(s.map(|s| s.token.clone())));
        });

        Self {
            api_client,
            session: StoredValue::new(session),
            auth,
            theme,
        }
    }

    /// Tracked read; use inside views and effects.
    pub fn is_admin(&self) -> bool {
        self.auth
            .with(|a| a.as_ref().is_some_and(AuthSession::is_admin))
    }

    /// Untracked read for event handlers.
    pub fn is_admin_untracked(&self) -> bool {
        self.auth
            .with_untracked(|a| a.as_ref().is_some_and(AuthSession::is_admin))
    }

    pub fn client(&self) -> ApiClient {
        self.api_client.get_untracked()
    }

    pub fn establish(&self, session: AuthSession) {
        self.session.with_value(|s| s.establish(session));
    }

    pub fn logout(&self) {
        self.session.with_value(SessionAccessor::clear);
    }

    /// Drop the session when the backend rejected our token. Returns whether
    /// it did.
    pub fn handle_unauthorized(&self, e: &ApiError) -> bool {
        if e.is_unauthorized() && self.auth.with_untracked(Option::is_some) {
            self.logout();
            true
        } else {
            false
        }
    }

    pub fn toggle_theme(&self) {
        let next = self.theme.get_untracked().toggled();
        self.session.with_value(|s| next.save(s.storage()));
        next.apply_to_document();
        self.theme.set(next);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
pub(crate) struct AppContext(pub AppState);
