use std::sync::Arc;

use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::api::Interceptor;
use crate::models::{TokenResponse, User};
use crate::navigation::{NavigationDecision, NavigationTarget, Navigator, PublicPaths};
use crate::storage::{SessionStorage, StorageError, TOKEN_KEY, USER_KEY};

pub struct SessionGuard {
    storage: Arc<dyn SessionStorage>,
    navigator: Arc<dyn Navigator>,
    public_paths: PublicPaths,
}

impl SessionGuard {
    pub fn new(storage: Arc<dyn SessionStorage>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            storage,
            navigator,
            public_paths: PublicPaths::default(),
        }
    }

    pub fn with_public_paths(mut self, public_paths: PublicPaths) -> Self {
        self.public_paths = public_paths;
        self
    }

    pub fn public_paths(&self) -> &PublicPaths {
        &self.public_paths
    }

    /// Read a key, treating storage failures as "absent"
    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key = key, error = %e, "Failed to read session storage");
                None
            }
        }
    }

    /// The stored bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY)
    }

    /// True when a token is stored. The token itself is not inspected.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// The cached user, or `None` when absent or not valid JSON
    pub fn current_user(&self) -> Option<User> {
        let raw = self.read(USER_KEY)?;
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "Stored user is not valid JSON, treating as logged out user");
                None
            }
        }
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.current_user()
            .map(|user| user.has_role(role))
            .unwrap_or(false)
    }

    /// Set `Authorization: Bearer <token>` when a non-empty token is stored
    pub fn attach_auth_header(&self, headers: &mut HeaderMap) {
        let Some(token) = self.token().filter(|t| !t.is_empty()) else {
            return;
        };
        match HeaderValue::from_str(&format!("Bearer {}", token)) {
            Ok(mut value) => {
                value.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, value);
                debug!("Attached bearer token to request");
            }
            Err(_) => warn!("Stored token is not a valid header value, sending request without it"),
        }
    }

    /// Persist a fresh login. Token and user are written together: if the
    /// user cannot be stored the token is removed again.
    pub fn store_session(&self, session: &TokenResponse) -> Result<(), StorageError> {
        let user_json = serde_json::to_string(&session.usuario)?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        if let Err(e) = self.storage.set(USER_KEY, &user_json) {
            if let Err(rollback) = self.storage.remove(TOKEN_KEY) {
                warn!(error = %rollback, "Failed to roll back token after user write failed");
            }
            return Err(e);
        }
        debug!("Session stored");
        Ok(())
    }

    /// Clear token and user, then send the user to the login view
    pub fn logout(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                warn!(key = key, error = %e, "Failed to clear session storage");
            }
        }
        info!("Session cleared");
        self.navigator.navigate(&NavigationTarget::login_after_logout());
    }

    /// React to a response status. Returns true when it ended the session.
    pub fn handle_response(&self, status: StatusCode) -> bool {
        if status != StatusCode::UNAUTHORIZED {
            return false;
        }
        warn!("Server rejected the session with 401, logging out");
        self.logout();
        true
    }

    /// Page-load check: anonymous visitors on non-public paths are sent
    /// to the login view.
    pub fn guard_navigation(&self, path: &str) -> NavigationDecision {
        if self.public_paths.is_public(path) || self.is_authenticated() {
            return NavigationDecision::Allow;
        }
        info!(path = path, "Protected page requested without a session");
        let target = NavigationTarget::login();
        self.navigator.navigate(&target);
        NavigationDecision::Redirect(target)
    }
}

impl Interceptor for SessionGuard {
    fn before_send(&self, headers: &mut HeaderMap) {
        self.attach_auth_header(headers);
    }

    fn on_response(&self, status: StatusCode) {
        self.handle_response(status);
    }
}
