use std::sync::Arc;

use log::{debug, error, info, warn};
use reqwest::Method;

use crate::api_client::types::{endpoints, Payload, RequestBody};
use crate::api_client::ApiClient;
use crate::error_handling::messages::{
    first_validation_message, registration_message, server_message, user_message, LOGIN_FAILURE,
    REGISTER_FAILURE,
};
use crate::error_handling::types::ApiError;
use crate::storage::credentials::CredentialStore;

use super::role::{Role, RoleFlags};
use super::session::{Session, SharedSession, User};
use super::types::{AuthOutcome, AuthResponse, LoginRequest, ProfileUpdate, RegisterPayload};

/// Single source of truth for authentication state.
///
/// Owns the credential lifecycle: restoration at start-up, login,
/// registration and logout. Every operation keeps the persisted entries and
/// the in-memory [`Session`] in step, and none of them returns an error:
/// failures are logged and show up as "not authenticated" or as an
/// [`AuthOutcome::Failure`].
pub struct SessionStore {
    api: Arc<ApiClient>,
    credentials: CredentialStore,
    session: SharedSession,
}

impl SessionStore {
    pub fn new(api: Arc<ApiClient>, credentials: CredentialStore, session: SharedSession) -> Self {
        Self {
            api,
            credentials,
            session,
        }
    }

    /// Rebuilds the session from persisted storage and checks the token with
    /// the server. Ends with `loading` cleared, whatever happens.
    pub async fn restore(&self) {
        match self.credentials.load() {
            Some((token, user)) => {
                info!("Restoring session for user {}", user.id);
                self.session.write().establish(token, user);
                if let Err(e) = self
                    .api
                    .execute(Method::GET, endpoints::VERIFY, RequestBody::Empty)
                    .await
                {
                    warn!("Stored session rejected: {}", e);
                    self.teardown();
                }
            }
            None => {
                debug!("No persisted session");
                self.credentials.clear();
            }
        }
        self.session.write().loading = false;
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        let request = LoginRequest { email, password };
        match self.api.post::<_, AuthResponse>(endpoints::LOGIN, &request).await {
            Ok(response) => self.accept(response, LOGIN_FAILURE),
            Err(e) => {
                warn!("Login failed: {}", e);
                AuthOutcome::failure(login_message(&e))
            }
        }
    }

    pub async fn register(&self, payload: &RegisterPayload) -> AuthOutcome {
        match self.api.post::<_, AuthResponse>(endpoints::REGISTER, payload).await {
            Ok(response) => self.accept(response, REGISTER_FAILURE),
            Err(e) => {
                warn!("Registration failed: {}", e);
                AuthOutcome::failure(registration_message(&e))
            }
        }
    }

    fn accept(&self, response: AuthResponse, fallback: &str) -> AuthOutcome {
        match response {
            AuthResponse {
                token: Some(token),
                user: Some(user),
                ..
            } => {
                info!("Signed in as user {} ({})", user.id, user.role);
                self.establish(token, user);
                AuthOutcome::Success
            }
            AuthResponse { message, .. } => {
                warn!("Authentication response lacks a token or a user");
                AuthOutcome::failure(message.unwrap_or_else(|| fallback.to_string()))
            }
        }
    }

    fn establish(&self, token: String, user: User) {
        if let Err(e) = self.credentials.save(&token, &user) {
            error!("Unable to persist session, it will not survive a restart: {}", e);
        }
        self.session.write().establish(token, user);
    }

    fn teardown(&self) {
        self.credentials.clear();
        self.session.write().clear_credentials();
    }

    /// Tells the server the token is no longer used, then forgets it locally
    /// whether or not the server answered.
    pub async fn logout(&self) {
        let has_token =
            self.credentials.token().is_some() || self.session.read().token.is_some();
        if has_token {
            if let Err(e) = self
                .api
                .execute(Method::POST, endpoints::LOGOUT, RequestBody::Empty)
                .await
            {
                warn!("Logout request failed: {}", e);
            }
        } else {
            debug!("Logout without a stored token, skipping server call");
        }
        self.teardown();
        info!("Signed out");
    }

    /// Reloads the signed-in user's record from the server.
    pub async fn refresh_profile(&self) -> Result<User, ApiError> {
        let user = self.api.get::<Payload<User>>(endpoints::ME).await?.into_inner();
        self.replace_user(user.clone());
        Ok(user)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, ApiError> {
        let user = self
            .api
            .post::<_, Payload<User>>(endpoints::ME, update)
            .await?
            .into_inner();
        self.replace_user(user.clone());
        Ok(user)
    }

    fn replace_user(&self, user: User) {
        let token = {
            let mut session = self.session.write();
            if session.token.is_none() {
                return;
            }
            session.user = Some(user.clone());
            session.token.clone()
        };
        if let Some(token) = token {
            if let Err(e) = self.credentials.save(&token, &user) {
                error!("Unable to persist refreshed user: {}", e);
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    pub fn is_loading(&self) -> bool {
        self.session.read().loading
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.session.read().has_role(role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        self.session.read().has_any_role(roles)
    }

    pub fn role_flags(&self) -> RoleFlags {
        self.session.read().role_flags()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.read().user.clone()
    }

    pub fn token(&self) -> Option<String> {
        self.session.read().token.clone()
    }

    pub fn snapshot(&self) -> Session {
        self.session.snapshot()
    }
}

/// The server's own message, then its first field error, then a generic
/// text. Network failures are reported as they are.
fn login_message(error: &ApiError) -> String {
    match error.body() {
        Some(body) => server_message(body)
            .or_else(|| first_validation_message(body))
            .unwrap_or_else(|| LOGIN_FAILURE.to_string()),
        None => user_message(error, LOGIN_FAILURE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, TOKEN_KEY, USER_KEY};
    use crate::test_support::{Harness, ADMIN_TOKEN};

    #[tokio::test]
    async fn test_login_success_sets_and_persists_session() {
        let harness = Harness::start().await;
        let store = harness.store();

        let outcome = store.login("admin@example.edu", "secret").await;

        assert_eq!(outcome, AuthOutcome::Success);
        assert!(store.is_authenticated());
        assert_eq!(
            store.role_flags(),
            RoleFlags {
                is_admin: true,
                is_professor: false,
                is_student: false,
            }
        );
        assert_eq!(harness.storage.get(TOKEN_KEY).unwrap().as_deref(), Some(ADMIN_TOKEN));
        let stored_user: User =
            serde_json::from_str(&harness.storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(Some(stored_user), store.current_user());
    }

    #[tokio::test]
    async fn test_login_then_restore_round_trip() {
        let harness = Harness::start().await;
        harness.store().login("admin@example.edu", "secret").await;
        let before = harness.store().snapshot();

        let reloaded = harness.reload();
        assert!(reloaded.store().is_loading());
        reloaded.store().restore().await;

        let after = reloaded.store().snapshot();
        assert!(!after.loading);
        assert_eq!(after.token, before.token);
        assert_eq!(after.user, before.user);
    }

    #[tokio::test]
    async fn test_login_with_bad_credentials_keeps_state() {
        let harness = Harness::start().await;
        let store = harness.store();

        let outcome = store.login("admin@example.edu", "wrong").await;

        assert_eq!(outcome.message(), Some("Identifiants invalides"));
        assert!(!store.is_authenticated());
        assert!(harness.storage.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_failed_login_does_not_clear_existing_session() {
        let harness = Harness::start().await;
        harness.sign_in_admin_locally();
        harness.navigator().navigate("/admin");

        let outcome = harness.store().login("nobody@example.edu", "x").await;

        assert!(!outcome.is_success());
        assert!(harness.store().is_authenticated());
        assert_eq!(harness.store().token().as_deref(), Some(ADMIN_TOKEN));
        assert_eq!(harness.navigator().location(), "/admin");
    }

    #[tokio::test]
    async fn test_login_response_without_user_is_a_failure() {
        let harness = Harness::start().await;
        let outcome = harness.store().login("partial@example.edu", "secret").await;
        assert_eq!(outcome, AuthOutcome::failure(LOGIN_FAILURE));
        assert!(!harness.store().is_authenticated());
        assert!(harness.storage.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_login_network_failure() {
        let harness = Harness::offline();
        let outcome = harness.store().login("admin@example.edu", "secret").await;
        assert!(outcome.message().is_some_and(|m| m.starts_with("Network error")));
    }

    #[tokio::test]
    async fn test_register_success() {
        let harness = Harness::start().await;
        let payload = RegisterPayload {
            name: "Lina".into(),
            email: "lina@example.edu".into(),
            password: "secret123".into(),
            password_confirmation: "secret123".into(),
            role: Some(Role::Student),
            ..Default::default()
        };

        assert!(harness.store().register(&payload).await.is_success());
        assert!(harness.store().has_role(Role::Student));
        assert!(harness.store().has_any_role(&[Role::Admin, Role::Student]));
        assert!(!harness.store().has_role(Role::Admin));
    }

    #[tokio::test]
    async fn test_register_reports_first_field_error() {
        let harness = Harness::start().await;
        let payload = RegisterPayload {
            name: "Dup".into(),
            email: "taken@example.edu".into(),
            password: "x".into(),
            password_confirmation: "x".into(),
            role: Some(Role::Professor),
            ..Default::default()
        };

        let outcome = harness.store().register(&payload).await;
        assert_eq!(outcome.message(), Some("Cet email est déjà utilisé."));
        assert!(!harness.store().is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_without_persisted_state() {
        let harness = Harness::start().await;
        harness.store().restore().await;
        assert!(!harness.store().is_loading());
        assert!(!harness.store().is_authenticated());
        assert!(harness.backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_restore_with_rejected_token_clears_everything() {
        let harness = Harness::start().await;
        harness.persist_admin();
        harness.storage.set(TOKEN_KEY, "revoked").unwrap();

        harness.store().restore().await;

        assert!(!harness.store().is_loading());
        assert!(!harness.store().is_authenticated());
        assert!(harness.storage.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_restore_when_server_unreachable_clears_everything() {
        let harness = Harness::offline();
        harness.persist_admin();
        harness.store().restore().await;
        assert!(!harness.store().is_loading());
        assert!(!harness.store().is_authenticated());
        assert!(harness.storage.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_logout_clears_even_if_server_fails() {
        let harness = Harness::offline();
        harness.sign_in_admin_locally();
        harness.store().logout().await;
        assert!(!harness.store().is_authenticated());
        assert!(harness.storage.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let harness = Harness::start().await;
        harness.store().login("admin@example.edu", "secret").await;
        harness.store().logout().await;
        harness.store().logout().await;

        assert!(harness.storage.is_empty().unwrap());
        assert!(!harness.store().is_authenticated());
        let logout_calls = harness
            .backend
            .requests()
            .iter()
            .filter(|r| r.path == "/api/auth/logout")
            .count();
        assert_eq!(logout_calls, 1);
    }

    #[tokio::test]
    async fn test_logout_notifies_server_when_token_only_in_memory() {
        let harness = Harness::start().await;
        harness
            .session
            .write()
            .establish(ADMIN_TOKEN.to_string(), crate::test_support::admin_user());
        assert!(harness.storage.is_empty().unwrap());

        harness.store().logout().await;

        assert!(!harness.store().is_authenticated());
        let logout_calls: Vec<_> = harness
            .backend
            .requests()
            .into_iter()
            .filter(|r| r.path == "/api/auth/logout")
            .collect();
        assert_eq!(logout_calls.len(), 1);
        assert_eq!(logout_calls[0].authorization.as_deref(), Some("Bearer abc"));
    }

    #[tokio::test]
    async fn test_refresh_profile_updates_persisted_user() {
        let harness = Harness::start().await;
        harness.store().login("admin@example.edu", "secret").await;

        let user = harness.store().refresh_profile().await.unwrap();

        assert_eq!(user.name, "Ada Lovelace");
        let stored: User =
            serde_json::from_str(&harness.storage.get(USER_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(stored.name, "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_update_profile() {
        let harness = Harness::start().await;
        harness.store().login("admin@example.edu", "secret").await;
        let update = ProfileUpdate {
            name: Some("Ada King".into()),
            ..Default::default()
        };

        let user = harness.store().update_profile(&update).await.unwrap();

        assert_eq!(user.name, "Ada King");
        assert_eq!(harness.store().current_user().map(|u| u.name).as_deref(), Some("Ada King"));
    }
}
