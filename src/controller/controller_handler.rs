use std::sync::Arc;

use log::{debug, info};

use crate::api_client::ApiClient;
use crate::configuration::ClientConfig;
use crate::error_handling::types::ControllerError;
use crate::resources::{ProjectService, TaskService, UserService};
use crate::routing::{NavigationOutcome, Navigator, RouteGuard, LOGIN_PATH};
use crate::session_management::{AuthOutcome, RegisterPayload, Session, SessionStore, SharedSession};
use crate::storage::{CredentialStore, FileStorage, KeyValueStore};

/// Owns every long-lived component of the client and wires them together.
///
/// The session, navigator and credential store are shared handles: the API
/// client's 401 handler and the session store act on the same state.
pub struct Controller {
    config: ClientConfig,
    session: SharedSession,
    navigator: Navigator,
    api: Arc<ApiClient>,
    store: SessionStore,
}

impl Controller {
    /// Builds a controller persisting its session under the configured
    /// storage directory.
    pub fn new(config: ClientConfig) -> Result<Self, ControllerError> {
        let storage = FileStorage::new(config.session_file())?;
        info!("Session file: {}", storage.path().display());
        Self::with_storage(config, Arc::new(storage))
    }

    pub fn with_storage(
        config: ClientConfig,
        storage: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ControllerError> {
        config.validate()?;

        let session = SharedSession::new(Session::restoring());
        let navigator = Navigator::new(session.clone(), RouteGuard::default());
        let credentials = CredentialStore::new(storage);
        let api = Arc::new(ApiClient::new(
            &config,
            credentials.clone(),
            session.clone(),
            navigator.clone(),
        )?);
        let store = SessionStore::new(api.clone(), credentials, session.clone());

        debug!("Controller ready for {}", api.base_url());
        Ok(Self {
            config,
            session,
            navigator,
            api,
            store,
        })
    }

    /// Opens `initial_path`, restores the persisted session, then lets the
    /// guard decide what to show with the restored state.
    pub async fn start(&self, initial_path: &str) -> NavigationOutcome {
        self.navigator.navigate(initial_path);
        self.store.restore().await;
        self.navigator.resume()
    }

    /// Signs in and, on success, leaves the auth screen for the remembered
    /// location or the user's home.
    pub async fn login(&self, email: &str, password: &str) -> (AuthOutcome, Option<NavigationOutcome>) {
        let outcome = self.store.login(email, password).await;
        let navigation = outcome.is_success().then(|| self.navigator.after_login());
        (outcome, navigation)
    }

    pub async fn register(&self, payload: &RegisterPayload) -> (AuthOutcome, Option<NavigationOutcome>) {
        let outcome = self.store.register(payload).await;
        let navigation = outcome.is_success().then(|| self.navigator.after_login());
        (outcome, navigation)
    }

    pub async fn logout(&self) -> NavigationOutcome {
        self.store.logout().await;
        self.navigator.navigate(LOGIN_PATH)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    pub fn session_store(&self) -> &SessionStore {
        &self.store
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    pub fn users(&self) -> UserService {
        UserService::new(self.api.clone())
    }

    pub fn projects(&self) -> ProjectService {
        ProjectService::new(self.api.clone())
    }

    pub fn tasks(&self) -> TaskService {
        TaskService::new(self.api.clone())
    }
}
