use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};

use super::role::{Role, RoleFlags, UserRole};

/// Professor-specific part of a user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessorProfile {
    #[serde(default)]
    pub matricule: Option<String>,
    #[serde(default)]
    pub specialite: Option<String>,
    #[serde(default)]
    pub grade: Option<String>,
}

/// Student-specific part of a user record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub matricule: Option<String>,
    #[serde(default)]
    pub filiere: Option<String>,
    #[serde(default)]
    pub niveau: Option<String>,
}

/// Account record returned by the authentication endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "nom")]
    pub name: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, alias = "professeur", skip_serializing_if = "Option::is_none")]
    pub professor: Option<ProfessorProfile>,
    #[serde(default, alias = "etudiant", skip_serializing_if = "Option::is_none")]
    pub student: Option<StudentProfile>,
}

impl User {
    pub fn new(id: u64, email: &str, name: &str, role: impl Into<UserRole>) -> Self {
        Self {
            id,
            email: email.to_string(),
            name: name.to_string(),
            role: role.into(),
            professor: None,
            student: None,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role.known() == Some(role)
    }
}

/// Authentication state of the running client.
///
/// `loading` is only true between start-up and the end of session
/// restoration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<User>,
    pub loading: bool,
}

impl Session {
    /// Initial state before the persisted session has been restored.
    pub fn restoring() -> Self {
        Self {
            loading: true,
            ..Default::default()
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn role(&self) -> Option<&UserRole> {
        self.user.as_ref().map(|u| &u.role)
    }

    pub fn role_flags(&self) -> RoleFlags {
        RoleFlags::from_role(self.role())
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.user.as_ref().is_some_and(|u| u.has_role(role))
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    pub fn establish(&mut self, token: String, user: User) {
        self.token = Some(token);
        self.user = Some(user);
    }

    pub fn clear_credentials(&mut self) {
        self.token = None;
        self.user = None;
    }
}

/// Handle on the single [`Session`] shared by the session store, the API
/// client and the navigator. Cloning the handle shares the same state.
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> Session {
        self.read().clone()
    }
}
