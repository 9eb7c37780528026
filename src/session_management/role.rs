use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The three kinds of account the tracker knows about.
///
/// Serialized with the English identifiers. Parsing goes through
/// [`FromStr`], which also accepts the backend's French identifiers
/// (`etudiant`, `professeur`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Professor,
    Student,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Professor, Role::Student];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Professor => "professor",
            Role::Student => "student",
        }
    }

    /// Landing screen for users holding this role.
    pub fn home_path(self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Professor => "/professor",
            Role::Student => "/student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role '{}'", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrateur" => Ok(Role::Admin),
            "professor" | "professeur" | "enseignant" => Ok(Role::Professor),
            "student" | "etudiant" => Ok(Role::Student),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

/// Role field of a user record as received from the server.
///
/// Anything outside [`Role`] is kept verbatim instead of failing the whole
/// record, so such a user can still log in and gets sent to the site root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRole {
    Known(Role),
    Unknown(String),
}

impl UserRole {
    pub fn known(&self) -> Option<Role> {
        match self {
            UserRole::Known(role) => Some(*role),
            UserRole::Unknown(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            UserRole::Known(role) => role.as_str(),
            UserRole::Unknown(raw) => raw.as_str(),
        }
    }

    /// Home path for this role, `/` when the role is not recognised.
    pub fn home_path(&self) -> &'static str {
        self.known().map(Role::home_path).unwrap_or("/")
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Unknown(String::new())
    }
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        UserRole::Known(role)
    }
}

impl From<&str> for UserRole {
    fn from(raw: &str) -> Self {
        raw.parse()
            .map(UserRole::Known)
            .unwrap_or_else(|_| UserRole::Unknown(raw.to_string()))
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for UserRole {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(UserRole::from(raw.as_str()))
    }
}

/// Boolean view of the current user's role, for screens that branch on it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleFlags {
    pub is_admin: bool,
    pub is_professor: bool,
    pub is_student: bool,
}

impl RoleFlags {
    /// At most one flag is ever set.
    pub fn from_role(role: Option<&UserRole>) -> Self {
        let mut flags = RoleFlags::default();
        match role.and_then(UserRole::known) {
            Some(Role::Admin) => flags.is_admin = true,
            Some(Role::Professor) => flags.is_professor = true,
            Some(Role::Student) => flags.is_student = true,
            None => {}
        }
        flags
    }
}
