use serde::Deserialize;

/// Endpoint paths relative to the configured API base URL.
pub mod endpoints {
    pub const LOGIN: &str = "/auth/login";
    pub const REGISTER: &str = "/auth/register";
    pub const LOGOUT: &str = "/auth/logout";
    pub const VERIFY: &str = "/auth/verify";
    pub const ME: &str = "/auth/me";
    pub const USERS: &str = "/users";
    pub const PROJECTS: &str = "/projets";
    pub const SUBJECTS: &str = "/sujets";
    pub const STUDENT_TASKS: &str = "/student/taches";
}

/// Endpoints whose 401 means "wrong credentials" rather than "session
/// expired"; they never trigger the session teardown.
pub fn is_credentials_endpoint(path: &str) -> bool {
    let path = path.split('?').next().unwrap_or_default().trim_end_matches('/');
    path == endpoints::LOGIN || path == endpoints::REGISTER
}

/// Body of an outgoing request.
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    /// Sent without an explicit content type; the transport adds the
    /// boundary-carrying `multipart/form-data` header itself.
    Multipart(reqwest::multipart::Form),
}

/// Response payload that may or may not be wrapped in a `data` envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Payload<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Payload<T> {
    pub fn into_inner(self) -> T {
        match self {
            Payload::Wrapped { data } => data,
            Payload::Bare(value) => value,
        }
    }
}
