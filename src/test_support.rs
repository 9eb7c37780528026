//! In-process tracker backend and fixtures shared by the unit tests.

use std::collections::{BTreeMap, HashMap};
use std::net::{SocketAddr, TcpListener};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{json, Map, Value};
use warp::http::{HeaderMap, Method, StatusCode};
use warp::hyper::body::Bytes;
use warp::path::FullPath;
use warp::Filter;

use crate::api_client::ApiClient;
use crate::configuration::ClientConfig;
use crate::controller::Controller;
use crate::routing::Navigator;
use crate::session_management::role::Role;
use crate::session_management::session::{SharedSession, User};
use crate::session_management::SessionStore;
use crate::storage::{CredentialStore, KeyValueStore, MemoryStorage};

pub(crate) const ADMIN_TOKEN: &str = "abc";
pub(crate) const PROFESSOR_TOKEN: &str = "prof";
pub(crate) const STUDENT_TOKEN: &str = "stud";

const STUDENT_IDS: [u64; 3] = [10, 11, 12];

pub(crate) fn admin_user() -> User {
    User::new(1, "admin@example.edu", "Ada", Role::Admin)
}

pub(crate) fn professor_user() -> User {
    User::new(2, "grace@example.edu", "Grace", Role::Professor)
}

pub(crate) fn student_user() -> User {
    User::new(10, "lina@example.edu", "Lina", Role::Student)
}

/// A request as the backend saw it.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    /// Path including the `/api` prefix, without the query string.
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    /// JSON body, `Value::Null` when empty or not JSON.
    pub body: Value,
}

struct MockState {
    requests: Vec<RecordedRequest>,
    tokens: HashMap<String, Value>,
    next_id: u64,
    users: BTreeMap<u64, Value>,
    projects: BTreeMap<u64, Value>,
    subjects: BTreeMap<u64, Value>,
    tasks: BTreeMap<u64, Value>,
    groups: HashMap<u64, Vec<Value>>,
}

type Reply = (StatusCode, Value);

fn user_json(user: &User) -> Value {
    json!({"id": user.id, "nom": user.name, "email": user.email, "role": user.role.as_str()})
}

fn not_found() -> Reply {
    (StatusCode::NOT_FOUND, json!({"message": "Ressource introuvable"}))
}

fn ok(data: Value) -> Reply {
    (StatusCode::OK, json!({ "data": data }))
}

/// Copies every field of `patch` into `target`.
fn merge(target: &mut Value, patch: &Value) {
    if let (Some(target), Some(patch)) = (target.as_object_mut(), patch.as_object()) {
        for (key, value) in patch {
            target.insert(key.clone(), value.clone());
        }
    }
}

fn with_id(id: u64, body: &Value) -> Value {
    let mut record = Value::Object(Map::new());
    merge(&mut record, body);
    record["id"] = json!(id);
    record
}

impl MockState {
    fn new() -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(ADMIN_TOKEN.to_string(), user_json(&admin_user()));
        tokens.insert(PROFESSOR_TOKEN.to_string(), user_json(&professor_user()));
        tokens.insert(STUDENT_TOKEN.to_string(), user_json(&student_user()));

        let mut users = BTreeMap::new();
        users.insert(
            1,
            json!({"id": 1, "nom": "Ada Lovelace", "email": "admin@example.edu", "role": "admin"}),
        );
        users.insert(2, user_json(&professor_user()));

        let mut projects = BTreeMap::new();
        projects.insert(
            1,
            json!({"id": 1, "titre": "Projet de compilation", "professeur_id": 2, "taille_groupe": 2}),
        );

        Self {
            requests: Vec::new(),
            tokens,
            next_id: 100,
            users,
            projects,
            subjects: BTreeMap::new(),
            tasks: BTreeMap::new(),
            groups: HashMap::new(),
        }
    }

    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn handle(&mut self, request: &RecordedRequest, query: &HashMap<String, String>) -> Reply {
        let Some(path) = request.path.strip_prefix("/api") else {
            return not_found();
        };
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let method = request.method.as_str();
        let body = &request.body;

        match (method, segments.as_slice()) {
            ("GET", ["public", "ping"]) => return (StatusCode::OK, json!({"pong": true})),
            ("GET", ["forbidden"]) => {
                return (StatusCode::FORBIDDEN, json!({"message": "Accès refusé"}))
            }
            ("POST", ["auth", "login"]) => return self.login(body),
            ("POST", ["auth", "register"]) => return self.register(body),
            _ => {}
        }

        let caller = request
            .authorization
            .as_deref()
            .and_then(|h| h.strip_prefix("Bearer "))
            .and_then(|token| self.tokens.get(token))
            .cloned();
        let Some(caller) = caller else {
            return (StatusCode::UNAUTHORIZED, json!({"message": "Unauthenticated."}));
        };
        let caller_id = caller["id"].as_u64().unwrap_or_default();

        match (method, segments.as_slice()) {
            ("GET", ["auth", "verify"]) => (StatusCode::OK, json!({"valid": true})),
            ("POST", ["auth", "logout"]) => (StatusCode::OK, json!({"message": "Déconnecté"})),
            ("GET", ["auth", "me"]) => ok(self.users.get(&caller_id).cloned().unwrap_or(caller)),
            ("POST", ["auth", "me"]) => {
                let mut user = self.users.get(&caller_id).cloned().unwrap_or(caller);
                merge(&mut user, body);
                self.users.insert(caller_id, user.clone());
                ok(user)
            }

            ("GET", ["users"]) => ok(Value::Array(self.users.values().cloned().collect())),
            ("POST", ["users"]) => {
                let id = self.allocate_id();
                let user = with_id(id, body);
                self.users.insert(id, user.clone());
                ok(user)
            }
            (_, ["users", id]) => {
                let id = id.parse().unwrap_or_default();
                Self::record(&mut self.users, method, id, body)
            }

            ("GET", ["projets"]) => ok(Value::Array(self.projects.values().cloned().collect())),
            ("POST", ["projets"]) => {
                let id = self.allocate_id();
                let mut project = with_id(id, body);
                project["professeur_id"] = json!(caller_id);
                self.projects.insert(id, project.clone());
                ok(project)
            }
            ("POST", ["projets", id, "repartition"]) => {
                let id: u64 = id.parse().unwrap_or_default();
                if !self.projects.contains_key(&id) {
                    return not_found();
                }
                let size = body["taille_groupe"].as_u64().unwrap_or(1).max(1) as usize;
                let mut groups = Vec::new();
                for (index, chunk) in STUDENT_IDS.chunks(size).enumerate() {
                    let members: Vec<Value> = chunk
                        .iter()
                        .map(|s| json!({"id": s, "nom": format!("Étudiant {}", s), "email": format!("e{}@example.edu", s)}))
                        .collect();
                    groups.push(json!({
                        "id": self.allocate_id(),
                        "projet_id": id,
                        "nom": format!("Groupe {}", index + 1),
                        "membres": members,
                    }));
                }
                self.groups.insert(id, groups.clone());
                ok(Value::Array(groups))
            }
            ("GET", ["projets", id, "groupes"]) => {
                let id: u64 = id.parse().unwrap_or_default();
                ok(Value::Array(self.groups.get(&id).cloned().unwrap_or_default()))
            }
            ("POST", ["projets", _, "fichiers"]) => (StatusCode::OK, json!({"stored": true})),
            (_, ["projets", id]) => {
                let id = id.parse().unwrap_or_default();
                Self::record(&mut self.projects, method, id, body)
            }

            ("GET", ["sujets"]) => {
                let project = query.get("projet_id").and_then(|p| p.parse::<u64>().ok());
                let subjects = self
                    .subjects
                    .values()
                    .filter(|s| project.is_none() || s["projet_id"].as_u64() == project)
                    .cloned()
                    .collect();
                ok(Value::Array(subjects))
            }
            ("POST", ["sujets"]) => {
                let id = self.allocate_id();
                let subject = with_id(id, body);
                self.subjects.insert(id, subject.clone());
                ok(subject)
            }
            (_, ["sujets", id]) => {
                let id = id.parse().unwrap_or_default();
                Self::record(&mut self.subjects, method, id, body)
            }

            ("GET", ["student", "taches"]) => {
                let tasks = self
                    .tasks
                    .values()
                    .filter(|t| t["etudiant_id"].as_u64() == Some(caller_id))
                    .cloned()
                    .collect();
                ok(Value::Array(tasks))
            }
            ("POST", ["student", "taches"]) => {
                let id = self.allocate_id();
                let mut task = with_id(id, body);
                task["etudiant_id"] = json!(caller_id);
                self.tasks.insert(id, task.clone());
                ok(task)
            }
            ("PUT", ["student", "taches", id, "status"]) => {
                let id = id.parse().unwrap_or_default();
                Self::record(&mut self.tasks, "PUT", id, body)
            }
            (_, ["student", "taches", id]) => {
                let id = id.parse().unwrap_or_default();
                Self::record(&mut self.tasks, method, id, body)
            }

            _ => not_found(),
        }
    }

    /// GET, PUT and DELETE on a single record of a collection.
    fn record(collection: &mut BTreeMap<u64, Value>, method: &str, id: u64, body: &Value) -> Reply {
        if method == "DELETE" {
            return match collection.remove(&id) {
                Some(_) => (StatusCode::OK, json!({"message": "Supprimé"})),
                None => not_found(),
            };
        }
        let Some(record) = collection.get_mut(&id) else {
            return not_found();
        };
        match method {
            "GET" => ok(record.clone()),
            "PUT" => {
                merge(record, body);
                record["id"] = json!(id);
                ok(record.clone())
            }
            _ => (StatusCode::METHOD_NOT_ALLOWED, json!({"message": "Méthode non autorisée"})),
        }
    }

    fn login(&mut self, body: &Value) -> Reply {
        match (body["email"].as_str(), body["password"].as_str()) {
            (Some("admin@example.edu"), Some("secret")) => (
                StatusCode::OK,
                json!({"token": ADMIN_TOKEN, "user": {"id": 1, "name": "Ada", "email": "admin@example.edu", "role": "admin"}}),
            ),
            (Some("partial@example.edu"), _) => (StatusCode::OK, json!({"token": "partial"})),
            _ => (StatusCode::UNAUTHORIZED, json!({"message": "Identifiants invalides"})),
        }
    }

    fn register(&mut self, body: &Value) -> Reply {
        if body["email"] == "taken@example.edu" {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({
                    "message": "Les données fournies sont invalides.",
                    "errors": {"email": ["Cet email est déjà utilisé."]}
                }),
            );
        }
        let id = self.allocate_id();
        let user = json!({"id": id, "nom": body["nom"], "email": body["email"], "role": body["role"]});
        let token = format!("token-{}", id);
        self.tokens.insert(token.clone(), user.clone());
        self.users.insert(id, user.clone());
        (StatusCode::CREATED, json!({"token": token, "user": user}))
    }
}

/// Handle on a mock backend. Clones observe the same server.
#[derive(Clone)]
pub(crate) struct MockBackend {
    pub addr: SocketAddr,
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    fn detached(addr: SocketAddr) -> Self {
        Self {
            addr,
            state: Arc::new(Mutex::new(MockState::new())),
        }
    }

    async fn spawn() -> Self {
        let state = Arc::new(Mutex::new(MockState::new()));
        let shared = state.clone();

        let routes = warp::method()
            .and(warp::path::full())
            .and(warp::query::<HashMap<String, String>>())
            .and(warp::header::headers_cloned())
            .and(warp::body::bytes())
            .map(
                move |method: Method,
                      path: FullPath,
                      query: HashMap<String, String>,
                      headers: HeaderMap,
                      body: Bytes| {
                    let header = |name: &str| {
                        headers
                            .get(name)
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string)
                    };
                    let request = RecordedRequest {
                        method: method.to_string(),
                        path: path.as_str().to_string(),
                        authorization: header("authorization"),
                        content_type: header("content-type"),
                        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
                    };
                    let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
                    let (status, reply) = state.handle(&request, &query);
                    state.requests.push(request);
                    warp::reply::with_status(warp::reply::json(&reply), status)
                },
            );

        let (addr, server) = warp::serve(routes).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);
        Self { addr, state }
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("backend received no request")
    }
}

/// A controller on in-memory storage, talking to a [`MockBackend`].
pub(crate) struct Harness {
    pub backend: MockBackend,
    pub storage: Arc<MemoryStorage>,
    pub controller: Controller,
    pub session: SharedSession,
}

impl Harness {
    pub async fn start() -> Self {
        Self::build(MockBackend::spawn().await, Arc::new(MemoryStorage::new()))
    }

    /// Harness whose backend address refuses connections.
    pub fn offline() -> Self {
        let addr = TcpListener::bind("127.0.0.1:0")
            .and_then(|listener| listener.local_addr())
            .expect("no free local port");
        Self::build(MockBackend::detached(addr), Arc::new(MemoryStorage::new()))
    }

    fn build(backend: MockBackend, storage: Arc<MemoryStorage>) -> Self {
        let config = ClientConfig {
            api_base_url: format!("http://{}/api", backend.addr),
            request_timeout_secs: 5,
            ..Default::default()
        };
        let controller = Controller::with_storage(config, storage.clone()).expect("controller");
        let session = controller.session().clone();
        Self {
            backend,
            storage,
            controller,
            session,
        }
    }

    /// A fresh controller over the same backend and storage, as after a
    /// restart of the client.
    pub fn reload(&self) -> Self {
        Self::build(self.backend.clone(), self.storage.clone())
    }

    pub fn api(&self) -> &ApiClient {
        self.controller.api()
    }

    pub fn navigator(&self) -> &Navigator {
        self.controller.navigator()
    }

    pub fn store(&self) -> &SessionStore {
        self.controller.session_store()
    }

    fn credentials(&self) -> CredentialStore {
        CredentialStore::new(self.storage.clone() as Arc<dyn KeyValueStore>)
    }

    /// Writes the admin session to storage without touching memory.
    pub fn persist_admin(&self) {
        self.credentials()
            .save(ADMIN_TOKEN, &admin_user())
            .expect("persist admin");
    }

    fn sign_in_locally(&self, token: &str, user: User) {
        self.credentials().save(token, &user).expect("persist session");
        let mut session = self.session.write();
        session.establish(token.to_string(), user);
        session.loading = false;
    }

    pub fn sign_in_admin_locally(&self) {
        self.sign_in_locally(ADMIN_TOKEN, admin_user());
    }

    pub fn sign_in_professor_locally(&self) {
        self.sign_in_locally(PROFESSOR_TOKEN, professor_user());
    }

    pub fn sign_in_student_locally(&self) {
        self.sign_in_locally(STUDENT_TOKEN, student_user());
    }
}
