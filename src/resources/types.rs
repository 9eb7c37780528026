use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::session_management::role::Role;

/// Admin form for creating or editing an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserPayload {
    #[serde(rename = "nom")]
    pub name: String,
    pub email: String,
    /// Left out on update to keep the current password.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matricule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filiere: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub niveau: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(rename = "titre", alias = "title")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "professeur_id", default)]
    pub professor_id: Option<u64>,
    #[serde(rename = "date_limite", default)]
    pub deadline: Option<NaiveDate>,
    #[serde(rename = "taille_groupe", default)]
    pub group_size: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProjectPayload {
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "date_limite", skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
    #[serde(rename = "taille_groupe", skip_serializing_if = "Option::is_none")]
    pub group_size: Option<u32>,
}

/// Subject (`sujet`) students can be assigned within a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: u64,
    #[serde(rename = "projet_id", default)]
    pub project_id: Option<u64>,
    #[serde(rename = "titre", alias = "title")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SubjectPayload {
    #[serde(rename = "projet_id")]
    pub project_id: u64,
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: u64,
    #[serde(default, alias = "nom")]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Student group produced by the server-side repartition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: u64,
    #[serde(rename = "projet_id", default)]
    pub project_id: Option<u64>,
    #[serde(rename = "nom", alias = "name", default)]
    pub name: String,
    #[serde(rename = "membres", alias = "members", default)]
    pub members: Vec<GroupMember>,
    #[serde(rename = "sujet_id", default)]
    pub subject_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RepartitionRequest {
    #[serde(rename = "taille_groupe")]
    pub group_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[serde(alias = "a_faire")]
    Todo,
    #[serde(alias = "en_cours")]
    InProgress,
    #[serde(alias = "termine")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "To do",
            TaskStatus::InProgress => "In progress",
            TaskStatus::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    #[serde(alias = "basse")]
    Low,
    #[serde(alias = "moyenne")]
    Medium,
    #[serde(alias = "haute")]
    High,
}

/// Entry of a student's personal task board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    #[serde(rename = "titre", alias = "title")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "statut", alias = "status")]
    pub status: TaskStatus,
    #[serde(rename = "priorite", alias = "priority", default)]
    pub priority: Option<TaskPriority>,
    #[serde(rename = "date_echeance", alias = "due_date", default)]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "projet_id", default)]
    pub project_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskPayload {
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "statut")]
    pub status: TaskStatus,
    #[serde(rename = "priorite", skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(rename = "date_echeance", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(rename = "projet_id", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    #[serde(rename = "statut")]
    pub status: TaskStatus,
}
