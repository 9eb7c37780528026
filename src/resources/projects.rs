use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::api_client::types::{endpoints, Payload};
use crate::api_client::ApiClient;
use crate::error_handling::types::ApiError;

use super::types::{Group, Project, ProjectPayload, RepartitionRequest, Subject, SubjectPayload};

/// Projects (`projets`), their subjects (`sujets`) and student groups.
pub struct ProjectService {
    api: Arc<ApiClient>,
}

impl ProjectService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn project_path(id: u64) -> String {
        format!("{}/{}", endpoints::PROJECTS, id)
    }

    fn subject_path(id: u64) -> String {
        format!("{}/{}", endpoints::SUBJECTS, id)
    }

    pub async fn list(&self) -> Result<Vec<Project>, ApiError> {
        Ok(self
            .api
            .get::<Payload<Vec<Project>>>(endpoints::PROJECTS)
            .await?
            .into_inner())
    }

    pub async fn get(&self, id: u64) -> Result<Project, ApiError> {
        Ok(self
            .api
            .get::<Payload<Project>>(&Self::project_path(id))
            .await?
            .into_inner())
    }

    pub async fn create(&self, payload: &ProjectPayload) -> Result<Project, ApiError> {
        let project = self
            .api
            .post::<_, Payload<Project>>(endpoints::PROJECTS, payload)
            .await?
            .into_inner();
        info!("Created project {} '{}'", project.id, project.title);
        Ok(project)
    }

    pub async fn update(&self, id: u64, payload: &ProjectPayload) -> Result<Project, ApiError> {
        Ok(self
            .api
            .put::<_, Payload<Project>>(&Self::project_path(id), payload)
            .await?
            .into_inner())
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.api.delete(&Self::project_path(id)).await
    }

    /// Subjects of one project.
    pub async fn subjects(&self, project_id: u64) -> Result<Vec<Subject>, ApiError> {
        let path = format!("{}?projet_id={}", endpoints::SUBJECTS, project_id);
        Ok(self.api.get::<Payload<Vec<Subject>>>(&path).await?.into_inner())
    }

    pub async fn create_subject(&self, payload: &SubjectPayload) -> Result<Subject, ApiError> {
        Ok(self
            .api
            .post::<_, Payload<Subject>>(endpoints::SUBJECTS, payload)
            .await?
            .into_inner())
    }

    pub async fn update_subject(&self, id: u64, payload: &SubjectPayload) -> Result<Subject, ApiError> {
        Ok(self
            .api
            .put::<_, Payload<Subject>>(&Self::subject_path(id), payload)
            .await?
            .into_inner())
    }

    pub async fn delete_subject(&self, id: u64) -> Result<(), ApiError> {
        self.api.delete(&Self::subject_path(id)).await
    }

    /// Asks the server to split the project's students into groups of
    /// `group_size`. The algorithm runs server-side; this returns its result.
    pub async fn repartition(&self, project_id: u64, group_size: u32) -> Result<Vec<Group>, ApiError> {
        if group_size == 0 {
            return Err(ApiError::InvalidRequest("group size must be at least 1".to_string()));
        }
        let path = format!("{}/repartition", Self::project_path(project_id));
        let groups = self
            .api
            .post::<_, Payload<Vec<Group>>>(&path, &RepartitionRequest { group_size })
            .await?
            .into_inner();
        info!("Project {} split into {} group(s)", project_id, groups.len());
        Ok(groups)
    }

    pub async fn groups(&self, project_id: u64) -> Result<Vec<Group>, ApiError> {
        let path = format!("{}/groupes", Self::project_path(project_id));
        Ok(self.api.get::<Payload<Vec<Group>>>(&path).await?.into_inner())
    }

    /// Uploads a file attached to a project as `multipart/form-data`.
    pub async fn upload_attachment(
        &self,
        project_id: u64,
        file_name: &str,
        content: Vec<u8>,
    ) -> Result<Value, ApiError> {
        let mime = mime_guess::from_path(Path::new(file_name)).first_or_octet_stream();
        debug!("Uploading {} ({}, {} bytes)", file_name, mime, content.len());
        let part = Part::bytes(content)
            .file_name(file_name.to_string())
            .mime_str(mime.as_ref())
            .map_err(ApiError::Transport)?;
        let form = Form::new().part("fichier", part);
        let path = format!("{}/fichiers", Self::project_path(project_id));
        self.api.post_multipart(&path, form).await
    }
}
