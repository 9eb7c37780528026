use std::sync::Arc;

use log::{info, warn};

use crate::api_client::types::{endpoints, Payload};
use crate::api_client::ApiClient;
use crate::error_handling::types::ApiError;

use super::task_board::{MoveOutcome, TaskBoard};
use super::types::{StatusChange, Task, TaskPayload, TaskStatus};

/// The signed-in student's personal tasks.
pub struct TaskService {
    api: Arc<ApiClient>,
}

impl TaskService {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    fn task_path(id: u64) -> String {
        format!("{}/{}", endpoints::STUDENT_TASKS, id)
    }

    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        Ok(self
            .api
            .get::<Payload<Vec<Task>>>(endpoints::STUDENT_TASKS)
            .await?
            .into_inner())
    }

    pub async fn board(&self) -> Result<TaskBoard, ApiError> {
        Ok(TaskBoard::from_tasks(self.list().await?))
    }

    pub async fn create(&self, payload: &TaskPayload) -> Result<Task, ApiError> {
        let task = self
            .api
            .post::<_, Payload<Task>>(endpoints::STUDENT_TASKS, payload)
            .await?
            .into_inner();
        info!("Created task {}", task.id);
        Ok(task)
    }

    pub async fn update(&self, id: u64, payload: &TaskPayload) -> Result<Task, ApiError> {
        Ok(self
            .api
            .put::<_, Payload<Task>>(&Self::task_path(id), payload)
            .await?
            .into_inner())
    }

    pub async fn delete(&self, id: u64) -> Result<(), ApiError> {
        self.api.delete(&Self::task_path(id)).await
    }

    pub async fn update_status(&self, id: u64, status: TaskStatus) -> Result<Task, ApiError> {
        let path = format!("{}/status", Self::task_path(id));
        Ok(self
            .api
            .put::<_, Payload<Task>>(&path, &StatusChange { status })
            .await?
            .into_inner())
    }

    /// Moves the card on the board first, then tells the server. The board
    /// is put back as it was if the server refuses.
    pub async fn move_on_board(
        &self,
        board: &mut TaskBoard,
        id: u64,
        to: TaskStatus,
    ) -> Result<MoveOutcome, ApiError> {
        let outcome = board.move_task(id, to);
        let MoveOutcome::Moved { from, .. } = outcome else {
            return Ok(outcome);
        };
        match self.update_status(id, to).await {
            Ok(_) => Ok(outcome),
            Err(e) => {
                warn!("Status change of task {} rejected, moving it back: {}", id, e);
                board.move_task(id, from);
                Err(e)
            }
        }
    }
}
