use std::collections::BTreeMap;

use super::types::{Task, TaskStatus};

/// Result of moving a card between columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The card changed column; `to` is the status to send to the server.
    Moved { from: TaskStatus, to: TaskStatus },
    /// The card already sat in the target column.
    Unchanged,
    NotFound,
}

/// A student's tasks grouped by status, one column per [`TaskStatus`].
#[derive(Debug, Clone, PartialEq)]
pub struct TaskBoard {
    columns: BTreeMap<TaskStatus, Vec<Task>>,
}

impl Default for TaskBoard {
    fn default() -> Self {
        Self {
            columns: TaskStatus::ALL.iter().map(|s| (*s, Vec::new())).collect(),
        }
    }
}

impl TaskBoard {
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut board = Self::default();
        for task in tasks {
            board.insert(task);
        }
        board
    }

    pub fn insert(&mut self, task: Task) {
        self.columns.entry(task.status).or_default().push(task);
    }

    pub fn column(&self, status: TaskStatus) -> &[Task] {
        self.columns.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn columns(&self) -> impl Iterator<Item = (TaskStatus, &[Task])> {
        self.columns.iter().map(|(s, tasks)| (*s, tasks.as_slice()))
    }

    pub fn find(&self, id: u64) -> Option<&Task> {
        self.columns.values().flatten().find(|t| t.id == id)
    }

    pub fn remove(&mut self, id: u64) -> Option<Task> {
        for tasks in self.columns.values_mut() {
            if let Some(index) = tasks.iter().position(|t| t.id == id) {
                return Some(tasks.remove(index));
            }
        }
        None
    }

    /// Moves a card to the end of the `to` column.
    pub fn move_task(&mut self, id: u64, to: TaskStatus) -> MoveOutcome {
        let from = match self.find(id) {
            Some(task) => task.status,
            None => return MoveOutcome::NotFound,
        };
        if from == to {
            return MoveOutcome::Unchanged;
        }
        if let Some(mut task) = self.remove(id) {
            task.status = to;
            self.insert(task);
        }
        MoveOutcome::Moved { from, to }
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Share of tasks in the done column, from 0 to 100.
    pub fn progress(&self) -> u8 {
        let total = self.len();
        if total == 0 {
            return 0;
        }
        let done = self.column(TaskStatus::Done).len();
        ((done * 100) / total) as u8
    }
}
