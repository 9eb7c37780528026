//! Typed services over the tracker's REST resources.
//!
//! - `users`: account administration.
//! - `projects`: projects, subjects, group repartition and attachments.
//! - `tasks`: a student's personal tasks.
//! - `task_board`: status columns built from a task list.
//! - `types`: the records and forms exchanged with the server.

pub mod projects;
pub mod task_board;
pub mod tasks;
pub mod types;
pub mod users;

pub use projects::ProjectService;
pub use task_board::{MoveOutcome, TaskBoard};
pub use tasks::TaskService;
pub use types::{
    Group, GroupMember, Project, ProjectPayload, Subject, SubjectPayload, Task, TaskPayload,
    TaskPriority, TaskStatus, UserPayload,
};
pub use users::UserService;
