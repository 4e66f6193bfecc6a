//! Wire types shared by the task server, the client store and the board.

mod task;
pub mod validation;

pub use task::{MessageResponse, Task, TaskDraft, TaskStatus, TaskSummary};
pub use validation::{FieldError, ValidationErrors, validate_task_input};

pub const TASK_NOT_FOUND_MESSAGE: &str = "Task not found";
pub const TASK_DELETED_MESSAGE: &str = "Task deleted";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
