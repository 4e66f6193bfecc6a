use tasks_protocol::{Task, TaskDraft, TaskSummary};
use uuid::Uuid;

use crate::{ClientError, TaskApi};

/// In-memory mirror of the server's task list.
///
/// Remote operations only touch local state once the backend call has
/// succeeded. Failures are logged and handed back to the caller.
pub struct TaskStore<A> {
    api: A,
    tasks: Vec<TaskSummary>,
    selected: Option<Task>,
}

impl<A: TaskApi> TaskStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            tasks: Vec::new(),
            selected: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn tasks(&self) -> &[TaskSummary] {
        &self.tasks
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected.as_ref()
    }

    pub fn find(&self, id: Uuid) -> Option<&TaskSummary> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn set_tasks(&mut self, tasks: Vec<TaskSummary>) {
        self.tasks = tasks;
    }

    pub fn set_selected(&mut self, task: Option<Task>) {
        self.selected = task;
    }

    pub fn add_local(&mut self, task: TaskSummary) {
        self.tasks.push(task);
    }

    /// Returns false when no local task has the same id.
    pub fn replace_local(&mut self, task: TaskSummary) -> bool {
        match self.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => {
                *existing = task;
                true
            }
            None => false,
        }
    }

    pub fn remove_local(&mut self, id: Uuid) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub async fn fetch_tasks(&mut self) -> Result<&[TaskSummary], ClientError> {
        let tasks = self
            .api
            .list()
            .await
            .inspect_err(|err| tracing::error!(error = %err, "Failed to fetch tasks"))?;
        tracing::debug!(count = tasks.len(), "Fetched tasks");
        self.tasks = tasks;
        Ok(&self.tasks)
    }

    pub async fn fetch_task(&mut self, id: Uuid) -> Result<&Task, ClientError> {
        let task = self
            .api
            .get(id)
            .await
            .inspect_err(|err| {
                tracing::error!(task_id = %id, error = %err, "Failed to fetch task")
            })?;
        Ok(self.selected.insert(task))
    }

    pub async fn create_task(&mut self, draft: &TaskDraft) -> Result<Task, ClientError> {
        let task = self
            .api
            .create(draft)
            .await
            .inspect_err(|err| tracing::error!(error = %err, "Failed to create task"))?;
        self.add_local(TaskSummary::from(&task));
        Ok(task)
    }

    pub async fn update_task(&mut self, id: Uuid, draft: &TaskDraft) -> Result<Task, ClientError> {
        let task = self
            .api
            .update(id, draft)
            .await
            .inspect_err(|err| {
                tracing::error!(task_id = %id, error = %err, "Failed to update task")
            })?;

        if !self.replace_local(TaskSummary::from(&task)) {
            tracing::warn!(task_id = %id, "Updated task was not in the local list");
        }
        if self.selected.as_ref().is_some_and(|selected| selected.id == id) {
            self.selected = Some(task.clone());
        }
        Ok(task)
    }

    pub async fn delete_task(&mut self, id: Uuid) -> Result<(), ClientError> {
        self.api
            .delete(id)
            .await
            .inspect_err(|err| {
                tracing::error!(task_id = %id, error = %err, "Failed to delete task")
            })?;

        self.remove_local(id);
        if self.selected.as_ref().is_some_and(|selected| selected.id == id) {
            self.selected = None;
        }
        Ok(())
    }
}
