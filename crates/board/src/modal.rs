use chrono::NaiveDate;
use client::{ClientError, TaskApi, TaskStore};
use serde_json::json;
use tasks_protocol::{
    Task, TaskDraft, TaskStatus, TaskSummary, ValidationErrors, validate_task_input,
    validation::FIELD_DUE_DATE,
};
use thiserror::Error;
use uuid::Uuid;

pub const CREATED_NOTICE: &str = "New task has been created successfully!";
pub const PAST_DEADLINE_MESSAGE: &str = "Deadline cannot be in the past";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
    DueDate,
    Status,
}

impl FormField {
    const ORDER: [FormField; 4] = [
        FormField::Title,
        FormField::Description,
        FormField::DueDate,
        FormField::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Task Name",
            FormField::Description => "Description",
            FormField::DueDate => "Deadline (YYYY-MM-DD)",
            FormField::Status => "Status",
        }
    }

    fn index(self) -> usize {
        Self::ORDER
            .iter()
            .position(|field| *field == self)
            .unwrap_or_default()
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Error)]
pub enum FormError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Add/edit task modal state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub mode: FormMode,
    pub title: String,
    pub description: String,
    pub due_date: String,
    pub status: TaskStatus,
    pub focus: FormField,
    /// Field errors from the last failed submit.
    pub errors: ValidationErrors,
}

impl TaskForm {
    pub fn add() -> Self {
        Self {
            mode: FormMode::Add,
            title: String::new(),
            description: String::new(),
            due_date: String::new(),
            status: TaskStatus::Todo,
            focus: FormField::Title,
            errors: ValidationErrors::default(),
        }
    }

    pub fn edit(task: &TaskSummary) -> Self {
        Self {
            mode: FormMode::Edit(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.to_string(),
            status: task.status,
            focus: FormField::Title,
            errors: ValidationErrors::default(),
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add Task",
            FormMode::Edit(_) => "Edit Task",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Add => "Add Task",
            FormMode::Edit(_) => "Update Task",
        }
    }

    pub fn next_field(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_field(&mut self) {
        self.focus = self.focus.prev();
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::DueDate => Some(&mut self.due_date),
            FormField::Status => None,
        }
    }

    /// Types into the focused text field. On the status field any key cycles.
    pub fn input(&mut self, c: char) {
        match self.focused_text() {
            Some(text) => text.push(c),
            None => self.cycle_status(),
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    pub fn cycle_status(&mut self) {
        self.status = self.status.next();
    }

    /// Runs the form through the same validator the server uses.
    ///
    /// A new task may not be given a deadline before `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<TaskDraft, ValidationErrors> {
        let checked = validate_task_input(&json!({
            "title": self.title,
            "description": self.description,
            "dueDate": self.due_date.trim(),
            "status": self.status.to_string(),
        }));
        match checked {
            Ok(draft) if self.mode == FormMode::Add && draft.due_date < today => Err(
                ValidationErrors::single(FIELD_DUE_DATE, PAST_DEADLINE_MESSAGE),
            ),
            other => other,
        }
    }

    /// Validates, then creates or updates through the store.
    ///
    /// Errors are also kept on the form so they can be shown next to it.
    pub async fn submit<A: TaskApi>(
        &mut self,
        store: &mut TaskStore<A>,
        today: NaiveDate,
    ) -> Result<Task, FormError> {
        let draft = match self.validate(today) {
            Ok(draft) => draft,
            Err(errors) => {
                self.errors = errors.clone();
                return Err(errors.into());
            }
        };

        let result = match self.mode {
            FormMode::Add => store.create_task(&draft).await,
            FormMode::Edit(id) => store.update_task(id, &draft).await,
        };
        match result {
            Ok(task) => {
                self.errors = ValidationErrors::default();
                Ok(task)
            }
            Err(err) => {
                if let Some(errors) = err.validation_errors() {
                    self.errors = errors.clone();
                }
                Err(err.into())
            }
        }
    }
}
