//! Field-by-field validation of untrusted task input.
//!
//! Every violation is collected, so a single response can tell the caller
//! about all the fields that need fixing.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use ts_rs::TS;

use crate::task::{TaskDraft, TaskStatus};

pub const FIELD_BODY: &str = "body";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_DUE_DATE: &str = "dueDate";
pub const FIELD_STATUS: &str = "status";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("invalid task input: {}", join_fields(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            errors: vec![FieldError::new(field, message)],
        }
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Names of the failing fields, in the order they were checked.
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validates a JSON body against the task schema.
///
/// Unknown keys (including a client supplied `id`) are ignored.
pub fn validate_task_input(input: &Value) -> Result<TaskDraft, ValidationErrors> {
    let Some(object) = input.as_object() else {
        return Err(ValidationErrors::single(
            FIELD_BODY,
            "Expected a JSON object",
        ));
    };

    let mut errors = ValidationErrors::default();

    let title = required_string(object, FIELD_TITLE, "Title", &mut errors);
    let title = match title {
        Some(title) if title.trim().is_empty() => {
            errors.push(FIELD_TITLE, "Title cannot be empty");
            None
        }
        other => other,
    };
    let description = required_string(object, FIELD_DESCRIPTION, "Description", &mut errors);
    let due_date = required_string(object, FIELD_DUE_DATE, "Due date", &mut errors).and_then(
        |raw| match parse_due_date(&raw) {
            Some(date) => Some(date),
            None => {
                errors.push(
                    FIELD_DUE_DATE,
                    format!("Due date must be an ISO date (YYYY-MM-DD), got '{raw}'"),
                );
                None
            }
        },
    );
    let status = optional_status(object, &mut errors);

    match (title, description, due_date) {
        (Some(title), Some(description), Some(due_date)) if errors.is_empty() => Ok(TaskDraft {
            title,
            description,
            due_date,
            status,
        }),
        _ => Err(errors),
    }
}

fn required_string(
    object: &Map<String, Value>,
    field: &str,
    label: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => {
            errors.push(field, format!("{label} is required"));
            None
        }
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            errors.push(field, format!("{label} must be a string"));
            None
        }
    }
}

fn optional_status(
    object: &Map<String, Value>,
    errors: &mut ValidationErrors,
) -> Option<TaskStatus> {
    let invalid = || {
        let allowed = TaskStatus::ALL
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!("Status must be one of: {allowed}")
    };

    match object.get(FIELD_STATUS) {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => match TaskStatus::from_str(raw) {
            Ok(status) => Some(status),
            Err(_) => {
                errors.push(FIELD_STATUS, invalid());
                None
            }
        },
        Some(_) => {
            errors.push(FIELD_STATUS, invalid());
            None
        }
    }
}

/// Accepts a calendar date, or a full timestamp whose date part is used.
fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
