use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tasks_protocol::{
    MessageResponse, TASK_NOT_FOUND_MESSAGE, Task, TaskDraft, TaskSummary, ValidationErrors,
};
use uuid::Uuid;

use crate::ClientError;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";

const BODY_SNIPPET_LIMIT: usize = 200;

/// Backend operations the task store depends on.
#[async_trait]
pub trait TaskApi: Send + Sync {
    async fn list(&self) -> Result<Vec<TaskSummary>, ClientError>;
    async fn get(&self, id: Uuid) -> Result<Task, ClientError>;
    async fn create(&self, draft: &TaskDraft) -> Result<Task, ClientError>;
    async fn update(&self, id: Uuid, draft: &TaskDraft) -> Result<Task, ClientError>;
    async fn delete(&self, id: Uuid) -> Result<MessageResponse, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpTaskApi {
    client: reqwest::Client,
    base_url: String,
}

impl Default for HttpTaskApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

impl HttpTaskApi {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn task_url(&self, id: Uuid) -> String {
        self.url(&format!("/tasks/{id}"))
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        rb: reqwest::RequestBuilder,
        method: &'static str,
        url: &str,
    ) -> Result<T, ClientError> {
        let resp = rb.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, method, url, "Task API request rejected");
            return Err(error_from_response(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn list(&self) -> Result<Vec<TaskSummary>, ClientError> {
        let url = self.url("/tasks");
        self.send_json(self.client.get(&url), "GET", &url).await
    }

    async fn get(&self, id: Uuid) -> Result<Task, ClientError> {
        let url = self.task_url(id);
        self.send_json(self.client.get(&url), "GET", &url).await
    }

    async fn create(&self, draft: &TaskDraft) -> Result<Task, ClientError> {
        let url = self.url("/tasks");
        self.send_json(self.client.post(&url).json(draft), "POST", &url)
            .await
    }

    async fn update(&self, id: Uuid, draft: &TaskDraft) -> Result<Task, ClientError> {
        let url = self.task_url(id);
        self.send_json(self.client.put(&url).json(draft), "PUT", &url)
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        let url = self.task_url(id);
        self.send_json(self.client.delete(&url), "DELETE", &url)
            .await
    }
}

/// Maps a non-success response onto the client error taxonomy.
fn error_from_response(status: StatusCode, body: &str) -> ClientError {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);

    match status {
        StatusCode::NOT_FOUND => {
            ClientError::NotFound(message.unwrap_or_else(|| TASK_NOT_FOUND_MESSAGE.to_string()))
        }
        StatusCode::BAD_REQUEST => match parsed.and_then(|value| {
            serde_json::from_value::<ValidationErrors>(value).ok()
        }) {
            Some(errors) => ClientError::Validation(errors),
            None => ClientError::Status {
                status: status.as_u16(),
                message: message.unwrap_or_else(|| truncate_body(body)),
            },
        },
        _ => ClientError::Status {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| truncate_body(body)),
        },
    }
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(BODY_SNIPPET_LIMIT) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
