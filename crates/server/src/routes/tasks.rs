use axum::{
    Extension, Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, put},
};
use db::models::task::{self, Task};
use serde_json::Value;
use tasks_protocol::{MessageResponse, TASK_DELETED_MESSAGE, TaskSummary, validate_task_input};
use uuid::Uuid;

use crate::{
    Deployment,
    error::ApiError,
    middleware::{load_task_middleware, parse_task_id},
};

pub async fn get_tasks(
    State(deployment): State<Deployment>,
) -> Result<ResponseJson<Vec<TaskSummary>>, ApiError> {
    let tasks = task::find_all(&deployment.db().pool).await?;
    Ok(ResponseJson(tasks.iter().map(TaskSummary::from).collect()))
}

pub async fn get_task(Extension(task): Extension<Task>) -> ResponseJson<Task> {
    ResponseJson(task)
}

pub async fn create_task(
    State(deployment): State<Deployment>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, ResponseJson<Task>), ApiError> {
    let Json(payload) = payload?;
    let draft = validate_task_input(&payload)?;
    let id = Uuid::new_v4();

    tracing::debug!("Creating task '{}' due {}", draft.title, draft.due_date);

    let task = task::create(&deployment.db().pool, &draft, id).await?;
    Ok((StatusCode::CREATED, ResponseJson(task)))
}

/// The body is validated before the task is looked up, so an invalid body is
/// a 400 even for an unknown id.
pub async fn update_task(
    Path(task_id): Path<String>,
    State(deployment): State<Deployment>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<ResponseJson<Task>, ApiError> {
    let Json(payload) = payload?;
    let draft = validate_task_input(&payload)?;
    let task_id = parse_task_id(&task_id)?;

    let task = task::update(&deployment.db().pool, task_id, &draft).await?;
    Ok(ResponseJson(task))
}

pub async fn delete_task(
    Extension(task): Extension<Task>,
    State(deployment): State<Deployment>,
) -> Result<ResponseJson<MessageResponse>, ApiError> {
    let rows_affected = task::delete(&deployment.db().pool, task.id).await?;
    if rows_affected == 0 {
        // removed by another request after the loader ran
        return Err(ApiError::task_not_found());
    }

    tracing::debug!("Deleted task {}", task.id);
    Ok(ResponseJson(MessageResponse::new(TASK_DELETED_MESSAGE)))
}

pub fn router(deployment: &Deployment) -> Router<Deployment> {
    let task_id_router = Router::new()
        .route("/", get(get_task).delete(delete_task))
        .layer(from_fn_with_state(deployment.clone(), load_task_middleware))
        .route("/", put(update_task));

    let inner = Router::new()
        .route("/", get(get_tasks).post(create_task))
        .nest("/{task_id}", task_id_router);

    Router::new().nest("/tasks", inner)
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::{Value, json};

    use crate::test_support::{send, send_raw, test_app};

    fn groceries() -> Value {
        json!({
            "title": "Buy groceries",
            "description": "Milk, eggs",
            "dueDate": "2025-12-01",
            "status": "todo"
        })
    }

    #[tokio::test]
    async fn create_returns_201_with_full_record() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::POST, "/tasks", Some(&groceries())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["title"], "Buy groceries");
        assert_eq!(body["description"], "Milk, eggs");
        assert_eq!(body["dueDate"], "2025-12-01");
        assert_eq!(body["status"], "todo");
        assert!(uuid::Uuid::parse_str(body["id"].as_str().unwrap()).is_ok());
        assert!(body["createdAt"].is_string());
        assert!(body["updatedAt"].is_string());
    }

    #[tokio::test]
    async fn create_defaults_status_and_ignores_client_id() {
        let app = test_app().await;
        let payload = json!({
            "id": "not-yours",
            "title": "Plan trip",
            "description": "",
            "dueDate": "2026-03-14"
        });

        let (status, body) = send(&app, Method::POST, "/tasks", Some(&payload)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["status"], "todo");
        assert_ne!(body["id"], "not-yours");
    }

    #[tokio::test]
    async fn create_reports_every_invalid_field() {
        let app = test_app().await;
        let payload = json!({
            "title": "   ",
            "description": "x",
            "dueDate": "tomorrow",
            "status": "blocked"
        });

        let (status, body) = send(&app, Method::POST, "/tasks", Some(&payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|error| error["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["title", "dueDate", "status"]);

        let (_, list) = send(&app, Method::GET, "/tasks", None).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn malformed_json_is_a_client_error() {
        let app = test_app().await;

        let (status, body) = send_raw(&app, Method::POST, "/tasks", "{\"title\": ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "body");
    }

    #[tokio::test]
    async fn list_returns_summaries_in_creation_order() {
        let app = test_app().await;
        send(&app, Method::POST, "/tasks", Some(&groceries())).await;
        let second = json!({
            "title": "Write report",
            "description": "Q3 numbers",
            "dueDate": "2025-11-20",
            "status": "onProgress"
        });
        send(&app, Method::POST, "/tasks", Some(&second)).await;

        let (status, body) = send(&app, Method::GET, "/tasks", None).await;

        assert_eq!(status, StatusCode::OK);
        let tasks = body.as_array().unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0]["title"], "Buy groceries");
        assert_eq!(tasks[1]["title"], "Write report");
        assert_eq!(tasks[1]["status"], "onProgress");
        let mut keys: Vec<&str> = tasks[0]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["description", "dueDate", "id", "status", "title"]);
    }

    #[tokio::test]
    async fn get_returns_created_task() {
        let app = test_app().await;
        let (_, created) = send(&app, Method::POST, "/tasks", Some(&groceries())).await;
        let uri = format!("/tasks/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::GET, &uri, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, created);
    }

    #[tokio::test]
    async fn get_unknown_or_malformed_id_is_not_found() {
        let app = test_app().await;
        let unknown = format!("/tasks/{}", uuid::Uuid::new_v4());

        let (status, body) = send(&app, Method::GET, &unknown, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Task not found" }));

        let (status, body) = send(&app, Method::GET, "/tasks/unknown-id", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Task not found");
    }

    #[tokio::test]
    async fn update_replaces_fields_and_keeps_identity() {
        let app = test_app().await;
        let (_, created) = send(&app, Method::POST, "/tasks", Some(&groceries())).await;
        let uri = format!("/tasks/{}", created["id"].as_str().unwrap());

        let mut payload = groceries();
        payload["status"] = json!("done");
        let (status, body) = send(&app, Method::PUT, &uri, Some(&payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], created["id"]);
        assert_eq!(body["status"], "done");
        assert_eq!(body["title"], "Buy groceries");
        assert_eq!(body["description"], "Milk, eggs");
        assert_eq!(body["dueDate"], "2025-12-01");
        assert_eq!(body["createdAt"], created["createdAt"]);

        let (_, fetched) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(fetched["status"], "done");
    }

    #[tokio::test]
    async fn update_without_status_keeps_current_status() {
        let app = test_app().await;
        let mut payload = groceries();
        payload["status"] = json!("timeOut");
        let (_, created) = send(&app, Method::POST, "/tasks", Some(&payload)).await;
        let uri = format!("/tasks/{}", created["id"].as_str().unwrap());

        let edit = json!({
            "title": "Buy groceries and bread",
            "description": "Milk, eggs, bread",
            "dueDate": "2025-12-02"
        });
        let (status, body) = send(&app, Method::PUT, &uri, Some(&edit)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["title"], "Buy groceries and bread");
        assert_eq!(body["dueDate"], "2025-12-02");
        assert_eq!(body["status"], "timeOut");
    }

    #[tokio::test]
    async fn update_validates_like_create() {
        let app = test_app().await;
        let (_, created) = send(&app, Method::POST, "/tasks", Some(&groceries())).await;
        let uri = format!("/tasks/{}", created["id"].as_str().unwrap());

        let (status, body) =
            send(&app, Method::PUT, &uri, Some(&json!({ "status": "done" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|error| error["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["title", "description", "dueDate"]);

        let (_, unchanged) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(unchanged, created);
    }

    #[tokio::test]
    async fn update_unknown_id_is_not_found() {
        let app = test_app().await;
        let uri = format!("/tasks/{}", uuid::Uuid::new_v4());

        let (status, body) = send(&app, Method::PUT, &uri, Some(&groceries())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Task not found");
    }

    #[tokio::test]
    async fn update_checks_the_body_before_the_id() {
        let app = test_app().await;
        let unknown = format!("/tasks/{}", uuid::Uuid::new_v4());

        let (status, body) =
            send(&app, Method::PUT, &unknown, Some(&json!({ "status": "bogus" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["errors"].is_array());

        let (status, body) = send_raw(&app, Method::PUT, &unknown, "{\"title\": ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["field"], "body");
    }

    #[tokio::test]
    async fn update_malformed_id_is_not_found() {
        let app = test_app().await;

        let (status, body) = send(&app, Method::PUT, "/tasks/unknown-id", Some(&groceries())).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "message": "Task not found" }));
    }

    #[tokio::test]
    async fn delete_then_get_is_not_found() {
        let app = test_app().await;
        let (_, created) = send(&app, Method::POST, "/tasks", Some(&groceries())).await;
        let uri = format!("/tasks/{}", created["id"].as_str().unwrap());

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "Task deleted" }));

        let (status, _) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_leaves_other_tasks_alone() {
        let app = test_app().await;
        let (_, first) = send(&app, Method::POST, "/tasks", Some(&groceries())).await;
        let mut other = groceries();
        other["title"] = json!("Call plumber");
        let (_, second) = send(&app, Method::POST, "/tasks", Some(&other)).await;

        let uri = format!("/tasks/{}", first["id"].as_str().unwrap());
        send(&app, Method::DELETE, &uri, None).await;

        let (_, list) = send(&app, Method::GET, "/tasks", None).await;
        let list = list.as_array().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0]["id"], second["id"]);
    }
}
