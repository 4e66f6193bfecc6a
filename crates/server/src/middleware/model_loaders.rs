use std::{fmt::Display, future::Future};

use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use db::models::task::{self, Task};
use uuid::Uuid;

use crate::{Deployment, error::ApiError};

/// Resolves a loader future, logging the outcome for `model_name`.
async fn fetch_model_or_error<M, E, Fut>(
    model_name: &'static str,
    model_id: Uuid,
    load_future: Fut,
) -> Result<M, ApiError>
where
    E: Into<ApiError> + Display,
    Fut: Future<Output = Result<Option<M>, E>>,
{
    match load_future.await {
        Ok(Some(model)) => Ok(model),
        Ok(None) => {
            tracing::warn!("{model_name} {model_id} not found");
            Err(ApiError::task_not_found())
        }
        Err(error) => {
            tracing::error!("Failed to fetch {model_name} {model_id}: {error}");
            Err(error.into())
        }
    }
}

async fn load_request_extension<M, E, Fut>(
    mut request: Request,
    next: Next,
    model_name: &'static str,
    model_id: Uuid,
    load_future: Fut,
) -> Result<Response, ApiError>
where
    M: Clone + Send + Sync + 'static,
    E: Into<ApiError> + Display,
    Fut: Future<Output = Result<Option<M>, E>>,
{
    let model = fetch_model_or_error(model_name, model_id, load_future).await?;
    request.extensions_mut().insert(model);
    Ok(next.run(request).await)
}

/// An id that is not a UUID cannot name a stored task, so it is a 404 too.
pub fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        tracing::debug!("Rejecting malformed task id '{raw}'");
        ApiError::task_not_found()
    })
}

/// Loads the task named by `{task_id}` into the request extensions.
pub async fn load_task_middleware(
    State(deployment): State<Deployment>,
    Path(task_id): Path<String>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let task_id = parse_task_id(&task_id)?;

    load_request_extension::<Task, _, _>(
        request,
        next,
        "Task",
        task_id,
        task::find_by_id(&deployment.db().pool, task_id),
    )
    .await
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};
    use db::DbErr;

    use super::{fetch_model_or_error, parse_task_id};

    #[test]
    fn parse_task_id_rejects_non_uuid_as_not_found() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_task_id(&id.to_string()).unwrap(), id);

        let err = parse_task_id("unknown-id").unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn fetch_model_or_error_returns_not_found_on_missing_model() {
        let result = fetch_model_or_error::<String, DbErr, _>(
            "Task",
            uuid::Uuid::new_v4(),
            async { Ok(None) },
        )
        .await;

        assert_eq!(
            result.unwrap_err().into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn fetch_model_or_error_returns_internal_error_on_fetch_failure() {
        let result = fetch_model_or_error::<String, DbErr, _>(
            "Task",
            uuid::Uuid::new_v4(),
            async { Err(DbErr::Custom("db unavailable".into())) },
        )
        .await;

        assert_eq!(
            result.unwrap_err().into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn fetch_model_or_error_passes_the_model_through() {
        let result = fetch_model_or_error::<&str, DbErr, _>(
            "Task",
            uuid::Uuid::new_v4(),
            async { Ok(Some("found")) },
        )
        .await;

        assert_eq!(result.unwrap(), "found");
    }
}
