use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

pub use tasks_protocol::{Task, TaskDraft, TaskStatus};

use crate::entities::task;

fn from_model(model: task::Model) -> Task {
    Task {
        id: model.uuid,
        title: model.title,
        description: model.description,
        due_date: model.due_date,
        status: model.status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

async fn find_model<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<task::Model>, DbErr> {
    task::Entity::find()
        .filter(task::Column::Uuid.eq(id))
        .one(db)
        .await
}

/// Every task, oldest first.
pub async fn find_all<C: ConnectionTrait>(db: &C) -> Result<Vec<Task>, DbErr> {
    let models = task::Entity::find()
        .order_by_asc(task::Column::Id)
        .all(db)
        .await?;
    Ok(models.into_iter().map(from_model).collect())
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<Option<Task>, DbErr> {
    Ok(find_model(db, id).await?.map(from_model))
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    data: &TaskDraft,
    task_id: Uuid,
) -> Result<Task, DbErr> {
    let now = Utc::now();
    let active = task::ActiveModel {
        uuid: Set(task_id),
        title: Set(data.title.clone()),
        description: Set(data.description.clone()),
        due_date: Set(data.due_date),
        status: Set(data.status.unwrap_or_default()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = active.insert(db).await?;
    tracing::debug!(task_id = %task_id, "Inserted task");
    Ok(from_model(model))
}

/// Overwrites the mutable fields of an existing task.
///
/// A draft without a status leaves the stored status alone.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
    data: &TaskDraft,
) -> Result<Task, DbErr> {
    let record = find_model(db, id)
        .await?
        .ok_or(DbErr::RecordNotFound(
            tasks_protocol::TASK_NOT_FOUND_MESSAGE.to_string(),
        ))?;

    let mut active: task::ActiveModel = record.into();
    active.title = Set(data.title.clone());
    active.description = Set(data.description.clone());
    active.due_date = Set(data.due_date);
    if let Some(status) = data.status {
        active.status = Set(status);
    }
    active.updated_at = Set(Utc::now());

    let updated = active.update(db).await?;
    Ok(from_model(updated))
}

pub async fn delete<C: ConnectionTrait>(db: &C, id: Uuid) -> Result<u64, DbErr> {
    let result = task::Entity::delete_many()
        .filter(task::Column::Uuid.eq(id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
