//! Housekeeping service
//!
//! Completing a cleaning task stamps the room's `last_cleaned` time in the
//! same unit of work. Room status is not changed here.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;

use crate::domain::{
    finish, DomainError, DomainResult, HousekeepingTask, TaskChanges, UnitOfWork, WorkScope,
};

pub struct HousekeepingService {
    uow: Arc<dyn UnitOfWork>,
}

impl HousekeepingService {
    pub fn new(uow: Arc<dyn UnitOfWork>) -> Self {
        Self { uow }
    }

    pub async fn complete(&self, id: &str) -> DomainResult<HousekeepingTask> {
        let mut scope = self.uow.begin().await?;
        let result = complete_within(scope.as_mut(), id, Utc::now()).await;
        let task = finish(scope, result).await?;
        info!("Housekeeping task {} completed (room {})", task.id, task.room_id);
        Ok(task)
    }

    /// Edit a task. Setting the status to completed takes the same path as
    /// [`Self::complete`].
    pub async fn update(&self, id: &str, changes: TaskChanges) -> DomainResult<HousekeepingTask> {
        let mut scope = self.uow.begin().await?;
        let result = update_within(scope.as_mut(), id, changes, Utc::now()).await;
        finish(scope, result).await
    }
}

async fn load(scope: &mut dyn WorkScope, id: &str) -> DomainResult<HousekeepingTask> {
    scope
        .housekeeping_task(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Housekeeping task", id))
}

async fn complete_within(
    scope: &mut dyn WorkScope,
    id: &str,
    now: DateTime<Utc>,
) -> DomainResult<HousekeepingTask> {
    let mut task = load(scope, id).await?;
    task.complete(now)?;
    persist(scope, task, true, now).await
}

async fn update_within(
    scope: &mut dyn WorkScope,
    id: &str,
    changes: TaskChanges,
    now: DateTime<Utc>,
) -> DomainResult<HousekeepingTask> {
    let mut task = load(scope, id).await?;
    let completed = task.apply_changes(changes, now)?;
    persist(scope, task, completed, now).await
}

async fn persist(
    scope: &mut dyn WorkScope,
    task: HousekeepingTask,
    completed: bool,
    now: DateTime<Utc>,
) -> DomainResult<HousekeepingTask> {
    if !scope.save_housekeeping_task(&task).await? {
        return Err(DomainError::not_found("Housekeeping task", &task.id));
    }
    if completed
        && task.marks_room_cleaned()
        && !scope.mark_room_cleaned(&task.room_id, now).await?
    {
        return Err(DomainError::not_found("Room", &task.room_id));
    }
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Room, RoomStatus, RoomType, TaskPriority, TaskStatus, TaskType};
    use crate::infrastructure::InMemoryUnitOfWork;

    async fn setup(task_type: TaskType) -> (InMemoryUnitOfWork, HousekeepingService, String, String) {
        let store = InMemoryUnitOfWork::new();
        let mut room = Room::new("12", RoomType::Twin, 1, 2, 90);
        room.status = RoomStatus::Cleaning;
        let task = HousekeepingTask::new(room.id.clone(), task_type, TaskPriority::High);
        let (room_id, task_id) = (room.id.clone(), task.id.clone());
        store
            .seed(|s| {
                s.rooms.insert(room.id.clone(), room);
                s.housekeeping_tasks.insert(task.id.clone(), task);
            })
            .await;
        let service = HousekeepingService::new(Arc::new(store.clone()));
        (store, service, room_id, task_id)
    }

    #[tokio::test]
    async fn completing_cleaning_stamps_last_cleaned() {
        let (store, service, room_id, task_id) = setup(TaskType::Cleaning).await;

        let task = service.complete(&task_id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Completed);

        let state = store.snapshot().await;
        let room = &state.rooms[&room_id];
        assert_eq!(room.last_cleaned, task.completed_at);
        assert_eq!(room.status, RoomStatus::Cleaning);
    }

    #[tokio::test]
    async fn completing_twice_is_rejected() {
        let (store, service, _, task_id) = setup(TaskType::Cleaning).await;
        service.complete(&task_id).await.unwrap();
        let before = store.snapshot().await;

        let err = service.complete(&task_id).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(before.rooms, store.snapshot().await.rooms);
    }

    #[tokio::test]
    async fn inspection_does_not_touch_the_room() {
        let (store, service, room_id, task_id) = setup(TaskType::Inspection).await;
        service.complete(&task_id).await.unwrap();
        assert!(store.snapshot().await.rooms[&room_id].last_cleaned.is_none());
    }

    #[tokio::test]
    async fn update_to_completed_takes_the_completion_path() {
        let (store, service, room_id, task_id) = setup(TaskType::Cleaning).await;
        let task = service
            .update(
                &task_id,
                TaskChanges {
                    status: Some(TaskStatus::Completed),
                    assigned_to: Some("maria".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(task.completed_at.is_some());
        assert_eq!(task.assigned_to.as_deref(), Some("maria"));
        assert!(store.snapshot().await.rooms[&room_id].last_cleaned.is_some());
    }

    #[tokio::test]
    async fn unknown_task_is_not_found() {
        let (_, service, _, _) = setup(TaskType::Cleaning).await;
        let err = service.complete("missing").await.unwrap_err();
        assert_eq!(err.to_string(), "Housekeeping task not found");
    }
}
