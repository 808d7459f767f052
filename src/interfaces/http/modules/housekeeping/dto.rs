//! Housekeeping DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::domain::{HousekeepingTask, TaskChanges, TaskPriority, TaskStatus, TaskType};
use crate::shared::{DomainResult, PageRequest};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HousekeepingTaskDto {
    pub id: String,
    pub room_id: String,
    /// cleaning, maintenance, inspection
    pub task_type: String,
    /// pending, in-progress, completed
    pub status: String,
    /// low, medium, high
    pub priority: String,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub scheduled_for: Option<NaiveDate>,
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<HousekeepingTask> for HousekeepingTaskDto {
    fn from(t: HousekeepingTask) -> Self {
        Self {
            id: t.id,
            room_id: t.room_id,
            task_type: t.task_type.as_str().to_string(),
            status: t.status.to_string(),
            priority: t.priority.as_str().to_string(),
            assigned_to: t.assigned_to,
            notes: t.notes,
            scheduled_for: t.scheduled_for,
            completed_at: t.completed_at.map(|d| d.to_rfc3339()),
            created_at: t.created_at.to_rfc3339(),
            updated_at: t.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub room_id: String,
    pub task_type: String,
    /// Defaults to medium
    pub priority: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub assigned_to: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
    pub scheduled_for: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTaskRequest {
    pub task_type: Option<String>,
    /// Setting `completed` completes the task
    pub status: Option<String>,
    pub priority: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub assigned_to: Option<String>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub notes: Option<String>,
    pub scheduled_for: Option<NaiveDate>,
}

impl UpdateTaskRequest {
    pub fn into_changes(self) -> DomainResult<TaskChanges> {
        Ok(TaskChanges {
            task_type: self.task_type.as_deref().map(str::parse::<TaskType>).transpose()?,
            status: self.status.as_deref().map(str::parse::<TaskStatus>).transpose()?,
            priority: self.priority.as_deref().map(str::parse::<TaskPriority>).transpose()?,
            assigned_to: self.assigned_to,
            notes: self.notes,
            scheduled_for: self.scheduled_for,
        })
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTasksParams {
    pub status: Option<String>,
    pub room_id: Option<String>,
    pub priority: Option<String>,
    pub task_type: Option<String>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl ListTasksParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }
}
