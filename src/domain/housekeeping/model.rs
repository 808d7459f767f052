//! Housekeeping task domain entity

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use crate::shared::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskType {
    Cleaning,
    Maintenance,
    Inspection,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cleaning => "cleaning",
            Self::Maintenance => "maintenance",
            Self::Inspection => "inspection",
        }
    }
}

impl FromStr for TaskType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cleaning" => Ok(Self::Cleaning),
            "maintenance" => Ok(Self::Maintenance),
            "inspection" => Ok(Self::Inspection),
            other => Err(DomainError::Validation(format!(
                "Unknown task type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(DomainError::Validation(format!(
                "Unknown task status '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

impl FromStr for TaskPriority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(DomainError::Validation(format!(
                "Unknown task priority '{}'",
                other
            ))),
        }
    }
}

pub const POST_CHECKOUT_NOTE: &str = "post-checkout cleaning";

/// Unit of housekeeping work on a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HousekeepingTask {
    pub id: String,
    pub room_id: String,
    pub task_type: TaskType,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub scheduled_for: Option<NaiveDate>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl HousekeepingTask {
    pub fn new(room_id: impl Into<String>, task_type: TaskType, priority: TaskPriority) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            room_id: room_id.into(),
            task_type,
            status: TaskStatus::Pending,
            priority,
            assigned_to: None,
            notes: None,
            scheduled_for: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// High-priority cleaning queued when a guest checks out.
    pub fn post_checkout(room_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        let mut task = Self::new(room_id, TaskType::Cleaning, TaskPriority::High);
        task.notes = Some(POST_CHECKOUT_NOTE.to_string());
        task.created_at = now;
        task.updated_at = now;
        task
    }

    pub fn complete(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.status == TaskStatus::Completed {
            return Err(DomainError::InvalidState(
                "Housekeeping task is already completed".to_string(),
            ));
        }
        self.status = TaskStatus::Completed;
        self.completed_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Completing a cleaning task stamps the room's last-cleaned time.
    pub fn marks_room_cleaned(&self) -> bool {
        self.task_type == TaskType::Cleaning && self.status == TaskStatus::Completed
    }
}

/// Partial update of a task
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    pub task_type: Option<TaskType>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub scheduled_for: Option<NaiveDate>,
}

impl HousekeepingTask {
    /// Apply an edit. Moving into `completed` goes through [`Self::complete`];
    /// moving out of it clears the completion time.
    ///
    /// Returns true when the edit completed the task.
    pub fn apply_changes(&mut self, changes: TaskChanges, now: DateTime<Utc>) -> DomainResult<bool> {
        if let Some(task_type) = changes.task_type {
            self.task_type = task_type;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
        if changes.assigned_to.is_some() {
            self.assigned_to = changes.assigned_to;
        }
        if changes.notes.is_some() {
            self.notes = changes.notes;
        }
        if changes.scheduled_for.is_some() {
            self.scheduled_for = changes.scheduled_for;
        }
        self.updated_at = now;

        match changes.status {
            Some(TaskStatus::Completed) if self.status != TaskStatus::Completed => {
                self.complete(now)?;
                Ok(true)
            }
            Some(status) if status != TaskStatus::Completed => {
                self.status = status;
                self.completed_at = None;
                Ok(false)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_checkout_task_shape() {
        let now = Utc::now();
        let task = HousekeepingTask::post_checkout("RM1", now);
        assert_eq!(task.task_type, TaskType::Cleaning);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::High);
        assert_eq!(task.notes.as_deref(), Some(POST_CHECKOUT_NOTE));
        assert_eq!(task.created_at, now);
    }

    #[test]
    fn complete_is_one_shot() {
        let mut task = HousekeepingTask::new("RM1", TaskType::Inspection, TaskPriority::Low);
        task.complete(Utc::now()).unwrap();
        assert!(task.completed_at.is_some());
        assert!(!task.marks_room_cleaned());
        assert!(matches!(
            task.complete(Utc::now()),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn edit_into_completed_stamps_completion() {
        let mut task = HousekeepingTask::new("RM1", TaskType::Cleaning, TaskPriority::Medium);
        let completed = task
            .apply_changes(
                TaskChanges {
                    status: Some(TaskStatus::Completed),
                    notes: Some("done".into()),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert!(completed);
        assert!(task.marks_room_cleaned());

        let reopened = task
            .apply_changes(
                TaskChanges {
                    status: Some(TaskStatus::InProgress),
                    ..Default::default()
                },
                Utc::now(),
            )
            .unwrap();
        assert!(!reopened);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn parses_wire_names() {
        assert_eq!("in-progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("high".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert!("urgent".parse::<TaskPriority>().is_err());
        assert!(TaskPriority::High > TaskPriority::Low);
    }
}
