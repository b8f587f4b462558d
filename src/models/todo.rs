use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Progress of a to-do item.
/// Corresponds to the `todo_status` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "todo_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

/// Corresponds to the `todo_priority` SQL enum.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "todo_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TodoPriority {
    #[default]
    Low,
    Medium,
    High,
}

/// Represents a to-do entity as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    /// Owner of the item. Deleting the user deletes its items.
    pub user_id: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub status: TodoStatus,
    pub priority: TodoPriority,
    pub user_id: i32,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Partial update of a to-do item; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub priority: Option<TodoPriority>,
    pub user_id: Option<i32>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TodoChanges {
    /// Changes that close the item now.
    pub fn complete_now() -> Self {
        Self {
            status: Some(TodoStatus::Completed),
            completed_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn apply(self, todo: &mut Todo) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        if let Some(description) = self.description {
            todo.description = description;
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(user_id) = self.user_id {
            todo.user_id = user_id;
        }
        if let Some(completed_at) = self.completed_at {
            todo.completed_at = Some(completed_at);
        }
        todo.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_todo() -> Todo {
        let now = Utc::now();
        Todo {
            id: 1,
            title: "Buy milk".to_string(),
            description: "Two litres".to_string(),
            status: TodoStatus::Pending,
            priority: TodoPriority::Low,
            user_id: 3,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(TodoStatus::InProgress).unwrap(),
            "in-progress"
        );
        let parsed: TodoStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, TodoStatus::Completed);
        assert!(serde_json::from_str::<TodoStatus>("\"done\"").is_err());
    }

    #[test]
    fn test_todo_serializes_camel_case() {
        let json = serde_json::to_value(sample_todo()).unwrap();
        assert_eq!(json["userId"], 3);
        assert!(json["completedAt"].is_null());
        assert_eq!(json["priority"], "low");
    }

    #[test]
    fn test_complete_now_changes() {
        let mut todo = sample_todo();
        TodoChanges::complete_now().apply(&mut todo);
        assert_eq!(todo.status, TodoStatus::Completed);
        assert!(todo.completed_at.is_some());
        assert_eq!(todo.title, "Buy milk");
    }

    #[test]
    fn test_partial_changes_keep_other_fields() {
        let mut todo = sample_todo();
        TodoChanges {
            status: Some(TodoStatus::InProgress),
            ..TodoChanges::default()
        }
        .apply(&mut todo);
        assert_eq!(todo.status, TodoStatus::InProgress);
        assert_eq!(todo.description, "Two litres");
        assert_eq!(todo.user_id, 3);
    }
}
