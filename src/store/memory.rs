use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, TodoStore, UserDirectory, DUPLICATE_ACCOUNT_MESSAGE};
use crate::models::{NewTodo, NewUser, Todo, TodoChanges, User, UserChanges};

#[derive(Default)]
struct MemoryState {
    users: BTreeMap<i32, User>,
    todos: BTreeMap<i32, Todo>,
    next_user_id: i32,
    next_todo_id: i32,
}

impl MemoryState {
    /// Whether another user already holds `username` or `email`.
    fn collides(&self, except: Option<i32>, username: Option<&str>, email: Option<&str>) -> bool {
        self.users.values().any(|user| {
            Some(user.id) != except
                && (username == Some(user.username.as_str()) || email == Some(user.email.as_str()))
        })
    }
}

/// In-process store implementing both `UserDirectory` and `TodoStore`.
///
/// Uniqueness is checked under the write lock, so concurrent creates with the
/// same username behave like a database unique constraint. Deleting a user
/// removes its to-do items.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        if state.collides(None, Some(&user.username), Some(&user.email)) {
            return Err(StoreError::Conflict(DUPLICATE_ACCOUNT_MESSAGE.to_string()));
        }

        state.next_user_id += 1;
        let now = Utc::now();
        let created = User {
            id: state.next_user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .find(|user| user.username == username || user.email == email)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.state.read().await.users.values().cloned().collect())
    }

    async fn update(&self, id: i32, changes: UserChanges) -> Result<Option<User>, StoreError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Ok(None);
        }
        if state.collides(Some(id), changes.username.as_deref(), changes.email.as_deref()) {
            return Err(StoreError::Conflict(DUPLICATE_ACCOUNT_MESSAGE.to_string()));
        }

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            user.username = username;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        let mut state = self.state.write().await;
        if state.users.remove(&id).is_none() {
            return Ok(false);
        }
        state.todos.retain(|_, todo| todo.user_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn create(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&todo.user_id) {
            return Err(StoreError::Database(format!(
                "user {} does not exist",
                todo.user_id
            )));
        }

        state.next_todo_id += 1;
        let now = Utc::now();
        let created = Todo {
            id: state.next_todo_id,
            title: todo.title,
            description: todo.description,
            status: todo.status,
            priority: todo.priority,
            user_id: todo.user_id,
            completed_at: todo.completed_at,
            created_at: now,
            updated_at: now,
        };
        state.todos.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Todo>, StoreError> {
        Ok(self.state.read().await.todos.get(&id).cloned())
    }

    async fn list_for_user(&self, user_id: i32) -> Result<Vec<Todo>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .todos
            .values()
            .rev()
            .filter(|todo| todo.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: i32, changes: TodoChanges) -> Result<Option<Todo>, StoreError> {
        let mut state = self.state.write().await;
        if let Some(user_id) = changes.user_id {
            if !state.users.contains_key(&user_id) {
                return Err(StoreError::Database(format!("user {} does not exist", user_id)));
            }
        }
        Ok(state.todos.get_mut(&id).map(|todo| {
            changes.apply(todo);
            todo.clone()
        }))
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.state.write().await.todos.remove(&id).is_some())
    }

    async fn search_by_title(&self, user_id: i32, title: &str) -> Result<Vec<Todo>, StoreError> {
        let needle = title.to_lowercase();
        let state = self.state.read().await;
        Ok(state
            .todos
            .values()
            .filter(|todo| todo.user_id == user_id && todo.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }
}
