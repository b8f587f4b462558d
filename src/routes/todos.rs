use actix_web::{delete, get, patch, post, put, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{NewTodo, TodoChanges, TodoPriority, TodoStatus},
    state::AppState,
};

/// Payload for creating a to-do item.
///
/// `status` defaults to `pending` and `priority` to `low`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    #[validate(length(
        min = 3,
        max = 20,
        message = "\"title\" length must be between 3 and 20 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 3,
        max = 255,
        message = "\"description\" length must be between 3 and 255 characters"
    ))]
    pub description: String,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub priority: TodoPriority,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Payload for replacing a to-do item. The owner can be reassigned.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    #[validate(length(
        min = 3,
        max = 20,
        message = "\"title\" length must be between 3 and 20 characters"
    ))]
    pub title: String,
    #[validate(length(
        min = 3,
        max = 255,
        message = "\"description\" length must be between 3 and 255 characters"
    ))]
    pub description: String,
    pub status: TodoStatus,
    pub priority: Option<TodoPriority>,
    pub user_id: i32,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: TodoStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub title: Option<String>,
    pub user_id: Option<i32>,
}

async fn ensure_todo_exists(state: &AppState, todo_id: i32) -> Result<(), AppError> {
    match state.todos.find_by_id(todo_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound("TODO not found".into())),
    }
}

async fn ensure_user_exists(state: &AppState, user_id: i32) -> Result<(), AppError> {
    match state.users.find_by_id(user_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound("User not found".into())),
    }
}

/// Creates a to-do item owned by `user_id`.
#[post("/{user_id}")]
pub async fn create_todo(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    todo_data: web::Json<CreateTodoRequest>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;
    let user_id = path.into_inner();
    ensure_user_exists(&state, user_id).await?;

    let CreateTodoRequest {
        title,
        description,
        status,
        priority,
        completed_at,
    } = todo_data.into_inner();

    let todo = state
        .todos
        .create(NewTodo {
            title,
            description,
            status,
            priority,
            user_id,
            completed_at,
        })
        .await?;

    info!(
        "todo {} created for user {} by user {}",
        todo.id,
        user_id,
        caller.id()
    );
    Ok(HttpResponse::Created().json(json!({
        "message": "TODO created successfully",
        "todo": todo,
    })))
}

#[put("/{todo_id}")]
pub async fn update_todo(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    todo_data: web::Json<UpdateTodoRequest>,
) -> Result<impl Responder, AppError> {
    todo_data.validate()?;
    let todo_id = path.into_inner();
    ensure_todo_exists(&state, todo_id).await?;

    let UpdateTodoRequest {
        title,
        description,
        status,
        priority,
        user_id,
        completed_at,
    } = todo_data.into_inner();
    ensure_user_exists(&state, user_id).await?;

    state
        .todos
        .update(
            todo_id,
            TodoChanges {
                title: Some(title),
                description: Some(description),
                status: Some(status),
                priority,
                user_id: Some(user_id),
                completed_at,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("TODO not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "TODO updated successfully" })))
}

#[delete("/{todo_id}")]
pub async fn delete_todo(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    if !state.todos.delete(path.into_inner()).await? {
        return Err(AppError::NotFound("TODO not found".into()));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "TODO deleted successfully" })))
}

#[patch("/{todo_id}/status")]
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    status_data: web::Json<UpdateStatusRequest>,
) -> Result<impl Responder, AppError> {
    let changes = TodoChanges {
        status: Some(status_data.into_inner().status),
        ..TodoChanges::default()
    };
    state
        .todos
        .update(path.into_inner(), changes)
        .await?
        .ok_or_else(|| AppError::NotFound("TODO not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "TODO status updated successfully" })))
}

/// Sets the status to `completed` and stamps `completedAt`.
#[patch("/{todo_id}/complete")]
pub async fn mark_as_complete(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    state
        .todos
        .update(path.into_inner(), TodoChanges::complete_now())
        .await?
        .ok_or_else(|| AppError::NotFound("TODO not found".into()))?;

    Ok(HttpResponse::Ok().json(json!({ "message": "TODO marked as complete" })))
}

/// Case-insensitive title search within one user's items.
///
/// Both `title` and `userId` are required. A whitespace-only title is a search
/// term like any other. An empty result is a 404.
#[get("/search")]
pub async fn search_todos(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<impl Responder, AppError> {
    let SearchQuery { title, user_id } = query.into_inner();

    let title = title
        .filter(|title| !title.is_empty())
        .ok_or_else(|| AppError::BadRequest("Title query parameter is required".into()))?;
    let user_id =
        user_id.ok_or_else(|| AppError::BadRequest("User ID query parameter is required".into()))?;

    let todos = state.todos.search_by_title(user_id, &title).await?;
    if todos.is_empty() {
        return Err(AppError::NotFound("No todos found".into()));
    }
    Ok(HttpResponse::Ok().json(todos))
}
