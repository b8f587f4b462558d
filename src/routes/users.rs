use actix_web::{delete, get, put, web, HttpResponse, Responder};
use log::info;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{
    auth::{hash_password, AuthenticatedUser},
    error::AppError,
    models::{User, UserChanges, UserProfile, UserWithTodos},
    state::AppState,
};

/// Partial profile update. Omitted fields keep their current value.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(
            min = 3,
            max = 20,
            message = "\"username\" length must be between 3 and 20 characters"
        ),
        regex(
            path = "crate::auth::USERNAME_REGEX",
            message = "\"username\" must not contain whitespace"
        )
    )]
    pub username: Option<String>,
    #[validate(
        email(message = "\"email\" must be a valid email"),
        length(max = 255, message = "\"email\" length must be at most 255 characters")
    )]
    pub email: Option<String>,
    /// At most 72 bytes, the most bcrypt reads.
    #[validate(
        length(
            min = 6,
            max = 255,
            message = "\"password\" length must be between 6 and 255 characters"
        ),
        custom = "crate::auth::password::validate_password_bytes"
    )]
    pub password: Option<String>,
}

async fn find_user(state: &AppState, id: i32) -> Result<User, AppError> {
    state
        .users
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))
}

async fn with_todos(state: &AppState, user: &User) -> Result<UserWithTodos, AppError> {
    Ok(UserWithTodos {
        user: UserProfile::from(user),
        todos: state.todos.list_for_user(user.id).await?,
    })
}

/// Lists every user together with their to-do items.
#[get("")]
pub async fn list_users(
    state: web::Data<AppState>,
    _caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let users = state.users.list().await?;

    let mut body = Vec::with_capacity(users.len());
    for user in &users {
        body.push(with_todos(&state, user).await?);
    }
    Ok(HttpResponse::Ok().json(body))
}

/// One user with their to-do items, newest first.
#[get("/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user = find_user(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(with_todos(&state, &user).await?))
}

#[get("/{id}/profile")]
pub async fn get_user_profile(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user = find_user(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "User fetched successfully",
        "user": UserProfile::from(&user),
    })))
}

/// Updates username, email and/or password.
///
/// A new password is hashed before it is stored.
#[put("/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    update_data: web::Json<UpdateUserRequest>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    update_data.validate()?;
    let id = path.into_inner();
    let UpdateUserRequest {
        username,
        email,
        password,
    } = update_data.into_inner();

    // 404 before hashing
    find_user(&state, id).await?;

    let password_hash = match password {
        Some(password) => Some(web::block(move || hash_password(&password)).await??),
        None => None,
    };

    let user = state
        .users
        .update(
            id,
            UserChanges {
                username,
                email,
                password_hash,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    info!("user {} updated by user {}", id, caller.id());
    Ok(HttpResponse::Ok().json(json!({
        "message": "User updated successfully",
        "user": UserProfile::from(&user),
    })))
}

/// Deletes a user and all of their to-do items.
#[delete("/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    caller: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let id = path.into_inner();
    if !state.users.delete(id).await? {
        return Err(AppError::NotFound("User not found".into()));
    }

    info!("user {} deleted by user {}", id, caller.id());
    Ok(HttpResponse::Ok().json(json!({ "message": "User deleted successfully" })))
}
