use actix_web::{get, post, web, HttpResponse, Responder};
use log::{info, warn};
use validator::Validate;

use crate::{
    auth::{
        hash_password,
        password::verify_unknown_user,
        verify_password,
        AuthResponse,
        LoginRequest,
        RegisterRequest,
    },
    error::AppError,
    models::{NewUser, PublicUser},
    state::AppState,
    store::DUPLICATE_ACCOUNT_MESSAGE,
};

/// Register a new user
///
/// Creates a new user account and returns an authentication token.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    register_data.validate()?;
    let RegisterRequest {
        username,
        email,
        password,
    } = register_data.into_inner();

    if state
        .users
        .find_by_username_or_email(&username, &email)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(DUPLICATE_ACCOUNT_MESSAGE.into()));
    }

    let password_hash = web::block(move || hash_password(&password)).await??;

    // A concurrent registration can still win the race; the store reports it as a conflict.
    let user = state
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
        })
        .await?;

    let token = state.tokens.issue(user.id)?;
    info!("registered user {} ({})", user.id, user.username);

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".into(),
        user: PublicUser::from(&user),
        token,
    }))
}

/// Login user
///
/// Authenticates a user by username and password and returns an authentication token.
/// Unknown usernames and wrong passwords get the same answer, and both cost one
/// bcrypt verification.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    login_data.validate()?;
    let LoginRequest { username, password } = login_data.into_inner();

    let user = match state.users.find_by_username(&username).await? {
        Some(user) => user,
        None => {
            let mismatch = web::block(move || verify_unknown_user(&password)).await?;
            return Err(mismatch.into());
        }
    };

    let password_hash = user.password_hash.clone();
    web::block(move || verify_password(&password, &password_hash)).await??;

    let token = state.tokens.issue(user.id)?;
    info!("user {} logged in", user.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".into(),
        user: PublicUser::from(&user),
        token,
    }))
}

/// Issue a fresh token for a user
///
/// Not behind the authentication gate, so every call is logged.
#[get("/token/{user_id}")]
pub async fn reissue_token(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<impl Responder, AppError> {
    let user_id = path.into_inner();
    warn!("unauthenticated token reissue requested for user {}", user_id);

    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let token = state.tokens.issue(user.id)?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Token generated successfully".into(),
        user: PublicUser::from(&user),
        token,
    }))
}
