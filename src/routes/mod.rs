pub mod auth;
pub mod docs;
pub mod health;
pub mod todos;
pub mod users;

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Body extraction failures answer 400 with a `{message}` body like every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        let message = match &err {
            JsonPayloadError::ContentType => "Content type must be application/json".to_string(),
            JsonPayloadError::Deserialize(e) => e.to_string(),
            other => other.to_string(),
        };
        AppError::BadRequest(message).into()
    })
}

pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid query string: {}", err)).into()
    })
}

/// Registers the extractor configs and every route of the service.
///
/// `/api/users` and `/api/todos` sit behind `AuthMiddleware`; the auth
/// endpoints, health check and API document do not.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .service(health::health)
        .service(web::scope("/api-docs").service(docs::openapi))
        .service(
            web::scope("/api/auth")
                .service(auth::register)
                .service(auth::login)
                .service(auth::reissue_token),
        )
        .service(
            web::scope("/api/users")
                .wrap(AuthMiddleware)
                .service(users::list_users)
                .service(users::get_user_profile)
                .service(users::get_user)
                .service(users::update_user)
                .service(users::delete_user),
        )
        .service(
            web::scope("/api/todos")
                .wrap(AuthMiddleware)
                // before the `{todo_id}` routes
                .service(todos::search_todos)
                .service(todos::create_todo)
                .service(todos::update_todo)
                .service(todos::delete_todo)
                .service(todos::update_status)
                .service(todos::mark_as_complete),
        );
}
