use actix_web::{get, HttpResponse, Responder};
use lazy_static::lazy_static;
use serde_json::{json, Value};

use crate::auth::AUTH_HEADER;

lazy_static! {
    static ref OPENAPI: Value = openapi_document();
}

fn message_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Message" } } }
    })
}

fn id_param(name: &str, location: &str) -> Value {
    json!({ "in": location, "name": name, "required": true, "schema": { "type": "integer" } })
}

fn json_body(schema: &str) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": { "$ref": format!("#/components/schemas/{}", schema) } } }
    })
}

fn openapi_document() -> Value {
    let open = json!([]);
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "TO-DO API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Authentication and to-do management"
        },
        "components": {
            "securitySchemes": {
                "AuthenticationHeader": { "type": "apiKey", "in": "header", "name": AUTH_HEADER }
            },
            "schemas": {
                "Message": {
                    "type": "object",
                    "properties": { "message": { "type": "string" } }
                },
                "Register": {
                    "type": "object",
                    "required": ["username", "email", "password"],
                    "properties": {
                        "username": { "type": "string", "minLength": 3, "maxLength": 20 },
                        "email": { "type": "string", "format": "email", "maxLength": 255 },
                        "password": { "type": "string", "minLength": 6, "maxLength": 255, "description": "At most 72 bytes" }
                    }
                },
                "Login": {
                    "type": "object",
                    "required": ["username", "password"],
                    "properties": {
                        "username": { "type": "string", "minLength": 1, "maxLength": 20 },
                        "password": { "type": "string", "minLength": 6, "maxLength": 255 }
                    }
                },
                "UpdateUser": {
                    "type": "object",
                    "properties": {
                        "username": { "type": "string", "minLength": 3, "maxLength": 20 },
                        "email": { "type": "string", "format": "email", "maxLength": 255 },
                        "password": { "type": "string", "minLength": 6, "maxLength": 255, "description": "At most 72 bytes" }
                    }
                },
                "AuthResponse": {
                    "type": "object",
                    "properties": {
                        "message": { "type": "string" },
                        "token": { "type": "string" },
                        "user": {
                            "type": "object",
                            "properties": {
                                "id": { "type": "integer" },
                                "username": { "type": "string" },
                                "email": { "type": "string" }
                            }
                        }
                    }
                },
                "Todo": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer" },
                        "title": { "type": "string" },
                        "description": { "type": "string" },
                        "status": { "type": "string", "enum": ["pending", "in-progress", "completed"] },
                        "priority": { "type": "string", "enum": ["low", "medium", "high"] },
                        "userId": { "type": "integer" },
                        "completedAt": { "type": "string", "format": "date-time", "nullable": true },
                        "createdAt": { "type": "string", "format": "date-time" },
                        "updatedAt": { "type": "string", "format": "date-time" }
                    }
                },
                "CreateTodo": {
                    "type": "object",
                    "required": ["title", "description"],
                    "properties": {
                        "title": { "type": "string", "minLength": 3, "maxLength": 20 },
                        "description": { "type": "string", "minLength": 3, "maxLength": 255 },
                        "status": { "type": "string", "enum": ["pending", "in-progress", "completed"] },
                        "priority": { "type": "string", "enum": ["low", "medium", "high"] },
                        "completedAt": { "type": "string", "format": "date-time" }
                    }
                },
                "UpdateTodo": {
                    "type": "object",
                    "required": ["title", "description", "status", "userId"],
                    "properties": {
                        "title": { "type": "string", "minLength": 3, "maxLength": 20 },
                        "description": { "type": "string", "minLength": 3, "maxLength": 255 },
                        "status": { "type": "string", "enum": ["pending", "in-progress", "completed"] },
                        "priority": { "type": "string", "enum": ["low", "medium", "high"] },
                        "userId": { "type": "integer" },
                        "completedAt": { "type": "string", "format": "date-time" }
                    }
                },
                "UpdateStatus": {
                    "type": "object",
                    "required": ["status"],
                    "properties": {
                        "status": { "type": "string", "enum": ["pending", "in-progress", "completed"] }
                    }
                }
            }
        },
        "security": [{ "AuthenticationHeader": [] }],
        "paths": {
            "/api/auth/register": {
                "post": {
                    "tags": ["Auth"], "summary": "Register a new user", "security": open,
                    "requestBody": json_body("Register"),
                    "responses": {
                        "201": { "description": "User registered", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/AuthResponse" } } } },
                        "400": message_response("Validation error, or username or email already exists")
                    }
                }
            },
            "/api/auth/login": {
                "post": {
                    "tags": ["Auth"], "summary": "Log in with username and password", "security": open,
                    "requestBody": json_body("Login"),
                    "responses": {
                        "200": { "description": "Login successful", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/AuthResponse" } } } },
                        "400": message_response("Validation error"),
                        "401": message_response("Invalid credentials")
                    }
                }
            },
            "/api/auth/token/{userId}": {
                "get": {
                    "tags": ["Auth"], "summary": "Issue a fresh token for a user", "security": open,
                    "parameters": [id_param("userId", "path")],
                    "responses": {
                        "200": { "description": "Token generated", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/AuthResponse" } } } },
                        "404": message_response("User not found")
                    }
                }
            },
            "/api/users": {
                "get": {
                    "tags": ["Users"], "summary": "List users with their todos",
                    "responses": { "200": { "description": "Users" }, "401": message_response("Missing or invalid token") }
                }
            },
            "/api/users/{id}": {
                "get": {
                    "tags": ["Users"], "summary": "Get a user with their todos",
                    "parameters": [id_param("id", "path")],
                    "responses": { "200": { "description": "User" }, "404": message_response("User not found") }
                },
                "put": {
                    "tags": ["Users"], "summary": "Update a user",
                    "parameters": [id_param("id", "path")],
                    "requestBody": json_body("UpdateUser"),
                    "responses": {
                        "200": { "description": "User updated" },
                        "400": message_response("Validation error, or username or email already exists"),
                        "404": message_response("User not found")
                    }
                },
                "delete": {
                    "tags": ["Users"], "summary": "Delete a user and their todos",
                    "parameters": [id_param("id", "path")],
                    "responses": { "200": message_response("User deleted"), "404": message_response("User not found") }
                }
            },
            "/api/users/{id}/profile": {
                "get": {
                    "tags": ["Users"], "summary": "Get a user profile",
                    "parameters": [id_param("id", "path")],
                    "responses": { "200": { "description": "User fetched" }, "404": message_response("User not found") }
                }
            },
            "/api/todos/{userId}": {
                "post": {
                    "tags": ["Todos"], "summary": "Create a todo for a user",
                    "parameters": [id_param("userId", "path")],
                    "requestBody": json_body("CreateTodo"),
                    "responses": {
                        "201": { "description": "Todo created" },
                        "400": message_response("Validation error"),
                        "404": message_response("User not found")
                    }
                }
            },
            "/api/todos/{todoId}": {
                "put": {
                    "tags": ["Todos"], "summary": "Update a todo",
                    "parameters": [id_param("todoId", "path")],
                    "requestBody": json_body("UpdateTodo"),
                    "responses": {
                        "200": message_response("Todo updated"),
                        "400": message_response("Validation error"),
                        "404": message_response("Todo or user not found")
                    }
                },
                "delete": {
                    "tags": ["Todos"], "summary": "Delete a todo",
                    "parameters": [id_param("todoId", "path")],
                    "responses": { "200": message_response("Todo deleted"), "404": message_response("Todo not found") }
                }
            },
            "/api/todos/{todoId}/status": {
                "patch": {
                    "tags": ["Todos"], "summary": "Update the status of a todo",
                    "parameters": [id_param("todoId", "path")],
                    "requestBody": json_body("UpdateStatus"),
                    "responses": { "200": message_response("Status updated"), "404": message_response("Todo not found") }
                }
            },
            "/api/todos/{todoId}/complete": {
                "patch": {
                    "tags": ["Todos"], "summary": "Mark a todo as complete",
                    "parameters": [id_param("todoId", "path")],
                    "responses": { "200": message_response("Todo marked as complete"), "404": message_response("Todo not found") }
                }
            },
            "/api/todos/search": {
                "get": {
                    "tags": ["Todos"], "summary": "Search a user's todos by title",
                    "parameters": [
                        { "in": "query", "name": "title", "required": true, "schema": { "type": "string" } },
                        id_param("userId", "query")
                    ],
                    "responses": {
                        "200": { "description": "Matching todos", "content": { "application/json": { "schema": { "type": "array", "items": { "$ref": "#/components/schemas/Todo" } } } } },
                        "400": message_response("Title and userId query parameters are required"),
                        "404": message_response("No todos found")
                    }
                }
            },
            "/health": {
                "get": {
                    "tags": ["Health"], "summary": "Liveness probe", "security": open,
                    "responses": { "200": { "description": "Service is up" } }
                }
            }
        }
    })
}

/// Serves the OpenAPI document describing every route.
#[get("/openapi.json")]
pub async fn openapi() -> impl Responder {
    HttpResponse::Ok().json(&*OPENAPI)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn test_openapi_lists_routes() {
        let app =
            test::init_service(App::new().service(web::scope("/api-docs").service(openapi))).await;

        let req = test::TestRequest::get()
            .uri("/api-docs/openapi.json")
            .to_request();
        let doc: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(doc["openapi"], "3.0.0");
        assert_eq!(
            doc["components"]["securitySchemes"]["AuthenticationHeader"]["name"],
            "authentication"
        );
        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/users/{id}",
            "/api/todos/search",
        ] {
            assert!(doc["paths"].get(path).is_some(), "missing {}", path);
        }
    }
}
