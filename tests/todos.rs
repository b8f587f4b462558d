#[macro_use]
mod common;

use std::net::TcpListener;

use actix_web::http::StatusCode;
use actix_web::{rt, test, web, App, HttpServer};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use todoforge::auth::AUTH_HEADER;
use todoforge::models::{Todo, TodoPriority, TodoStatus};
use todoforge::routes;

use common::{memory_state, register_user, send, TestUser};

async fn create_todo(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
    >,
    user: &TestUser,
    payload: Value,
) -> (StatusCode, Value) {
    let req = test::TestRequest::post()
        .uri(&format!("/api/todos/{}", user.id))
        .insert_header((AUTH_HEADER, user.token.clone()))
        .set_json(payload)
        .to_request();
    send(app, req).await
}

#[test_log::test(actix_rt::test)]
async fn test_create_todo_defaults() {
    let app = test_app!(memory_state());
    let user = register_user(&app, "alice", "a@x.com", "secret1")
        .await
        .unwrap();

    let (status, body) = create_todo(
        &app,
        &user,
        json!({ "title": "Buy milk", "description": "Two litres" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "Create failed. Body: {}", body);
    assert_eq!(body["message"], "TODO created successfully");

    let todo: Todo = serde_json::from_value(body["todo"].clone()).unwrap();
    assert_eq!(todo.title, "Buy milk");
    assert_eq!(todo.status, TodoStatus::Pending);
    assert_eq!(todo.priority, TodoPriority::Low);
    assert_eq!(todo.user_id, user.id);
    assert!(todo.completed_at.is_none());
}

#[actix_rt::test]
async fn test_create_todo_validation_and_owner() {
    let app = test_app!(memory_state());
    let user = register_user(&app, "alice", "a@x.com", "secret1")
        .await
        .unwrap();

    let (status, body) = create_todo(&app, &user, json!({ "title": "ab", "description": "Two litres" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "\"title\" length must be between 3 and 20 characters");

    let (status, _) = create_todo(
        &app,
        &user,
        json!({ "title": "Buy milk", "description": "Two litres", "status": "done" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let ghost = TestUser {
        id: 999,
        token: user.token.clone(),
    };
    let (status, body) = create_todo(
        &app,
        &ghost,
        json!({ "title": "Buy milk", "description": "Two litres" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");
}

#[actix_rt::test]
async fn test_todo_lifecycle() {
    let app = test_app!(memory_state());
    let user = register_user(&app, "alice", "a@x.com", "secret1")
        .await
        .unwrap();
    let (_, body) = create_todo(
        &app,
        &user,
        json!({ "title": "Buy milk", "description": "Two litres", "priority": "high" }),
    )
    .await;
    let todo_id = body["todo"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/todos/{}", todo_id))
        .insert_header((AUTH_HEADER, user.token.clone()))
        .set_json(json!({
            "title": "Buy oat milk",
            "description": "One litre",
            "status": "in-progress",
            "userId": user.id
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "Update failed. Body: {}", body);
    assert_eq!(body["message"], "TODO updated successfully");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/todos/{}/status", todo_id))
        .insert_header((AUTH_HEADER, user.token.clone()))
        .set_json(json!({ "status": "pending" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "TODO status updated successfully");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/todos/{}/complete", todo_id))
        .insert_header((AUTH_HEADER, user.token.clone()))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "TODO marked as complete");

    let req = test::TestRequest::get()
        .uri(&format!("/api/users/{}", user.id))
        .insert_header((AUTH_HEADER, user.token.clone()))
        .to_request();
    let (_, body) = send(&app, req).await;
    let stored = &body["todos"][0];
    assert_eq!(stored["title"], "Buy oat milk");
    assert_eq!(stored["status"], "completed");
    assert_eq!(stored["priority"], "high");
    assert!(stored["completedAt"].is_string());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/todos/{}", todo_id))
        .insert_header((AUTH_HEADER, user.token.clone()))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "TODO deleted successfully");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/todos/{}", todo_id))
        .insert_header((AUTH_HEADER, user.token.clone()))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "TODO not found");
}

#[actix_rt::test]
async fn test_update_todo_to_unknown_user() {
    let app = test_app!(memory_state());
    let user = register_user(&app, "alice", "a@x.com", "secret1")
        .await
        .unwrap();
    let (_, body) = create_todo(
        &app,
        &user,
        json!({ "title": "Buy milk", "description": "Two litres" }),
    )
    .await;
    let todo_id = body["todo"]["id"].as_i64().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/api/todos/{}", todo_id))
        .insert_header((AUTH_HEADER, user.token.clone()))
        .set_json(json!({
            "title": "Buy milk",
            "description": "Two litres",
            "status": "pending",
            "userId": 999
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found");

    let req = test::TestRequest::patch()
        .uri("/api/todos/999/complete")
        .insert_header((AUTH_HEADER, user.token.clone()))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "TODO not found");
}

#[actix_rt::test]
async fn test_search_todos() {
    let app = test_app!(memory_state());
    let user = register_user(&app, "alice", "a@x.com", "secret1")
        .await
        .unwrap();
    for title in ["Buy Milk", "Walk dog", "Buy bread"] {
        let (status, _) = create_todo(&app, &user, json!({ "title": title, "description": "errand" })).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri(&format!("/api/todos/search?title=buy&userId={}", user.id))
        .insert_header((AUTH_HEADER, user.token.clone()))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    let mut titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|todo| todo["title"].as_str().unwrap())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Buy Milk", "Buy bread"]);

    let cases = [
        (format!("/api/todos/search?userId={}", user.id), StatusCode::BAD_REQUEST, "Title query parameter is required"),
        ("/api/todos/search?title=buy".to_string(), StatusCode::BAD_REQUEST, "User ID query parameter is required"),
        (format!("/api/todos/search?title=&userId={}", user.id), StatusCode::BAD_REQUEST, "Title query parameter is required"),
        (format!("/api/todos/search?title=zebra&userId={}", user.id), StatusCode::NOT_FOUND, "No todos found"),
        (format!("/api/todos/search?title=%20%20&userId={}", user.id), StatusCode::NOT_FOUND, "No todos found"),
    ];
    for (uri, expected_status, expected_message) in cases {
        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header((AUTH_HEADER, user.token.clone()))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, expected_status, "unexpected status for {}", uri);
        assert_eq!(body["message"], expected_message);
    }

    // Whitespace is searched for, not rejected
    let req = test::TestRequest::get()
        .uri(&format!("/api/todos/search?title=%20&userId={}", user.id))
        .insert_header((AUTH_HEADER, user.token.clone()))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let req = test::TestRequest::get()
        .uri("/api/todos/search?title=buy&userId=abc")
        .insert_header((AUTH_HEADER, user.token.clone()))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_create_todo_unauthorized() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let state = memory_state();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .configure(routes::config)
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    let handle = server.handle();
    rt::spawn(server);

    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/todos/1", port))
        .json(&json!({ "title": "Unauthorized", "description": "no token" }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "No token provided" }));

    handle.stop(false).await;
}
