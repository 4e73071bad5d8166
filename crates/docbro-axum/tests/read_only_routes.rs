//! Read-only server routes, exercised in-process.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{post_json, sample_service, send, send_json};
use docbro_axum::read_only_router;
use serde_json::json;

fn initialize_body() -> serde_json::Value {
    json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {"protocolVersion": "2025-06-18", "capabilities": {}}
    })
}

#[tokio::test]
async fn initialize_issues_a_session_header() {
    let (_dir, service) = sample_service();
    let app = read_only_router(service);

    let response = send(&app, post_json("/mcp", &initialize_body())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let session = response
        .headers()
        .get("mcp-session-id")
        .expect("session header")
        .to_str()
        .unwrap()
        .to_string();

    let mut request = post_json(
        "/mcp",
        &json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}),
    );
    request
        .headers_mut()
        .insert("mcp-session-id", session.parse().unwrap());
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_null());
    assert!(
        body["result"]["tools"]
            .as_array()
            .unwrap()
            .iter()
            .all(|t| t["name"] != "docbro_execute_command")
    );
}

#[tokio::test]
async fn requests_before_initialize_are_refused() {
    let (_dir, service) = sample_service();
    let app = read_only_router(service);

    let (status, body) = send_json(
        &app,
        post_json("/mcp", &json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"]["code"], -32002);
}

#[tokio::test]
async fn notifications_get_202() {
    let (_dir, service) = sample_service();
    let app = read_only_router(service);

    let response = send(
        &app,
        post_json("/mcp", &json!({"jsonrpc": "2.0", "method": "notifications/initialized"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn garbage_body_is_a_parse_error() {
    let (_dir, service) = sample_service();
    let app = read_only_router(service);

    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .body(Body::from("{oops"))
        .unwrap();
    let (_, body) = send_json(&app, request).await;
    assert_eq!(body["error"]["code"], -32700);
    assert!(body["id"].is_null());
}

#[tokio::test]
async fn delete_ends_sessions() {
    let (_dir, service) = sample_service();
    let app = read_only_router(service);

    let response = send(&app, post_json("/mcp", &initialize_body())).await;
    let session = response.headers()["mcp-session-id"].to_str().unwrap().to_string();

    let delete = |id: Option<&str>| {
        let mut builder = Request::builder().method("DELETE").uri("/mcp");
        if let Some(id) = id {
            builder = builder.header("mcp-session-id", id);
        }
        builder.body(Body::empty()).unwrap()
    };

    assert_eq!(send(&app, delete(Some(&session))).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(send(&app, delete(Some(&session))).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(send(&app, delete(None)).await.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rest_listing_and_search() {
    let (_dir, service) = sample_service();
    let app = read_only_router(service);

    let empty = Request::builder()
        .method("POST")
        .uri("/mcp/v1/list_projects")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(&app, empty).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["metadata"]["count"], 1);

    let (status, body) = send_json(
        &app,
        post_json("/mcp/v1/search_projects", &json!({"query": "note"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["project"], "notes");

    let (status, body) = send_json(
        &app,
        post_json("/mcp/v1/search_projects", &json!({"query": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["metadata"]["status"], 400);

    for (path, body) in [
        ("/mcp/v1/search_projects", json!({"query": "--help"})),
        ("/mcp/v1/search_projects", json!({"query": "x", "project_names": ["-a"]})),
        ("/mcp/v1/list_projects", json!({"status": "--all"})),
        ("/mcp/v1/get_project_files", json!({"project_name": "--remove"})),
        ("/mcp/v1/get_project_files", json!({"project_name": "notes;ls"})),
    ] {
        let (status, _) = send_json(&app, post_json(path, &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path} {body}");
    }
}

#[tokio::test]
async fn project_files_status_codes() {
    let (_dir, service) = sample_service();
    let app = read_only_router(service);

    let (status, body) = send_json(
        &app,
        post_json(
            "/mcp/v1/get_project_files",
            &json!({"project_name": "notes", "include_content": true}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["files"][0]["path"], "README.md");
    assert_eq!(body["data"]["files"][0]["content"], "# notes");

    let (status, _) = send_json(
        &app,
        post_json("/mcp/v1/get_project_files", &json!({"project_name": "ghost"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(
        &app,
        post_json(
            "/mcp/v1/get_project_files",
            &json!({"project_name": "notes", "file_path": "/etc/passwd"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn health_and_missing_admin_routes() {
    let (_dir, service) = sample_service();
    let app = read_only_router(service);

    let health = Request::builder()
        .uri("/mcp/v1/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(&app, health).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["server_type"], "read-only");
    assert_eq!(body["data"]["status"], "healthy");

    for path in ["/mcp/v1/execute_command", "/mcp/v1/create_shelf", "/mcp/v1/delete_shelf"] {
        let response = send(&app, post_json(path, &json!({}))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{path}");
    }
}
