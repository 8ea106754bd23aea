#![allow(dead_code)]

//! In-process stub of the remote todo API, just enough surface for the
//! client to talk to. Scenario switches (forced statuses, HTML responses)
//! live in the shared state so each test can steer a route's behavior.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const GOOD_PASSWORD: &str = "Passw0rd1";
pub const TAKEN_EMAIL: &str = "taken@example.com";
pub const TEST_TOKEN: &str = "test-token";

#[derive(Default)]
pub struct StubState {
    /// Server-side task list, newest first, as raw JSON objects.
    pub tasks: Vec<Value>,
    /// Every Authorization header value the task routes have seen.
    pub auth_headers: Vec<String>,
    /// When set, task routes answer with this status and `{"message":"boom"}`.
    pub force_status: Option<u16>,
    /// Like `force_status`, but consumed by the first task-route request.
    pub force_once: Option<u16>,
    /// When set, the task list answers with an HTML page instead of JSON.
    pub html_response: bool,
    /// Total requests that reached the server.
    pub hits: u64,
    pub next_id: u64,
}

pub type Shared = Arc<Mutex<StubState>>;

pub fn server_task(id: &str, title: &str, completed: bool) -> Value {
    json!({
        "id": id,
        "userId": "u1",
        "title": title,
        "description": null,
        "completed": completed,
        "createdAt": "2025-06-01T00:00:00Z",
        "updatedAt": "2025-06-01T00:00:00Z",
    })
}

pub async fn spawn_stub() -> (Shared, String) {
    spawn_stub_with(StubState::default()).await
}

pub async fn spawn_stub_with(state: StubState) -> (Shared, String) {
    let shared: Shared = Arc::new(Mutex::new(state));
    let app = router(shared.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (shared, format!("http://{}", addr))
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/logout", post(logout))
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route("/api/tasks/:id", put(update_task).delete(delete_task))
        .with_state(state)
}

fn record(state: &Shared, headers: &HeaderMap) {
    let mut s = state.lock().unwrap();
    s.hits += 1;
    if let Some(auth) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        s.auth_headers.push(auth.to_string());
    }
}

fn forced(state: &Shared) -> Option<Response> {
    let mut s = state.lock().unwrap();
    s.force_once.take().or(s.force_status).map(|code| {
        (
            StatusCode::from_u16(code).unwrap(),
            Json(json!({ "message": "boom" })),
        )
            .into_response()
    })
}

fn auth_success(email: &str, name: Option<&str>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "user": {
                "id": "u1",
                "email": email,
                "name": name,
                "created_at": "2025-01-01T00:00:00Z",
                "last_login": "2025-06-01T00:00:00Z",
            },
            "jwt_token": TEST_TOKEN,
        },
        "message": "ok",
    }))
}

async fn login(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, &headers);
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if body["password"] == GOOD_PASSWORD {
        (StatusCode::OK, auth_success(&email, None)).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid email or password" })),
        )
            .into_response()
    }
}

async fn signup(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, &headers);
    let email = body["email"].as_str().unwrap_or_default().to_string();
    if email == TAKEN_EMAIL {
        return (
            StatusCode::CONFLICT,
            Json(json!({ "message": "Email already exists" })),
        )
            .into_response();
    }
    let name = body["name"].as_str().map(str::to_string);
    (StatusCode::OK, auth_success(&email, name.as_deref())).into_response()
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, &headers);
    (StatusCode::OK, Json(json!({ "message": "Logged out" }))).into_response()
}

async fn list_tasks(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, &headers);
    if state.lock().unwrap().html_response {
        return (StatusCode::OK, Html("<!doctype html><title>oops</title>")).into_response();
    }
    if let Some(response) = forced(&state) {
        return response;
    }
    let tasks = state.lock().unwrap().tasks.clone();
    (StatusCode::OK, Json(json!({ "tasks": tasks }))).into_response()
}

async fn create_task(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, &headers);
    if let Some(response) = forced(&state) {
        return response;
    }
    let mut s = state.lock().unwrap();
    s.next_id += 1;
    let task = json!({
        "id": format!("srv-{}", s.next_id),
        "userId": "u1",
        "title": body["title"],
        "description": body["description"],
        "completed": body["completed"].as_bool().unwrap_or(false),
        "createdAt": "2025-06-01T00:00:00Z",
        "updatedAt": "2025-06-01T00:00:00Z",
    });
    s.tasks.insert(0, task.clone());
    (StatusCode::CREATED, Json(task)).into_response()
}

async fn update_task(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    record(&state, &headers);
    if let Some(response) = forced(&state) {
        return response;
    }
    let task = json!({
        "id": id,
        "userId": "u1",
        "title": body["title"],
        "description": body["description"],
        "completed": body["completed"].as_bool().unwrap_or(false),
        "createdAt": "2025-06-01T00:00:00Z",
        "updatedAt": "2025-06-02T00:00:00Z",
    });
    let mut s = state.lock().unwrap();
    if let Some(entry) = s.tasks.iter_mut().find(|t| t["id"] == task["id"]) {
        *entry = task.clone();
    }
    (StatusCode::OK, Json(task)).into_response()
}

async fn delete_task(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&state, &headers);
    if let Some(response) = forced(&state) {
        return response;
    }
    let mut s = state.lock().unwrap();
    s.tasks.retain(|t| t["id"] != id.as_str());
    (StatusCode::OK, Json(json!({ "message": "Task deleted" }))).into_response()
}
