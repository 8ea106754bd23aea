use crate::model::{AuthBody, Task, TaskListBody};
use crate::util;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Uniform envelope every gateway operation resolves to. Failures are values,
/// never panics or bubbled errors; callers branch on `data`/`status`.
/// Status 0 means the request never reached the server (offline or transport
/// failure).
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub status: u16,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn success(data: T, status: u16, message: Option<String>) -> Self {
        Self {
            data: Some(data),
            status,
            message,
            error: None,
        }
    }

    fn failure(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            data: None,
            status,
            message: Some(message.into()),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// The message to show the user when this response failed.
    pub fn error_message(&self, fallback: &str) -> String {
        self.error
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

/// Single outbound HTTP client for the remote todo API. Owns the bearer token
/// and an online flag; enforces JSON content negotiation on every request.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Mutex<Option<String>>,
    online: AtomicBool,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .tcp_keepalive(Duration::from_secs(15))
            .tcp_nodelay(true)
            .build()
            .unwrap_or_else(|_| {
                log::warn!("failed to build HTTP client, falling back to defaults");
                reqwest::Client::new()
            });

        Self {
            base_url: base_url.into(),
            http,
            token: Mutex::new(None),
            online: AtomicBool::new(true),
        }
    }

    pub fn from_conf() -> Self {
        Self::new(
            crate::conf::base_url(),
            Duration::from_secs(crate::conf::request_timeout_secs()),
        )
    }

    pub fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = token;
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().ok().and_then(|guard| guard.clone())
    }

    /// Connectivity switch checked before every request; when offline the
    /// gateway fails fast without touching the network.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Relaxed);
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResponse<T> {
        let url = format!("{}{}", self.base_url, path);

        if !self.online.load(Ordering::Relaxed) {
            return ApiResponse::failure(
                0,
                "No internet connection",
                "Please check your internet connection and try again.",
            );
        }

        let mut req = self
            .http
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json");

        // Sanitize the token before it reaches a header
        if let Some(token) = self.token() {
            let token = util::sanitize_token(&token);
            if !token.is_empty() {
                req = req.bearer_auth(token);
            }
        }

        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("request to {} failed: {}", url, e);
                return ApiResponse::failure(
                    0,
                    "Network request failed",
                    "Unable to connect to the server. Please check your connection and try again.",
                );
            }
        };

        let status = response.status().as_u16();

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("application/json") {
                log::error!("unexpected content type from {}: {}", url, content_type);
                return ApiResponse::failure(
                    status,
                    "Unexpected response format",
                    "The server returned an unexpected response format.",
                );
            }
        }

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                log::error!("failed to read response from {}: {}", url, e);
                return ApiResponse::failure(
                    status,
                    format!("Request failed with status {}", status),
                    "The server returned an unexpected response format.",
                );
            }
        };

        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(_) => {
                return ApiResponse::failure(
                    status,
                    format!("Request failed with status {}", status),
                    "The server returned an unexpected response format.",
                );
            }
        };

        let message = value
            .get("message")
            .and_then(|m| m.as_str())
            .map(String::from);

        if !(200..300).contains(&status) {
            // A 401 means the token is no longer valid
            if status == 401 {
                self.set_token(None);
            }
            let error = message.clone().unwrap_or_else(|| "Request failed".to_string());
            return ApiResponse {
                data: None,
                status,
                message,
                error: Some(error),
            };
        }

        match serde_json::from_value::<T>(value) {
            Ok(data) => ApiResponse::success(data, status, message),
            Err(e) => {
                log::error!("failed to decode response from {}: {}", url, e);
                ApiResponse::failure(
                    status,
                    "Unexpected response format",
                    "The server returned an unexpected response format.",
                )
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> ApiResponse<AuthBody> {
        self.request(
            Method::POST,
            "/api/auth/login",
            Some(json!({ "email": email, "password": password })),
        )
        .await
    }

    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> ApiResponse<AuthBody> {
        let mut body = json!({ "email": email, "password": password });
        if let Some(name) = name {
            body["name"] = json!(name);
        }
        self.request(Method::POST, "/api/auth/signup", Some(body)).await
    }

    /// Drops the local token first, then asks the server to invalidate the
    /// session; the response only matters to callers that want to log it.
    pub async fn logout(&self) -> ApiResponse<Value> {
        self.set_token(None);
        self.request(Method::POST, "/api/auth/logout", None).await
    }

    pub async fn list_tasks(&self) -> ApiResponse<TaskListBody> {
        self.request(Method::GET, "/api/tasks", None).await
    }

    pub async fn create_task(
        &self,
        title: &str,
        description: Option<&str>,
        completed: bool,
    ) -> ApiResponse<Task> {
        self.request(
            Method::POST,
            "/api/tasks",
            Some(json!({ "title": title, "description": description, "completed": completed })),
        )
        .await
    }

    pub async fn update_task(
        &self,
        task_id: &str,
        title: &str,
        description: Option<&str>,
        completed: bool,
    ) -> ApiResponse<Task> {
        self.request(
            Method::PUT,
            &format!("/api/tasks/{}", task_id),
            Some(json!({ "title": title, "description": description, "completed": completed })),
        )
        .await
    }

    pub async fn delete_task(&self, task_id: &str) -> ApiResponse<Value> {
        self.request(Method::DELETE, &format!("/api/tasks/{}", task_id), None)
            .await
    }
}
