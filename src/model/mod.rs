use chrono::Utc;
use serde::{Deserialize, Serialize};

pub mod session;

pub use session::Session;

/// Canonical user shape after wire-format normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// User as the server (or an older persisted session) spells it. Field naming
/// varies between camelCase and snake_case depending on the endpoint, and old
/// records carry `last_login` instead of an update timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt", alias = "updated_at")]
    pub updated_at: Option<String>,
    #[serde(default, rename = "last_login", skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

impl WireUser {
    /// Collapse the naming variants into the canonical shape, filling missing
    /// timestamps with the current time.
    pub fn normalize(self) -> User {
        let now = Utc::now().to_rfc3339();
        User {
            id: self.id,
            email: self.email,
            name: self.name,
            created_at: self.created_at.unwrap_or_else(|| now.clone()),
            updated_at: self.updated_at.or(self.last_login).unwrap_or(now),
        }
    }
}

impl From<User> for WireUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: Some(user.created_at),
            updated_at: Some(user.updated_at),
            last_login: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default, rename = "userId", alias = "user_id")]
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: String,
    #[serde(default, rename = "updatedAt", alias = "updated_at")]
    pub updated_at: String,
}

/// Body of a successful task-list response: `{ "tasks": [...] }`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskListBody {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// Body of a successful auth response: `{ "success": true, "data": { ... } }`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<AuthData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthData {
    pub user: WireUser,
    pub jwt_token: String,
}
