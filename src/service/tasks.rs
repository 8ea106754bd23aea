use crate::api::ApiClient;
use crate::model::Task;
use chrono::Utc;
use std::sync::Arc;

/// Result of a task operation. `Unauthorized` tells the caller the server
/// rejected the token and the auth context should log out; everything else,
/// including rolled-back failures, is `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Done,
    Unauthorized,
}

/// Holds the in-memory task list, most-recently-created first. Mutations are
/// optimistic: the list reflects the user's intent immediately, and a server
/// rejection triggers an explicit compensating action that restores the prior
/// state.
pub struct TaskController {
    client: Arc<ApiClient>,
    tasks: Vec<Task>,
    error: Option<String>,
    loading: bool,
    temp_seq: u64,
}

impl TaskController {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            tasks: Vec::new(),
            error: None,
            loading: false,
            temp_seq: 0,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    fn next_placeholder_id(&mut self) -> String {
        self.temp_seq += 1;
        format!("temp-{}", self.temp_seq)
    }

    /// Fetch the full collection and replace the local list with it.
    pub async fn refresh(&mut self) -> TaskOutcome {
        self.loading = true;
        self.error = None;
        let response = self.client.list_tasks().await;
        self.loading = false;

        if response.is_unauthorized() {
            return TaskOutcome::Unauthorized;
        }
        match response.data {
            Some(body) => self.tasks = body.tasks,
            None => self.error = Some(response.error_message("Failed to load tasks")),
        }
        TaskOutcome::Done
    }

    /// Prepend a placeholder immediately, then swap in the server's task once
    /// it is acknowledged. The placeholder is matched by its temporary id, so
    /// the server entry replaces it and is never duplicated.
    pub async fn create(
        &mut self,
        title: &str,
        description: Option<&str>,
        completed: bool,
    ) -> TaskOutcome {
        let temp_id = self.next_placeholder_id();
        let now = Utc::now().to_rfc3339();
        let placeholder = Task {
            id: temp_id.clone(),
            user_id: String::new(), // assigned by the server
            title: title.to_string(),
            description: description.map(str::to_string),
            completed,
            created_at: now.clone(),
            updated_at: now,
        };
        self.tasks.insert(0, placeholder);

        let response = self.client.create_task(title, description, completed).await;
        if response.is_unauthorized() {
            return TaskOutcome::Unauthorized;
        }
        match response.data {
            Some(task) => {
                if let Some(entry) = self.tasks.iter_mut().find(|t| t.id == temp_id) {
                    *entry = task;
                }
            }
            None => {
                // Roll back: drop the placeholder
                self.tasks.retain(|t| t.id != temp_id);
                self.error = Some(response.error_message("Failed to create task"));
            }
        }
        TaskOutcome::Done
    }

    /// Replace the entry in place immediately; on success replace it again
    /// with the authoritative server value, on failure reload the whole list
    /// to discard the optimistic change.
    pub async fn update(&mut self, updated: Task) -> TaskOutcome {
        let task_id = updated.id.clone();
        if let Some(entry) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            *entry = updated.clone();
        }

        let response = self
            .client
            .update_task(
                &task_id,
                &updated.title,
                updated.description.as_deref(),
                updated.completed,
            )
            .await;
        if response.is_unauthorized() {
            return TaskOutcome::Unauthorized;
        }
        match response.data {
            Some(task) => {
                if let Some(entry) = self.tasks.iter_mut().find(|t| t.id == task_id) {
                    *entry = task;
                }
            }
            None => {
                self.error = Some(response.error_message("Failed to update task"));
                let reload = self.client.list_tasks().await;
                if let Some(body) = reload.data {
                    self.tasks = body.tasks;
                }
            }
        }
        TaskOutcome::Done
    }

    /// Remove the entry immediately, keeping a copy; a failed delete puts the
    /// copy back at the front.
    pub async fn delete(&mut self, task_id: &str) -> TaskOutcome {
        let Some(pos) = self.tasks.iter().position(|t| t.id == task_id) else {
            return TaskOutcome::Done;
        };
        let removed = self.tasks.remove(pos);

        let response = self.client.delete_task(task_id).await;
        if response.is_unauthorized() {
            return TaskOutcome::Unauthorized;
        }
        if response.status != 200 {
            self.tasks.insert(0, removed);
            self.error = Some(response.error_message("Failed to delete task"));
        }
        TaskOutcome::Done
    }
}
