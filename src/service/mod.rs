pub mod auth;
pub mod session;
pub mod tasks;

pub use auth::AuthContext;
pub use session::SessionStore;
pub use tasks::{TaskController, TaskOutcome};
