//! Route handlers
//!
//! - `health`: Health check endpoint
//! - `auth`: Signup, login and logout
//! - `dashboard`: Dashboard, planning and focus views
//! - `tasks`: Task CRUD pages and form posts
//! - `search`: Search across tasks, notes, bookmarks and events

pub mod health;
pub mod auth;
pub mod dashboard;
pub mod tasks;
pub mod search;
