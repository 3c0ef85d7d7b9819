pub mod app;
pub mod auth;
pub mod errors;
pub mod handlers;
pub mod links;
pub mod models;
pub mod pdf;
pub mod reports;
pub mod schedule;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
