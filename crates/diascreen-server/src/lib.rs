//! DiaScreen Server
//!
//! Stateless HTTP endpoint scoring diabetes risk. The screening model is loaded
//! once before the listener binds; requests are validated, scored, and labeled
//! against the loaded threshold.

pub mod cli;
pub mod config;
pub mod routes;
pub mod state;

pub use cli::{Cli, LogFormat};
pub use config::ServerConfig;
pub use routes::{create_router, AppError};
pub use state::AppState;
