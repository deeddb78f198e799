use unistore::{Action, LoggingMiddleware, Middleware};
use unistore_config::DemoConfig;

use crate::reducers::AppState;

pub mod todo_limit_middleware;

pub use todo_limit_middleware::TodoLimitMiddleware;

/// Middleware chain for the demo, outermost first
pub fn build_chain(config: &DemoConfig) -> Vec<Box<dyn Middleware<AppState, Action>>> {
    let mut chain: Vec<Box<dyn Middleware<AppState, Action>>> = Vec::new();
    if config.log_actions {
        chain.push(Box::new(LoggingMiddleware::new().with_level(log::Level::Info)));
    }
    chain.push(Box::new(TodoLimitMiddleware::new(config.max_todos)));
    chain
}
