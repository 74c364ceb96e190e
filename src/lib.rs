pub mod ai;
pub mod cli;
pub mod config;
pub mod context;
pub mod utils;

pub use cli::{Cli, CommandHandler, Commands};
pub use config::Settings;
pub use context::{ContextData, ContextManager};
