pub mod args;
pub mod commands;
pub mod output;

pub use args::{
    Cli, Commands, DevelopCommand, LearnCommand, OperationsCommand, PackageCommand, SystemCommand,
};
pub use commands::CommandHandler;
pub use output::{OutputFormatter, Spinner};
