use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ModelChoice;

#[derive(Parser)]
#[command(name = "termforge")]
#[command(about = "AI-assisted developer CLI for Termux and Linux")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Override the configured AI model for this invocation
    #[arg(long = "ai-model", global = true, value_enum)]
    pub ai_model: Option<ModelChoice>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute and explain system commands
    #[command(subcommand)]
    System(SystemCommand),
    /// Project generation and code editing
    #[command(subcommand)]
    Develop(DevelopCommand),
    /// Host diagnostics and troubleshooting
    #[command(subcommand)]
    Operations(OperationsCommand),
    /// Package discovery and installation
    #[command(subcommand)]
    Package(PackageCommand),
    /// AI explanations and tutorials
    #[command(subcommand)]
    Learn(LearnCommand),
    /// AI explanation for commands or concepts
    Explain {
        /// What to explain
        #[arg(required = true)]
        query: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum SystemCommand {
    /// Run a native shell command
    Run {
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
    /// Explain a system command or its output
    Explain {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Suggest and optionally execute a fix for a system issue
    Fix { issue: String },
    /// Show the effective configuration or update the user layer
    Config {
        /// Set the default AI model in the user config
        #[arg(long, value_enum)]
        set_model: Option<ModelChoice>,
        /// Set the Mistral API key in the user config
        #[arg(long)]
        set_mistral_key: Option<String>,
        /// Set the Codestral API key in the user config
        #[arg(long)]
        set_codestral_key: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum DevelopCommand {
    /// Create a new project from an AI-generated scaffold
    Create {
        name: String,
        /// Comma-separated tech stack
        #[arg(short, long)]
        stack: Option<String>,
    },
    /// Edit a file with AI assistance
    Edit {
        file: PathBuf,
        /// What to change
        #[arg(short, long)]
        instruction: String,
    },
}

#[derive(Subcommand)]
pub enum OperationsCommand {
    /// Show a resource usage snapshot
    Status,
    /// AI-assisted diagnosis of an error or failing service
    Diagnose {
        #[arg(required = true)]
        description: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum PackageCommand {
    /// Search the host package manager
    Search { name: String },
    /// Install a package via the host package manager
    Install { name: String },
    /// Ask the AI which packages fit a task
    Suggest {
        #[arg(required = true)]
        task: Vec<String>,
    },
}

#[derive(Subcommand)]
pub enum LearnCommand {
    /// Explain a command or concept
    Explain {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Generate a short hands-on tutorial
    Tutorial {
        #[arg(required = true)]
        topic: Vec<String>,
    },
}
