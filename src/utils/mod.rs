pub mod executor;
pub mod shell;
pub mod validation;

pub use executor::{run_shell_command, ExecutionResult};
pub use shell::{PackageManager, ShellDetector};
pub use validation::CommandValidator;
