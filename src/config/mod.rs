pub mod defaults;
pub mod settings;

pub use defaults::DEFAULT_ENDPOINT;
pub use settings::{deep_merge, AiConfig, ModelChoice, Settings, SystemConfig};
