pub mod prompt;
pub mod response;
pub mod router;

pub use prompt::PromptBuilder;
pub use response::{strip_code_fences, ScaffoldFile, ScaffoldPlan};
pub use router::{AiRouter, RouteMode};
