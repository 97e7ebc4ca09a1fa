pub mod answer;
pub mod classifier;
pub mod guard;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod synthesizer;

pub use answer::answer;
pub use classifier::is_database_like;
pub use guard::ensure_read_only;
pub use orchestrator::{Assistant, AssistantResponse, Outcome};
pub use parser::strip_code_fences;
pub use synthesizer::{generate_sql, synthesize};
