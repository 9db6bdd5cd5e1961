pub mod drivers;
pub mod feature_prompt;

pub use feature_prompt::{interactive_session, prompt_features};
