pub mod prompts;

pub use prompts::{confirm_campaign_creation, prompt_confirmation};
