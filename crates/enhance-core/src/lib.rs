pub mod client;
pub mod enhance;
pub mod error;
pub mod rate;
pub mod settings;
pub mod transform;
pub mod util;

pub use client::{Completion, GroqClient};
pub use enhance::Enhancer;
pub use error::EnhanceError;
pub use rate::RateLimiter;
pub use settings::{key_looks_valid, Settings};
pub use transform::{clean_response, sanitize_input, validate_input, MAX_PROMPT};
