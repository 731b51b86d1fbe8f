pub mod error;
pub mod gemini;
pub mod util;

pub use error::{GeminiError, Result};
pub use gemini::{Gemini, InlineData};
