//! Daily "two lines" generation through an OpenAI-compatible chat API.
//!
//! The model's reply is untrusted text. [`decode_generation`] turns anything
//! it returns into a [`GeneratedContent`] without failing; only transport
//! problems surface as [`GeneratorError`].

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;

pub use client::OpenRouterClient;
pub use error::GeneratorError;
pub use parse::{decode_generation, GeneratedContent};
pub use prompt::GenerationInput;
