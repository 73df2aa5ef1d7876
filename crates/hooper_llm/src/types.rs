//! Wire types matching the OpenAI-compatible chat completions API.

pub mod request;
pub mod response;
