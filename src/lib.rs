//! A two-mode web page in front of Google Gemini: free-text generation and
//! image analysis.

pub mod config;
pub mod credentials;
pub mod error;
pub mod gemini;
pub mod handlers;
pub mod markdown;
pub mod page;
pub mod server;
pub mod upload;

pub use config::Config;
pub use server::{router, AppState};
