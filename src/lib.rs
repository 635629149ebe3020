pub mod api;
pub mod config;
pub mod error;
pub mod features;
pub mod fitness;
pub mod item;
pub mod optimizer;
pub mod patterns;
pub mod readability;
pub mod stats;
// cmd and reports are binary modules (declared in main.rs).

pub use error::{TfResult, TitleForgeError};
