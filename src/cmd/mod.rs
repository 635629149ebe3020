pub mod analyze;
pub mod optimize;
pub mod readability;
