pub mod batch;
pub mod common;
pub mod completions;
pub mod config;
pub mod detect;
pub mod resolve;
pub mod stamp;
