//! Activity heartbeat agent. Counts pointer and keyboard input, decides every interval whether the
//! user was idle, and posts a summary of the interval to a reporting endpoint.
//!

pub mod cli;
pub mod display;
pub mod report;
pub mod source;
pub mod tracker;
pub mod utils;
pub mod window;
