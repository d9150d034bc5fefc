// Tasklark - talk through your task list with an LLM
// Library exports

pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod prioritize;
pub mod providers;
pub mod tasks;
