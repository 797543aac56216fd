/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - The upload → convert → download workflow machine (workflow.rs)

pub mod data;
pub mod workflow;
