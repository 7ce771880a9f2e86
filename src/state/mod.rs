/// State management module
///
/// This module handles persisted and shared data:
/// - Database connection and queries (library.rs)
/// - Shared data structures (data.rs)
pub mod data;
pub mod library;
