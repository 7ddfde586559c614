//! Use-case services over the repositories.
//!
//! # Responsibility
//! - Give host layers (FFI, CLI) one entry point per user action.
//! - Build read models that combine tasks and categories.

pub mod todo_service;
