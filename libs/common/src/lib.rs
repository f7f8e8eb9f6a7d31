//! Common library for the Meetly backend
//!
//! This crate provides the shared infrastructure used by the API service:
//! database connectivity, schema migrations, and the database error
//! taxonomy.

pub mod database;
pub mod error;
