//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: process-local repositories for development and tests
//!
//! Adapters only translate between domain types and storage representations.

pub mod memory;
pub mod persistence;
