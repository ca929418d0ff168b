//! # draftroom-database
//!
//! PostgreSQL access for Draftroom: connection pool management, embedded
//! migrations, and repositories for documents, versions, and tags.

pub mod connection;
pub mod migration;
pub mod repositories;
