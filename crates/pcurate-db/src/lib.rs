//! SQLite backed annotation store for pcurate.
//!
//! - [`connection::DbConnection`] opens a store file and migrates it
//! - [`repository::PackageRepository`] holds the queries on the `packages` table

pub mod connection;
pub mod error;
pub mod migration;
pub mod models;
pub mod repository;
pub mod schema;
