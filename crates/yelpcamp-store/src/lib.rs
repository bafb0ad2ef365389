//! # yelpcamp-store: Resource Store
//!
//! Persistence for campgrounds and reviews. Records live in in-memory
//! collections that serve every read; when a `DATABASE_URL` is configured,
//! writes go to PostgreSQL first and the collections are hydrated from it
//! on startup.
//!
//! The web layer only talks to [`Repository`].

pub mod db;
pub mod error;
pub mod memory;
pub mod repository;

pub use error::StoreError;
pub use memory::Store;
pub use repository::{CampgroundDetail, Repository, RepositoryOptions};
