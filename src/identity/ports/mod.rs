//! Port contracts for identity persistence.

pub mod repository;

pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};
