//! In-memory adapters for identity ports.

mod user;

pub use user::InMemoryUserRepository;
