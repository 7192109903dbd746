//! Application services for account management.

mod accounts;

pub use accounts::{AccountError, AccountResult, AccountService, SignupRequest, UpdateUserRequest};
