//! Unit tests for the identity module.
//!
//! Tests are organised by layer: domain validation on one side, account
//! orchestration (signup, login, credential resolution, maintenance) on
//! the other.

mod service_tests;
