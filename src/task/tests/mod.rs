//! Unit tests for the task module.
//!
//! Tests are organised by concern: domain validation, integration
//! registration, and the external-sync reconciliation state machine.

mod reconcile_tests;
