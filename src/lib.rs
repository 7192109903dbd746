//! Taskforge: multi-tenant task-tracking backend core.
//!
//! Users own projects, projects contain tasks, and external systems (issue
//! trackers) create, update, and delete tasks through configured
//! integrations. This crate provides the reconciliation and authentication
//! core; HTTP routing, request validation, and response shaping are left to
//! a surrounding transport layer.
//!
//! # Architecture
//!
//! Taskforge follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`auth`]: Bearer token issuance and verification
//! - [`identity`]: User accounts and credential-backed identity resolution
//! - [`project`]: Projects owned by users
//! - [`task`]: Tasks, integrations, the audit event log, and external-sync
//!   reconciliation

pub mod auth;
pub mod identity;
pub mod patch;
pub mod project;
pub mod task;
