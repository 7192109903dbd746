//! Tasks, integrations, the audit event log, and external-sync
//! reconciliation.
//!
//! External systems address tasks by the pair (source, external task id),
//! never by internal identifier. The reconciler resolves an enabled
//! integration for the event's source and external repository, then
//! creates, updates, or deletes the matching task under the integration's
//! project. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
