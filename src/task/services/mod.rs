//! Orchestration services for integrations and external-sync
//! reconciliation.

mod reconcile;
mod registry;

pub use reconcile::{
    ExternalStatusChange, ExternalTaskChange, ReconcileError, ReconcileResult, ReconcileService,
};
pub use registry::{
    IntegrationService, IntegrationServiceError, IntegrationServiceResult,
    RegisterIntegrationRequest, UpdateIntegrationRequest,
};
