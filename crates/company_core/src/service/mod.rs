//! Directory use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Resolve employee -> department references as an explicit second lookup.
//! - Log store failures before handing them back unchanged.
//!
//! # Invariants
//! - Services never bypass repository validation.
//! - Services remain storage-agnostic.

pub mod department_service;
pub mod employee_service;

use crate::repo::RepoError;
use log::{error, warn};

/// Logs a failed use-case call; validation rejects are warnings, the rest errors.
pub(crate) fn log_failure(event: &str, err: &RepoError) {
    match err {
        RepoError::Validation(_) => warn!(
            "event={event} module=service status=rejected error_code=validation_failed error={err}"
        ),
        RepoError::NotFound { .. } => warn!(
            "event={event} module=service status=error error_code=not_found error={err}"
        ),
        _ => error!("event={event} module=service status=error error_code=store_failed error={err}"),
    }
}
