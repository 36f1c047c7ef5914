use crate::types::DbId;

/// Domain-level error taxonomy.
///
/// Every rejected precondition carries enough detail for the caller to act:
/// the entity and id for `NotFound`, the standing decision for
/// `AlreadyProcessed`, the named limit for `LimitExceeded`.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("This request has already been {decision}")]
    AlreadyProcessed { decision: &'static str },

    #[error("Limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("Immutable: {0}")]
    Immutable(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
