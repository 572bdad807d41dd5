//! Error taxonomy for the domain services.
//!
//! Services return `anyhow::Result` (the repository layer does too); the
//! variants below are attached to the chain so callers can tell the cases
//! apart with `err.downcast_ref::<DomainError>()`. Sum-invariant violations
//! are deliberately *not* here: those are structured
//! [`AllocationValidation`](crate::domain::models::allocation::AllocationValidation)
//! values, never errors.

/// The failure cases a caller is expected to branch on.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Recurring task template is paused: {template_id}. Resume it before generating.")]
    InactiveTemplate { template_id: String },

    #[error("Invalid task status: {value}")]
    InvalidStatus { value: String },

    /// The delete phase of a replace-wholesale save failed; the existing
    /// allocation rows for the scope were left untouched.
    #[error("Failed to clear existing allocations for {scope}")]
    ClearFailed { scope: String },

    /// The insert phase of a replace-wholesale save failed; the scope was
    /// already cleared and is now allocation-less. Documented behavior of the
    /// clear-then-insert sequence, not masked here.
    #[error("Failed to save allocations for {scope}")]
    SaveFailed { scope: String },
}
