pub mod payment;
pub mod repository;

use uuid::Uuid;

/// Errors surfaced by the persistence collaborators. The scheduler and the
/// HTTP layer branch on these variants, so they stay typed rather than
/// boxed.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },
    #[error("email already registered")]
    EmailTaken,
    #[error("plate already registered")]
    PlateTaken,
    /// Storage-level constraint rejected a write. For bookings this is the
    /// exclusion-constraint backstop; the scheduler's critical section is
    /// the primary mechanism and normally prevents this path.
    #[error("storage conflict: {0}")]
    Conflict(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
