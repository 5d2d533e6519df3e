use serde::Serialize;

/// Failure raised by a record store implementation.
///
/// The store boundary is deliberately coarse: any infrastructure problem
/// (backend outage, timeout, connection loss) collapses into `Unavailable`.
/// Services decide whether to degrade a read or propagate a write failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Error taxonomy shared by every commerce service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Cart is empty")]
    EmptyCart,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => ServiceError::StoreUnavailable(msg),
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the error message suitable for user-facing surfaces.
    /// Infrastructure failures return a generic message to avoid leaking
    /// backend details.
    pub fn response_message(&self) -> String {
        match self {
            Self::StoreUnavailable(_) => "Service temporarily unavailable".to_string(),
            _ => self.to_string(),
        }
    }

    /// True for failures worth retrying from the caller's side.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StoreUnavailable(_))
    }
}
