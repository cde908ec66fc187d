use thiserror::Error;

use crate::solver::SolveError;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Bad quantity or pack configuration, rejected before solving.
    #[error(transparent)]
    InvalidInput(#[from] SolveError),

    /// Order quantity over the configured cap.
    #[error("order quantity {quantity} exceeds the limit of {max}")]
    QuantityAboveLimit { quantity: u32, max: u32 },

    /// Failure reported by a storage collaborator, passed through unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::QuantityAboveLimit { .. })
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
