//! Recoverable contract errors.
//!
//! Only parameter checks fail recoverably. Everything else goes through
//! [`report::terminate`](crate::report::terminate) and never produces a
//! value of this type.

use thiserror::Error;

use crate::report::{ContractKind, Violation};

/// Errors returned by [`parameters`](crate::parameters).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ContractError {
    /// A caller-supplied argument failed validation.
    ///
    /// Carries the first failing expression of the checked sequence.
    #[error("{0}")]
    Parameter(Violation),
}

impl ContractError {
    /// The failure record behind this error.
    #[must_use]
    pub const fn violation(&self) -> &Violation {
        match self {
            Self::Parameter(violation) => violation,
        }
    }

    /// Always [`ContractKind::Parameter`] today.
    #[must_use]
    pub const fn kind(&self) -> ContractKind {
        self.violation().kind
    }
}
