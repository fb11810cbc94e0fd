//! Design-by-contract checks.
//!
//! Wrap conditions with [`expr!`] and hand them to one of the check
//! functions:
//!
//! - [`parameters`] validates caller-supplied input and returns a
//!   [`ContractError`] on failure, so the caller can reject or retry.
//! - [`preconditions`], [`conditions`] and [`postconditions`] treat a
//!   failure as a programming error: a diagnostic is written to stderr and
//!   the process aborts.
//! - [`Invariant`] aborts at scope exit if the tracked object's hash
//!   changed.
//!
//! ```
//! use contract::{expr, parameters, postconditions, preconditions};
//!
//! fn average(values: &[f64]) -> Result<f64, contract::ContractError> {
//!     parameters([expr!(!values.is_empty())])?;
//!     preconditions([expr!(values.iter().all(|v| v.is_finite()))]);
//!
//!     let mean = values.iter().sum::<f64>() / values.len() as f64;
//!
//!     postconditions([expr!(mean.is_finite())]);
//!     Ok(mean)
//! }
//!
//! assert_eq!(average(&[1.0, 3.0]).unwrap(), 2.0);
//! assert!(average(&[]).is_err());
//! ```
//!
//! Fatal diagnostics look like `Precondition: src/lib.rs:12: x > 0`. See
//! [`config`] for the JSON format.

pub mod check;
pub mod config;
pub mod error;
pub mod expression;
pub mod invariant;
pub mod report;
pub mod telemetry;
pub mod type_name;
pub mod version;

pub use check::{conditions, parameters, postconditions, preconditions};
pub use error::ContractError;
pub use expression::Expression;
pub use invariant::{GuardState, Invariant};
pub use report::{ContractKind, Violation};
pub use version::{license, version};
