//! The four check entry points.
//!
//! All four scan their input in order and stop at the first expression
//! whose result is false. If there is none they return without side
//! effects. What happens on a failure depends on the kind of check:
//!
//! | Function | On failure |
//! |----------|------------|
//! | [`parameters`] | returns [`ContractError::Parameter`] |
//! | [`preconditions`] | aborts via [`report::terminate`] |
//! | [`conditions`] | aborts via [`report::terminate`] |
//! | [`postconditions`] | aborts via [`report::terminate`] |
//!
//! Only the first failure is reported, even when later expressions also
//! fail. A lazy iterator is not advanced past it.

use std::borrow::Borrow;

use crate::error::ContractError;
use crate::expression::Expression;
use crate::report::{self, ContractKind, Violation};

/// First expression in `expressions` whose result is false.
fn first_failure<I>(expressions: I) -> Option<Expression>
where
    I: IntoIterator,
    I::Item: Borrow<Expression>,
{
    expressions
        .into_iter()
        .map(|e| *Borrow::<Expression>::borrow(&e))
        .find(|e| !e.result())
}

/// Validate caller-supplied arguments.
///
/// ```
/// use contract::{expr, parameters};
///
/// fn set_port(port: u32) -> Result<u32, contract::ContractError> {
///     parameters([expr!(port != 0), expr!(port <= 65_535)])?;
///     Ok(port)
/// }
///
/// assert!(set_port(8080).is_ok());
/// let err = set_port(0).unwrap_err();
/// assert!(err.to_string().ends_with("port != 0"));
/// ```
///
/// # Errors
///
/// Returns [`ContractError::Parameter`] describing the first failing
/// expression.
pub fn parameters<I>(expressions: I) -> Result<(), ContractError>
where
    I: IntoIterator,
    I::Item: Borrow<Expression>,
{
    match first_failure(expressions) {
        None => Ok(()),
        Some(failed) => {
            let violation = Violation::from_expression(ContractKind::Parameter, &failed);
            tracing::debug!(
                file = violation.file,
                line = violation.line,
                text = %violation.text,
                "parameter rejected"
            );
            Err(ContractError::Parameter(violation))
        }
    }
}

/// Check assumptions on entry to a function. Aborts on failure.
pub fn preconditions<I>(expressions: I)
where
    I: IntoIterator,
    I::Item: Borrow<Expression>,
{
    fatal(ContractKind::Precondition, expressions);
}

/// Check assumptions in the middle of a function. Aborts on failure.
pub fn conditions<I>(expressions: I)
where
    I: IntoIterator,
    I::Item: Borrow<Expression>,
{
    fatal(ContractKind::Condition, expressions);
}

/// Check guarantees on exit from a function. Aborts on failure.
pub fn postconditions<I>(expressions: I)
where
    I: IntoIterator,
    I::Item: Borrow<Expression>,
{
    fatal(ContractKind::Postcondition, expressions);
}

#[inline]
fn fatal<I>(kind: ContractKind, expressions: I)
where
    I: IntoIterator,
    I::Item: Borrow<Expression>,
{
    if let Some(failed) = first_failure(expressions) {
        report::terminate(kind, &failed);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use proptest::prelude::*;

    use super::*;
    use crate::expr;

    #[test]
    fn all_passing_returns_normally() {
        parameters([expr!(true), expr!(true), expr!(true)]).unwrap();
        preconditions([expr!(true)]);
        conditions([expr!(1 + 1 == 2)]);
        postconditions(Vec::<Expression>::new());
    }

    #[test]
    fn empty_sequence_passes() {
        assert!(parameters(std::iter::empty::<Expression>()).is_ok());
    }

    #[test]
    fn parameters_reports_first_failure() {
        let first = expr!(true);
        let second = expr!(false);
        let third = Expression::capture_with_text(false, "third");

        let err = parameters([first, second, third]).unwrap_err();
        let v = err.violation();
        assert_eq!(v.kind, ContractKind::Parameter);
        assert_eq!(v.file, second.file());
        assert_eq!(v.line, second.line());
        assert_eq!(v.text, "false");
    }

    #[test]
    fn accepts_borrowed_slices() {
        let checks = vec![expr!(true), expr!(2 < 1)];
        let err = parameters(&checks).unwrap_err();
        assert_eq!(err.violation().text, "2 < 1");
        // Still usable after the check.
        assert_eq!(checks.len(), 2);
    }

    #[test]
    fn lazy_sequence_stops_at_first_failure() {
        let evaluated = Cell::new(0);
        let lazy = [true, false, true, true].into_iter().map(|ok| {
            evaluated.set(evaluated.get() + 1);
            Expression::capture(ok)
        });
        assert!(parameters(lazy).is_err());
        assert_eq!(evaluated.get(), 2);
    }

    #[test]
    fn fatal_checks_pass_lazy_sequences_through() {
        let evaluated = Cell::new(0);
        postconditions((0..5).map(|i| {
            evaluated.set(evaluated.get() + 1);
            Expression::capture(i < 5)
        }));
        assert_eq!(evaluated.get(), 5);
    }

    proptest! {
        #[test]
        fn all_true_never_fails(len in 0usize..64) {
            let checks: Vec<Expression> = (0..len).map(|_| Expression::capture(true)).collect();
            prop_assert!(parameters(&checks).is_ok());
            preconditions(&checks);
            conditions(&checks);
            postconditions(&checks);
        }

        #[test]
        fn parameters_points_at_first_false(
            outcomes in proptest::collection::vec(any::<bool>(), 1..64)
        ) {
            let checks: Vec<Expression> = outcomes
                .iter()
                .enumerate()
                .map(|(i, &ok)| {
                    let line = u32::try_from(i + 1).unwrap();
                    Expression::new("gen.rs", line, 1, Some("generated"), ok)
                })
                .collect();
            let result = parameters(&checks);
            match outcomes.iter().position(|ok| !ok) {
                None => prop_assert!(result.is_ok()),
                Some(index) => {
                    let err = result.unwrap_err();
                    prop_assert_eq!(err.violation().line, u32::try_from(index + 1).unwrap());
                }
            }
        }
    }
}
