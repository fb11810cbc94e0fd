//! Check functions: passing sequences, recoverable parameter errors, and
//! process termination for the fatal kinds.

use contract::expression::UNAVAILABLE_TEXT;
use contract::{
    ContractError, ContractKind, Expression, conditions, expr, parameters, postconditions,
    preconditions,
};
use contract_testkit::isolated;

#[test]
fn passing() {
    parameters([expr!(true)]).expect("parameters should pass");
    preconditions([expr!(true)]);
    conditions([expr!(true)]);
    postconditions([expr!(true)]);
}

#[test]
fn parameters_all_true() {
    assert!(parameters([expr!(true), expr!(true), expr!(true)]).is_ok());
}

#[test]
fn parameters_reports_second_element() {
    let checks = [expr!(true), expr!(false), expr!(true)];
    let err = parameters(checks).expect_err("second check fails");

    let ContractError::Parameter(violation) = &err else {
        panic!("unexpected error: {err:?}");
    };
    assert_eq!(violation.kind, ContractKind::Parameter);
    assert_eq!(violation.file, checks[1].file());
    assert_eq!(violation.line, checks[1].line());
    assert_eq!(violation.text, "false");
    assert_eq!(
        err.to_string(),
        format!("Parameter: {}:{}: false", checks[1].file(), checks[1].line())
    );
}

#[test]
fn parameters_error_propagates_with_question_mark() {
    fn open(port: u16, host: &str) -> Result<String, ContractError> {
        parameters([expr!(port != 0), expr!(!host.is_empty())])?;
        Ok(format!("{host}:{port}"))
    }

    assert_eq!(open(80, "example").as_deref(), Ok("example:80"));
    let err = open(80, "").expect_err("empty host");
    assert_eq!(err.violation().text, "!host.is_empty()");
}

#[test]
fn parameters_without_text_stays_off_disk() {
    let n = 0;
    let err = parameters([Expression::capture(n > 0)]).expect_err("n is zero");
    assert_eq!(err.violation().text, UNAVAILABLE_TEXT);
    assert_eq!(err.violation().file, file!());
}

#[test]
fn fatal_without_text_reads_source_line() {
    let child = isolated!(fatal_without_text_reads_source_line, || {
        let n = 0;
        preconditions([Expression::capture(n > 0)]);
    })
    .expect("spawn child");
    assert!(child.aborted());
    assert!(
        child
            .stderr_lines()
            .any(|l| l.starts_with("Precondition: ")
                && l.ends_with(": preconditions([Expression::capture(n > 0)]);")),
        "stderr: {}",
        child.stderr
    );
}

#[test]
fn preconditions_false_terminates() {
    let child = isolated!(preconditions_false_terminates, || {
        preconditions([expr!(false)]);
    })
    .expect("spawn child");
    assert!(child.aborted(), "child status: {}", child.status);
    assert!(
        child.stderr_lines().any(|l| l.starts_with("Precondition: ") && l.ends_with(": false")),
        "stderr: {}",
        child.stderr
    );
}

#[test]
fn conditions_false_terminates() {
    let child = isolated!(conditions_false_terminates, || {
        let ready = false;
        conditions([expr!(true), expr!(ready)]);
    })
    .expect("spawn child");
    assert!(child.aborted());
    assert!(
        child.stderr_lines().any(|l| l.starts_with("Condition: ") && l.ends_with(": ready")),
        "stderr: {}",
        child.stderr
    );
}

#[test]
fn postconditions_false_terminates() {
    let child = isolated!(postconditions_false_terminates, || {
        let len = 3;
        postconditions([expr!(len == 3), expr!(len < 2), expr!(len > 100)]);
    })
    .expect("spawn child");
    assert!(child.aborted());
    let reported: Vec<&str> = child
        .stderr_lines()
        .filter(|l| l.starts_with("Postcondition: "))
        .collect();
    assert_eq!(reported.len(), 1, "stderr: {}", child.stderr);
    assert!(reported[0].ends_with(": len < 2"));
}

#[test]
fn fatal_checks_are_not_catchable() {
    let child = isolated!(fatal_checks_are_not_catchable, || {
        let caught = std::panic::catch_unwind(|| preconditions([expr!(1 > 2)]));
        println!("caught: {}", caught.is_err());
    })
    .expect("spawn child");
    assert!(child.aborted());
    assert!(!child.stdout.contains("caught:"));
}

#[test]
fn passing_fatal_checks_do_not_terminate() {
    let child = isolated!(passing_fatal_checks_do_not_terminate, || {
        preconditions([expr!(true); 8]);
        conditions(Vec::<Expression>::new());
        postconditions([expr!(2 > 1)]);
    })
    .expect("spawn child");
    assert!(child.completed(), "stderr: {}", child.stderr);
}
