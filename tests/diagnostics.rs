//! Diagnostic formatting of fatal violations, per configuration.

use contract::config::{self, ContractConfig, DiagnosticFormat, DiagnosticsConfig};
use contract::{expr, preconditions};
use contract_testkit::isolated;

#[test]
fn json_diagnostic() {
    let child = isolated!(json_diagnostic, || {
        let json = ContractConfig {
            diagnostics: DiagnosticsConfig {
                format: DiagnosticFormat::Json,
                trace: false,
            },
        };
        assert!(config::install(json).is_ok());
        let budget = 0;
        preconditions([expr!(budget > 10)]);
    })
    .expect("spawn child");
    assert!(child.aborted());

    let line = child
        .stderr_lines()
        .find(|l| l.starts_with('{'))
        .unwrap_or_else(|| panic!("no json line in: {}", child.stderr));
    let value: serde_json::Value = serde_json::from_str(line).expect("valid json");
    assert_eq!(value["kind"], "Precondition");
    assert_eq!(value["file"], file!());
    assert_eq!(value["text"], "budget > 10");
    assert!(value["line"].as_u64().is_some_and(|l| l > 0));
}

#[test]
fn install_only_once() {
    let child = isolated!(install_only_once, || {
        assert!(config::install(ContractConfig::default()).is_ok());
        let again = config::install(ContractConfig::default());
        assert_eq!(again, Err(ContractConfig::default()));
        assert_eq!(config::current(), &ContractConfig::default());
    })
    .expect("spawn child");
    assert!(child.completed(), "stderr: {}", child.stderr);
}

#[test]
fn text_diagnostic_with_tracing_subscriber() {
    let child = isolated!(text_diagnostic_with_tracing_subscriber, || {
        assert_eq!(
            contract::telemetry::init_with(contract::telemetry::Mode::Json),
            contract::telemetry::Mode::Json
        );
        let parts = ["a", "b"];
        preconditions([expr!(parts.len() == 3)]);
    })
    .expect("spawn child");
    assert!(child.aborted());
    assert!(
        child
            .stderr_lines()
            .any(|l| l.starts_with("Precondition: ") && l.ends_with(": parts.len() == 3")),
        "stderr: {}",
        child.stderr
    );
    assert!(
        child
            .stderr_lines()
            .any(|l| l.contains("contract violated, terminating")),
        "stderr: {}",
        child.stderr
    );
}
