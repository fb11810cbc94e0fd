//! Violation records and the fatal reporter.
//!
//! Every non-parameter failure, including a broken [`Invariant`](crate::Invariant),
//! ends in [`terminate`]. It writes one diagnostic to stderr and aborts the
//! process. Abort is not a panic: `catch_unwind` cannot intercept it, no
//! destructors run, and a `panic = "unwind"` build behaves the same as a
//! `panic = "abort"` one.

use std::fmt;
use std::io::Write as _;

use serde::Serialize;

use crate::config::{self, DiagnosticFormat};
use crate::expression::Expression;

/// Which contract was violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ContractKind {
    /// Caller-supplied argument check. Recoverable.
    Parameter,
    /// Function entry assumption. Fatal.
    Precondition,
    /// Mid-function assumption. Fatal.
    Condition,
    /// Function exit guarantee. Fatal.
    Postcondition,
    /// Tracked object changed within a scope. Fatal.
    Invariant,
}

impl ContractKind {
    /// Label used in diagnostics.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Parameter => "Parameter",
            Self::Precondition => "Precondition",
            Self::Condition => "Condition",
            Self::Postcondition => "Postcondition",
            Self::Invariant => "Invariant",
        }
    }

    /// Whether a violation of this kind ends the process.
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        !matches!(self, Self::Parameter)
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single contract failure, ready to be reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Which contract failed.
    pub kind: ContractKind,
    /// Source file of the failing check.
    pub file: &'static str,
    /// 1-based line of the failing check.
    pub line: u32,
    /// 1-based column of the failing check.
    pub column: u32,
    /// Source text of the condition, or the tracked type name for
    /// invariants.
    pub text: String,
}

impl Violation {
    /// Build the record for a failing expression from its captured text.
    /// Never reads the filesystem.
    #[must_use]
    pub fn from_expression(kind: ContractKind, expression: &Expression) -> Self {
        Self::with_text(kind, expression, expression.render_text().into_owned())
    }

    /// Like [`from_expression`](Self::from_expression), but falls back to
    /// the source line on disk when no text was captured.
    #[must_use]
    pub fn recovered(kind: ContractKind, expression: &Expression) -> Self {
        Self::with_text(kind, expression, expression.recover_text().into_owned())
    }

    const fn with_text(kind: ContractKind, expression: &Expression, text: String) -> Self {
        Self {
            kind,
            file: expression.file(),
            line: expression.line(),
            column: expression.column(),
            text,
        }
    }

    /// Render in the requested diagnostic format, without a trailing newline.
    #[must_use]
    pub fn render(&self, format: DiagnosticFormat) -> String {
        match format {
            DiagnosticFormat::Text => self.to_string(),
            DiagnosticFormat::Json => {
                serde_json::to_string(self).unwrap_or_else(|_| self.to_string())
            }
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}:{}: {}", self.kind, self.file, self.line, self.text)
    }
}

/// Report a fatal violation and abort the process.
///
/// Writes the diagnostic in the configured format, emits a `tracing` error
/// event when enabled, then calls [`std::process::abort`]. The write is
/// best-effort: a failing stderr does not prevent termination, and lines
/// from other threads may interleave with it.
#[cold]
#[inline(never)]
pub fn terminate(kind: ContractKind, expression: &Expression) -> ! {
    let violation = Violation::recovered(kind, expression);
    let diagnostics = &config::current().diagnostics;

    if diagnostics.trace {
        tracing::error!(
            kind = %violation.kind,
            file = violation.file,
            line = violation.line,
            column = violation.column,
            text = %violation.text,
            "contract violated, terminating"
        );
    }

    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{}", violation.render(diagnostics.format));
    let _ = stderr.flush();

    std::process::abort()
}
