//! Call-site capture of a single boolean check.
//!
//! An [`Expression`] is the outcome of one condition plus where it was
//! written. The passing path never builds a string: the source text is a
//! `&'static str` produced by `stringify!` (or absent), and text is only
//! rendered when a violation is reported.

use std::borrow::Cow;
use std::panic::Location;

/// Placeholder used when neither captured text nor the source line is
/// available.
pub const UNAVAILABLE_TEXT: &str = "<unavailable>";

/// Immutable record of one checked condition.
///
/// The `result` is fixed when the record is built; nothing re-evaluates the
/// condition afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Expression {
    file: &'static str,
    line: u32,
    column: u32,
    text: Option<&'static str>,
    result: bool,
}

impl Expression {
    /// Build a record from explicit parts.
    ///
    /// Used for synthesized records (the invariant guard builds its failure
    /// record this way); most callers want [`expr!`](crate::expr) or
    /// [`Expression::capture`].
    #[must_use]
    pub const fn new(
        file: &'static str,
        line: u32,
        column: u32,
        text: Option<&'static str>,
        result: bool,
    ) -> Self {
        Self {
            file,
            line,
            column,
            text,
            result,
        }
    }

    /// Record `result` at the caller's location, without source text.
    ///
    /// If this record ends up in a fatal diagnostic, the text is recovered
    /// from the source file on a best-effort basis. Parameter errors report
    /// [`UNAVAILABLE_TEXT`] instead.
    #[must_use]
    #[track_caller]
    pub fn capture(result: bool) -> Self {
        let location = Location::caller();
        Self::new(
            location.file(),
            location.line(),
            location.column(),
            None,
            result,
        )
    }

    /// Record `result` at the caller's location, along with its source text.
    #[must_use]
    #[track_caller]
    pub fn capture_with_text(result: bool, text: &'static str) -> Self {
        let location = Location::caller();
        Self::new(
            location.file(),
            location.line(),
            location.column(),
            Some(text),
            result,
        )
    }

    /// The same call site, reporting a different text.
    ///
    /// Returns a new record; the original is untouched.
    #[must_use]
    pub const fn with_text(self, text: &'static str) -> Self {
        Self {
            text: Some(text),
            ..self
        }
    }

    /// The same call site with a different outcome.
    #[must_use]
    pub const fn with_result(self, result: bool) -> Self {
        Self { result, ..self }
    }

    /// Source file of the call site.
    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// 1-based line of the call site.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// 1-based column of the call site.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Captured source text, if any.
    #[must_use]
    pub const fn text(&self) -> Option<&'static str> {
        self.text
    }

    /// Outcome of the condition.
    #[must_use]
    pub const fn result(&self) -> bool {
        self.result
    }

    /// Text to print in a diagnostic: the captured text, or
    /// [`UNAVAILABLE_TEXT`]. Never touches the filesystem.
    #[must_use]
    pub fn render_text(&self) -> Cow<'static, str> {
        Cow::Borrowed(self.text.unwrap_or(UNAVAILABLE_TEXT))
    }

    /// Like [`render_text`](Self::render_text), but without captured text
    /// the source line at `file:line` is read from disk.
    ///
    /// The path is relative to the directory the crate was built from, so
    /// this only helps when the process runs from there (tests, local runs).
    /// Used by the fatal reporter only.
    #[must_use]
    pub fn recover_text(&self) -> Cow<'static, str> {
        if let Some(text) = self.text {
            return Cow::Borrowed(text);
        }
        source_line(self.file, self.line).map_or(Cow::Borrowed(UNAVAILABLE_TEXT), Cow::Owned)
    }
}

fn source_line(file: &str, line: u32) -> Option<String> {
    let index = usize::try_from(line.checked_sub(1)?).ok()?;
    let contents = std::fs::read_to_string(file).ok()?;
    let text = contents.lines().nth(index)?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

/// Evaluate a condition and capture it, with its source text, at the call
/// site.
///
/// ```
/// use contract::expr;
///
/// let x = 3;
/// let e = expr!(x > 2);
/// assert!(e.result());
/// assert_eq!(e.text(), Some("x > 2"));
/// ```
#[macro_export]
macro_rules! expr {
    ($cond:expr $(,)?) => {
        $crate::Expression::capture_with_text($cond, ::core::stringify!($cond))
    };
}
