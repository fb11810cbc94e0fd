//! Run a piece of a test in a child process.
//!
//! Code that aborts the process cannot be tested in-process: the abort takes
//! the test harness down with it. [`isolated!`] re-runs the current test
//! binary, filtered to the calling test, with a marker in the environment.
//! In the child the closure runs and the process exits; in the parent the
//! child's exit status and output come back as an [`Isolated`].
//!
//! ```no_run
//! use contract_testkit::isolated;
//!
//! #[test]
//! fn abort_is_observed() {
//!     let child = isolated!(abort_is_observed, || std::process::abort())
//!         .expect("spawn child");
//!     assert!(child.aborted());
//! }
//! ```
//!
//! The first argument must be the name of the enclosing `#[test]` function,
//! and the enclosing test must not be `#[ignore]`d or it will not match the
//! filter in the child.

use std::io;
use std::process::{Command, ExitStatus};

/// Set in the child to the name of the test it should run.
pub const CHILD_ENV: &str = "CONTRACT_TESTKIT_CHILD";

/// Outcome of a child run.
#[derive(Debug)]
pub struct Isolated {
    /// How the child ended.
    pub status: ExitStatus,
    /// Everything the child wrote to stdout, including harness chatter.
    pub stdout: String,
    /// Everything the child wrote to stderr.
    pub stderr: String,
}

impl Isolated {
    /// The closure returned and the child exited cleanly.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.status.success()
    }

    /// The child did not exit cleanly: it aborted, panicked, or exited with
    /// a non-zero status.
    #[must_use]
    pub fn terminated(&self) -> bool {
        !self.status.success()
    }

    /// The child ended through `abort()` specifically.
    #[must_use]
    pub fn aborted(&self) -> bool {
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt as _;
            const SIGABRT: i32 = 6;
            self.status.signal() == Some(SIGABRT)
        }
        #[cfg(windows)]
        {
            // `abort()` ends in `__fastfail`: STATUS_STACK_BUFFER_OVERRUN.
            const FAST_FAIL: u32 = 0xC000_0409;
            self.status.code().map(|c| u32::from_ne_bytes(c.to_ne_bytes())) == Some(FAST_FAIL)
        }
        #[cfg(not(any(unix, windows)))]
        {
            self.terminated()
        }
    }

    /// Non-blank lines of stderr.
    pub fn stderr_lines(&self) -> impl Iterator<Item = &str> {
        self.stderr.lines().filter(|l| !l.trim().is_empty())
    }
}

/// Test-harness path of a test function, from `module_path!()` and the
/// function name.
///
/// The first segment of the module path is the crate name, which the
/// harness does not include in test names.
#[must_use]
pub fn test_name(module_path: &str, function: &str) -> String {
    match module_path.split_once("::") {
        Some((_, rest)) if !rest.is_empty() => format!("{rest}::{function}"),
        _ => function.to_owned(),
    }
}

/// Whether this process is the child spawned for `test`.
#[must_use]
pub fn is_child(test: &str) -> bool {
    std::env::var(CHILD_ENV).is_ok_and(|name| name == test)
}

/// Run `body` in a child process and report how it ended.
///
/// In the child (see [`is_child`]) this runs `body` and exits with status 0
/// if it returns. In the parent it never runs `body`.
///
/// # Errors
///
/// Fails if the child cannot be spawned, or if `test` did not match exactly
/// one test in the child (a misspelled name would otherwise look like a
/// clean run).
pub fn run<F: FnOnce()>(test: &str, body: F) -> io::Result<Isolated> {
    if is_child(test) {
        body();
        std::process::exit(0);
    }

    let exe = std::env::current_exe()?;
    tracing::debug!(test, exe = %exe.display(), "spawning isolated child");

    let output = Command::new(&exe)
        .args([test, "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV, test)
        .output()?;

    let isolated = Isolated {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    if !isolated.stdout.contains("running 1 test") {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("`{test}` did not match exactly one test in {}", exe.display()),
        ));
    }

    tracing::debug!(test, status = %isolated.status, "isolated child finished");
    Ok(isolated)
}

/// Run a closure in a child process. See the [crate docs](crate).
#[macro_export]
macro_rules! isolated {
    ($test:ident, $body:expr $(,)?) => {
        $crate::run(
            &$crate::test_name(::core::module_path!(), ::core::stringify!($test)),
            $body,
        )
    };
}
