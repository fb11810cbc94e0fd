//! Scope-bound invariant guard.
//!
//! An [`Invariant`] hashes the tracked object when it is created and again
//! when it goes out of scope. A different hash is reported like a failed
//! postcondition: the process aborts with the tracked type's name.
//!
//! # Hash equality
//!
//! The "value" of the object is its hash, nothing more. A change that
//! happens to leave the hash unchanged is not detected. This keeps the guard
//! usable with any `Hash` type, including ones without `Eq`.
//!
//! # Borrowing
//!
//! The guard borrows the object for its whole life. With an exclusive
//! borrow (`&mut T`) all access goes through the guard's `Deref`/`DerefMut`,
//! and the borrow checker rejects a second guard or direct access:
//!
//! ```compile_fail
//! use contract::Invariant;
//!
//! let mut s = String::from("hi");
//! let first = Invariant::new(&mut s);
//! let second = Invariant::new(&mut s);
//! ```
//!
//! Guards are not `Clone`:
//!
//! ```compile_fail
//! use contract::Invariant;
//!
//! let s = String::from("hi");
//! let guard = Invariant::new(&s);
//! let copy = Clone::clone(&guard);
//! ```
//!
//! A shared borrow (`&T`) works for types with interior mutability that
//! hash their current contents:
//!
//! ```
//! use std::cell::Cell;
//! use std::hash::{Hash, Hasher};
//!
//! use contract::Invariant;
//!
//! struct Counter(Cell<u32>);
//!
//! impl Hash for Counter {
//!     fn hash<H: Hasher>(&self, state: &mut H) {
//!         self.0.get().hash(state);
//!     }
//! }
//!
//! let counter = Counter(Cell::new(1));
//! let guard = Invariant::new(&counter);
//! counter.0.set(2);
//! assert!(!guard.is_intact());
//! counter.0.set(1);
//! guard.finish();
//! ```
//!
//! Concurrent mutation of the object from another thread is not detected.

use std::collections::hash_map::RandomState;
use std::hash::{BuildHasher, Hash};
use std::ops::{Deref, DerefMut};

use crate::expression::Expression;
use crate::report::{self, ContractKind};
use crate::type_name;

/// Lifecycle of an [`Invariant`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    /// Snapshot taken; the re-check has not run.
    Armed,
    /// The re-check ran and the hash matched. Terminal.
    Finalized,
}

/// Checks that an object's hash does not change before the guard is
/// dropped.
///
/// ```
/// use contract::Invariant;
///
/// fn shout(name: &mut String) -> String {
///     let name = Invariant::new(name);
///     name.to_uppercase()
/// }
///
/// let mut name = String::from("hi");
/// assert_eq!(shout(&mut name), "HI");
/// ```
pub struct Invariant<R, S = RandomState>
where
    R: Deref,
    R::Target: Hash,
    S: BuildHasher,
{
    tracked: R,
    hasher: S,
    snapshot: u64,
    expression: Expression,
    state: GuardState,
}

impl<R> Invariant<R>
where
    R: Deref,
    R::Target: Hash,
{
    /// Snapshot `tracked`, recording the caller's location for reports.
    #[must_use = "the invariant is checked when the guard is dropped"]
    #[track_caller]
    pub fn new(tracked: R) -> Self {
        Self::from_parts(tracked, Expression::capture(false), RandomState::new())
    }

    /// Snapshot `tracked`, reporting failures at `expression`'s location.
    ///
    /// Only the location of `expression` is used; its text and result are
    /// replaced on failure.
    #[must_use = "the invariant is checked when the guard is dropped"]
    pub fn with_expression(tracked: R, expression: Expression) -> Self {
        Self::from_parts(tracked, expression, RandomState::new())
    }
}

impl<R, S> Invariant<R, S>
where
    R: Deref,
    R::Target: Hash,
    S: BuildHasher,
{
    /// Snapshot `tracked` with a caller-chosen hasher.
    ///
    /// The same `hasher` instance is used for the snapshot and the re-check,
    /// so randomly seeded hashers are fine.
    #[must_use = "the invariant is checked when the guard is dropped"]
    #[track_caller]
    pub fn with_hasher(tracked: R, hasher: S) -> Self {
        Self::from_parts(tracked, Expression::capture(false), hasher)
    }

    /// Snapshot `tracked` with an explicit report location and hasher.
    #[must_use = "the invariant is checked when the guard is dropped"]
    pub fn from_parts(tracked: R, expression: Expression, hasher: S) -> Self {
        let snapshot = hasher.hash_one(&*tracked);
        Self {
            tracked,
            hasher,
            snapshot,
            expression,
            state: GuardState::Armed,
        }
    }

    /// Whether the object still hashes to the snapshot. Never terminates.
    #[must_use]
    pub fn is_intact(&self) -> bool {
        self.hasher.hash_one(&*self.tracked) == self.snapshot
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> GuardState {
        self.state
    }

    /// Run the re-check now instead of at scope exit.
    ///
    /// Aborts the process if the hash changed, exactly as dropping would.
    pub fn finish(mut self) {
        self.finalize();
    }

    fn finalize(&mut self) {
        if self.state == GuardState::Finalized {
            return;
        }
        if !self.is_intact() {
            let failed = self
                .expression
                .with_text(type_name::of::<R::Target>())
                .with_result(false);
            report::terminate(ContractKind::Invariant, &failed);
        }
        self.state = GuardState::Finalized;
    }
}

impl<R, S> Deref for Invariant<R, S>
where
    R: Deref,
    R::Target: Hash,
    S: BuildHasher,
{
    type Target = R::Target;

    fn deref(&self) -> &Self::Target {
        &self.tracked
    }
}

impl<R, S> DerefMut for Invariant<R, S>
where
    R: DerefMut,
    R::Target: Hash,
    S: BuildHasher,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.tracked
    }
}

impl<R, S> Drop for Invariant<R, S>
where
    R: Deref,
    R::Target: Hash,
    S: BuildHasher,
{
    fn drop(&mut self) {
        self.finalize();
    }
}
