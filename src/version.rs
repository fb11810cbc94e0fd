//! Library version and license text.

/// Version of this library, `x.y.z` with optional pre-release tags.
#[must_use]
pub const fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Full text of the software license.
#[must_use]
pub const fn license() -> &'static str {
    include_str!("../LICENSE")
}
