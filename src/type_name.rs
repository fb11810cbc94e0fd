//! Human-readable type names for invariant diagnostics.

/// Fully qualified name of `T`, e.g. `alloc::string::String`.
///
/// The exact text comes from [`std::any::type_name`] and is not guaranteed
/// stable across compiler versions. Use it for diagnostics only.
#[must_use]
pub fn of<T: ?Sized>() -> &'static str {
    std::any::type_name::<T>()
}

/// `name` with every module path removed, generics included.
///
/// ```
/// use contract::type_name;
///
/// assert_eq!(
///     type_name::short("std::collections::hash::map::HashMap<alloc::string::String, u32>"),
///     "HashMap<String, u32>"
/// );
/// ```
#[must_use]
pub fn short(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut segment_start = 0;
    let mut chars = name.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else if c.is_alphanumeric() || c == '_' {
            out.push(c);
        } else {
            out.push(c);
            segment_start = out.len();
        }
    }
    out
}
