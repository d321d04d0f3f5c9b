pub mod generic;
pub mod names;
pub mod traversal;

pub use generic::*;
pub use names::*;
pub use traversal::*;

/// Whether `name` falls under one of `prefixes` (plain string prefix match).
///
/// An empty prefix includes everything.
pub fn matches_included<S: AsRef<str>>(name: &str, prefixes: &[S]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p.as_ref()))
}

/// Whether `name` is `ancestor` itself or one of its dotted descendants.
pub fn is_path_within(name: &str, ancestor: &str) -> bool {
    name == ancestor
        || name
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('.'))
}
