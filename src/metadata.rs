//! Configuration-property metadata: the input model and the merge loader.

pub mod loader;
pub mod model;

pub use loader::{load_fragments, merge, parse_fragment};
pub use model::{
    Catalogue, Deprecation, GroupEntry, HintEntry, HintValue, IgnoredEntry, IgnoredList,
    PropertyDescriptor, PropertyEntry, RawFragment, Severity,
};
