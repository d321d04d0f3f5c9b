use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// A type seen while expanding a property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TypeSite {
    pub type_token: String,
    pub property: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DeepExpansion {
    pub type_token: String,
    pub property: String,
    pub depth: usize,
}

/// Data-quality findings of one synthesis run. Nothing here is fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Unresolvable type tokens and how often each degraded to `string`.
    pub missing_types: BTreeMap<String, usize>,
    pub cycles: BTreeSet<TypeSite>,
    pub excluded: BTreeSet<TypeSite>,
    /// Composite tokens resolved to `object` and handed to expansion.
    pub expansion_candidates: BTreeSet<String>,
    pub deep_expansions: BTreeSet<DeepExpansion>,
    /// `$ref` pointers that matched no definition.
    pub dangling_references: BTreeSet<String>,
}

impl Diagnostics {
    pub fn record_missing(&mut self, type_token: &str) {
        *self.missing_types.entry(type_token.to_string()).or_default() += 1;
    }

    pub fn record_cycle(&mut self, type_token: &str, property: &str) {
        self.cycles.insert(site(type_token, property));
    }

    pub fn record_excluded(&mut self, type_token: &str, property: &str) {
        self.excluded.insert(site(type_token, property));
    }

    pub fn record_candidate(&mut self, type_token: &str) {
        self.expansion_candidates.insert(type_token.to_string());
    }

    pub fn record_deep(&mut self, type_token: &str, property: &str, depth: usize) {
        self.deep_expansions.insert(DeepExpansion {
            type_token: type_token.to_string(),
            property: property.to_string(),
            depth,
        });
    }

    /// Missing types sorted by ascending count, then by name.
    pub fn missing_types_by_count(&self) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self
            .missing_types
            .iter()
            .map(|(token, count)| (token.as_str(), *count))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(b.0)));
        entries
    }

    pub fn is_clean(&self) -> bool {
        self.missing_types.is_empty()
            && self.cycles.is_empty()
            && self.dangling_references.is_empty()
    }

    /// Log the unresolved-type report.
    pub fn log_missing_types(&self) {
        if self.missing_types.is_empty() {
            info!("No missing types");
            return;
        }
        info!("Missing types ({}):", self.missing_types.len());
        for (token, count) in self.missing_types_by_count() {
            info!("  {token}: {count}");
        }
    }
}

fn site(type_token: &str, property: &str) -> TypeSite {
    TypeSite {
        type_token: type_token.to_string(),
        property: property.to_string(),
    }
}
