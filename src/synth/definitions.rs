use crate::common::names::{definition_key, definition_pointer};
use crate::schema::SchemaNode;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
enum EntryState {
    /// Expansion in progress.
    Pending,
    Expanded(SchemaNode),
    /// Expanded to nothing; never emitted.
    Empty,
    /// Pre-registered; always shared, never inlined.
    Pinned(SchemaNode),
}

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    state: EntryState,
    occurrences: usize,
}

/// What the registry knows about a type token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Unknown,
    Pending,
    Empty,
    Ready,
}

/// Shared definitions of one synthesis run.
///
/// Entries are keyed by type token; each gets a pointer-safe `$defs` key the
/// first time it is seen. Keys that normalize to the same text are told
/// apart with a numeric suffix.
#[derive(Debug, Clone, Default)]
pub struct DefinitionRegistry {
    entries: BTreeMap<String, Entry>,
    by_key: BTreeMap<String, String>,
}

impl DefinitionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition under its exact `$defs` key. Pinned entries are never inlined.
    pub fn register_pinned(&mut self, key: &str, node: SchemaNode) {
        self.by_key.insert(key.to_string(), key.to_string());
        self.entries.insert(
            key.to_string(),
            Entry {
                key: key.to_string(),
                state: EntryState::Pinned(node),
                occurrences: 0,
            },
        );
    }

    pub fn lookup(&self, type_token: &str) -> Lookup {
        match self.entries.get(type_token).map(|e| &e.state) {
            None => Lookup::Unknown,
            Some(EntryState::Pending) => Lookup::Pending,
            Some(EntryState::Empty) => Lookup::Empty,
            Some(EntryState::Expanded(_) | EntryState::Pinned(_)) => Lookup::Ready,
        }
    }

    /// Mark `type_token` as being expanded. Returns `false` when it is already known.
    pub fn begin(&mut self, type_token: &str) -> bool {
        if self.entries.contains_key(type_token) {
            return false;
        }
        let key = self.allocate_key(type_token);
        self.entries.insert(
            type_token.to_string(),
            Entry {
                key,
                state: EntryState::Pending,
                occurrences: 0,
            },
        );
        true
    }

    /// Complete a pending entry; `None` records a type that expanded to nothing.
    pub fn register(&mut self, type_token: &str, node: Option<SchemaNode>) {
        if !self.entries.contains_key(type_token) {
            self.begin(type_token);
        }
        if let Some(entry) = self.entries.get_mut(type_token) {
            if entry.state == EntryState::Pending {
                entry.state = match node {
                    Some(node) => EntryState::Expanded(node),
                    None => EntryState::Empty,
                };
            }
        }
    }

    pub fn get(&self, type_token: &str) -> Option<&SchemaNode> {
        match &self.entries.get(type_token)?.state {
            EntryState::Expanded(node) | EntryState::Pinned(node) => Some(node),
            _ => None,
        }
    }

    /// Count one more occurrence site of `type_token`.
    pub fn record_occurrence(&mut self, type_token: &str) {
        if let Some(entry) = self.entries.get_mut(type_token) {
            entry.occurrences += 1;
        }
    }

    /// Shared once seen at a second site; pinned entries are always shared.
    pub fn should_promote(&self, type_token: &str) -> bool {
        self.entries.get(type_token).is_some_and(|e| match e.state {
            EntryState::Pinned(_) => true,
            EntryState::Expanded(_) => e.occurrences >= 2,
            _ => false,
        })
    }

    /// Pointer to the `$defs` entry of `type_token`, allocating its key if needed.
    pub fn reference(&mut self, type_token: &str) -> String {
        if !self.entries.contains_key(type_token) {
            self.begin(type_token);
        }
        let key = self
            .entries
            .get(type_token)
            .map(|e| e.key.clone())
            .unwrap_or_else(|| definition_key(type_token));
        definition_pointer(&key)
    }

    /// Entry body addressed by a `$defs` key, with whether it is shared.
    pub fn by_key(&self, key: &str) -> Option<(&SchemaNode, bool)> {
        let token = self.by_key.get(key)?;
        let node = self.get(token)?;
        Some((node, self.should_promote(token)))
    }

    fn allocate_key(&mut self, type_token: &str) -> String {
        let base = definition_key(type_token);
        let mut key = base.clone();
        let mut n = 2;
        while self.by_key.contains_key(&key) {
            key = format!("{base}_{n}");
            n += 1;
        }
        self.by_key.insert(key.clone(), type_token.to_string());
        key
    }
}
