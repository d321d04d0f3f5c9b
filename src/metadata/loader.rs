use super::model::{Catalogue, GroupEntry, HintEntry, PropertyDescriptor, PropertyEntry, RawFragment};
use crate::error::{Error, Result};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Parse one metadata source. `origin` only labels errors.
pub fn parse_fragment(origin: &str, text: &str) -> Result<RawFragment> {
    serde_json::from_str(text).map_err(|source| Error::Metadata {
        origin: origin.to_string(),
        source,
    })
}

/// Parse every `(origin, text)` source, skipping the malformed ones.
///
/// A broken source only loses its own contributions; the rest still merge.
pub fn load_fragments<I, O, T>(sources: I) -> Vec<RawFragment>
where
    I: IntoIterator<Item = (O, T)>,
    O: AsRef<str>,
    T: AsRef<str>,
{
    sources
        .into_iter()
        .filter_map(|(origin, text)| match parse_fragment(origin.as_ref(), text.as_ref()) {
            Ok(fragment) => {
                debug!(
                    origin = origin.as_ref(),
                    properties = fragment.properties.len(),
                    groups = fragment.groups.len(),
                    "Loaded metadata fragment"
                );
                Some(fragment)
            }
            Err(e) => {
                warn!("Skipping metadata source: {e}");
                None
            }
        })
        .collect()
}

/// Merge fragments into one catalogue.
///
/// Leaf properties merge first (later non-empty fields win), then groups,
/// then hints. Anything named in any fragment's ignore list is left out.
/// Hints for a name that is not a property are dropped.
pub fn merge<I>(fragments: I) -> Catalogue
where
    I: IntoIterator<Item = RawFragment>,
{
    let mut groups: Vec<GroupEntry> = Vec::new();
    let mut properties: Vec<PropertyEntry> = Vec::new();
    let mut hints: Vec<HintEntry> = Vec::new();
    let mut ignored: BTreeSet<String> = BTreeSet::new();

    for fragment in fragments {
        ignored.extend(fragment.ignored.names().map(str::to_string));
        groups.extend(fragment.groups);
        properties.extend(fragment.properties);
        hints.extend(fragment.hints);
    }

    let mut catalogue = Catalogue::new();

    for entry in properties {
        if entry.name.is_empty() || ignored.contains(&entry.name) {
            continue;
        }
        match catalogue.get_mut(&entry.name) {
            Some(existing) => {
                debug!(property = %entry.name, "Merging duplicate property");
                existing.merge_property(entry);
            }
            None => {
                catalogue.insert(entry.name.clone(), PropertyDescriptor::from_entry(entry));
            }
        }
    }

    for group in groups {
        if group.name.is_empty() || ignored.contains(&group.name) {
            continue;
        }
        catalogue
            .entry(group.name.clone())
            .or_insert_with(|| PropertyDescriptor {
                name: group.name.clone(),
                ..PropertyDescriptor::default()
            })
            .merge_group(group);
    }

    for hint in hints {
        match catalogue.get_mut(&hint.name) {
            Some(property) => property.attach_hints(hint.values),
            None => debug!(hint = %hint.name, "Hint has no matching property"),
        }
    }

    catalogue
}
