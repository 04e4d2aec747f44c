//! Name resolution.
//!
//! Two retained types collide when they share a bare name but come from
//! different locations. Every colliding location receives a prefix built
//! from its trailing path segments, one segment per round, until its prefix
//! is unique among the locations still in the pool.

use crate::collector::RetainedSet;
use crate::config::SnapshotConfig;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use typesnap_core::{NodeId, TypeGraph, is_reserved_keyword};

/// Mapping from defining location to synthesized prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixTable {
    prefixes: HashMap<String, String>,
    rounds: usize,
}

impl PrefixTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the prefix of `location`, empty if it has none.
    #[must_use]
    pub fn prefix(&self, location: &str) -> &str {
        self.prefixes.get(location).map_or("", String::as_str)
    }

    /// Sets the prefix of `location`.
    pub fn insert(&mut self, location: impl Into<String>, prefix: impl Into<String>) {
        self.prefixes.insert(location.into(), prefix.into());
    }

    /// Returns the number of locations with an entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    /// Returns true if no location has an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// Returns the number of synthesis rounds that were needed.
    #[must_use]
    pub const fn rounds(&self) -> usize {
        self.rounds
    }

    /// Iterates over `(location, prefix)` entries in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes.iter().map(|(l, p)| (l.as_str(), p.as_str()))
    }
}

/// Upper-cases the first letter of every word.
///
/// A word starts after any character that is not a letter, digit or
/// underscore.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if at_word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        at_word_start = is_word_separator(c);
    }
    out
}

fn is_word_separator(c: char) -> bool {
    if c.is_ascii() {
        return !(c.is_ascii_alphanumeric() || c == '_');
    }
    if c.is_alphanumeric() {
        return false;
    }
    c.is_whitespace()
}

/// Builds the prefix contribution of one path segment.
fn segment_prefix(segment: &str) -> String {
    title_case(segment)
        .chars()
        .filter(|&c| c == '_' || c.is_alphanumeric())
        .collect()
}

/// Computes the prefixes of the colliding locations in `pool`.
///
/// A location is resolved once its prefix is unique among every prefix in
/// the pool, including those of locations resolved in earlier rounds.
/// Locations that run out of segments contribute nothing further; if every
/// remaining location is exhausted and some still collide, they receive an
/// ordinal.
fn synthesize(pool: &BTreeSet<&str>) -> PrefixTable {
    let segments: BTreeMap<&str, Vec<&str>> = pool
        .iter()
        .map(|&location| {
            let parts = location.rsplit('/').filter(|s| !s.is_empty()).collect();
            (location, parts)
        })
        .collect();

    let mut prefixes: BTreeMap<&str, String> =
        pool.iter().map(|&location| (location, String::new())).collect();
    let mut ambiguous: BTreeSet<&str> = pool.clone();
    let mut round = 0;

    while !ambiguous.is_empty() {
        let exhausted = ambiguous
            .iter()
            .all(|location| segments[location].len() <= round);
        if exhausted {
            assign_ordinals(&ambiguous, &mut prefixes);
            break;
        }

        for &location in &ambiguous {
            if let Some(segment) = segments[location].get(round) {
                let prefix = prefixes.entry(location).or_default();
                *prefix = segment_prefix(segment) + prefix.as_str();
            }
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for prefix in prefixes.values() {
            *counts.entry(prefix.as_str()).or_default() += 1;
        }
        let resolved: Vec<&str> = ambiguous
            .iter()
            .copied()
            .filter(|location| counts[prefixes[location].as_str()] == 1)
            .collect();
        for location in resolved {
            ambiguous.remove(location);
        }

        round += 1;
        tracing::debug!(
            "Prefix round {}: {} locations still ambiguous",
            round,
            ambiguous.len()
        );
    }

    let mut table = PrefixTable::new();
    for (location, prefix) in prefixes {
        table.insert(location, prefix);
    }
    table.rounds = round;
    table
}

/// Appends ordinals to locations whose prefixes can no longer be told apart.
///
/// Locations are numbered in path order. The first of each group keeps its
/// prefix unless a resolved location already holds it; every ordinal skips
/// prefixes that are taken.
fn assign_ordinals<'a>(ambiguous: &BTreeSet<&'a str>, prefixes: &mut BTreeMap<&'a str, String>) {
    let mut taken: HashSet<String> = prefixes
        .iter()
        .filter(|(location, _)| !ambiguous.contains(*location))
        .map(|(_, prefix)| prefix.clone())
        .collect();

    for &location in ambiguous {
        let Some(prefix) = prefixes.get_mut(location) else {
            continue;
        };
        let mut candidate = prefix.clone();
        let mut ordinal = 1;
        while taken.contains(&candidate) {
            ordinal += 1;
            candidate = format!("{prefix}{ordinal}");
        }
        if ordinal > 1 {
            tracing::warn!(
                "Location '{}' cannot be told apart by its path; using ordinal {}",
                location,
                ordinal
            );
        }
        taken.insert(candidate.clone());
        *prefix = candidate;
    }
}

/// Drops anonymous types from `retained` and computes the prefix table.
///
/// The embed location always receives the empty prefix.
pub fn resolve_names(
    graph: &TypeGraph,
    retained: &mut RetainedSet,
    config: &SnapshotConfig,
) -> PrefixTable {
    let dropped = retained.drop_anonymous(graph);
    tracing::debug!("Dropped {} anonymous types", dropped);

    let mut buckets: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for id in retained.iter() {
        let node = graph.node(id);
        buckets.entry(node.name()).or_default().insert(node.location());
    }

    let pool: BTreeSet<&str> = buckets
        .values()
        .filter(|locations| locations.len() > 1)
        .flatten()
        .copied()
        .collect();
    tracing::debug!("Collision pool holds {} locations", pool.len());

    let mut table = synthesize(&pool);
    if let Some(&embed) = pool.iter().find(|location| config.is_embedded(location)) {
        table.insert(embed, "");
    }
    table
}

/// Returns the final display name of a named type.
#[must_use]
pub fn display_name(
    graph: &TypeGraph,
    id: NodeId,
    prefixes: &PrefixTable,
    config: &SnapshotConfig,
) -> String {
    let node = graph.node(id);
    let base = node.name();
    if node.is_builtin() {
        return base.to_string();
    }

    let prefix = prefixes.prefix(node.location());
    let mut name = if prefix.is_empty() {
        base.to_string()
    } else {
        let joined = format!("{prefix}{}", title_case(base));
        if base.chars().next().is_some_and(char::is_uppercase) {
            joined
        } else {
            lowercase_first(&joined)
        }
    };

    if !is_reserved_keyword(&name) {
        name.push_str(&config.suffix);
    }
    name
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
