//! The incremental log.
//!
//! Per unit: the last facts collected for it and their hash. Project-wide:
//! the registration intents of every unit as an ordered event list, replayed
//! in that order on every run.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tether_diagnostic::{queue::DiagnosticQueue, Diagnostic, ErrorCode};
use tether_graph::ResolutionGraph;
use tether_ir::{ConstructorSignature, RegistrationIntent, UnitFacts};
use tracing::{debug, warn};

use crate::hash::{hash_value, ContentHash};
use crate::store::{decode, encode, BlobStore, CacheError};

/// Cached facts of one unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEntry {
    pub hash: ContentHash,
    pub facts: UnitFacts,
}

/// One registration intent, tagged with the unit that declared it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationEvent {
    pub unit: String,
    pub intent: RegistrationIntent,
}

/// Facts of every unit seen so far, plus the registration event order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncrementalLog {
    units: BTreeMap<String, UnitEntry>,
    events: Vec<RegistrationEvent>,
    /// Fingerprint of the resolution map the last artifact was emitted from.
    fingerprint: Option<u64>,
    #[serde(skip)]
    dirty: BTreeSet<String>,
}

impl IncrementalLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the facts of one unit. Returns `true` if the unit is new or
    /// its facts differ from the cached ones.
    ///
    /// Equality is full structural equality; the content hash only lets
    /// the common unchanged case skip the deep comparison when it differs.
    pub fn collect(&mut self, facts: UnitFacts) -> bool {
        let hash = hash_value(&facts);
        if let Some(prev) = self.units.get(&facts.path) {
            if prev.hash == hash && prev.facts == facts {
                return false;
            }
        }

        let path = facts.path.clone();
        self.replace_events(&path, &facts.registrations);
        self.units.insert(path.clone(), UnitEntry { hash, facts });
        debug!(unit = %path, "unit dirty");
        self.dirty.insert(path);
        true
    }

    /// Swap `unit`'s events for `intents`, keeping the position of its first
    /// old event so the rest of the order is untouched.
    fn replace_events(&mut self, unit: &str, intents: &[RegistrationIntent]) {
        let at = self
            .events
            .iter()
            .position(|e| e.unit == unit)
            .unwrap_or(self.events.len());
        self.events.retain(|e| e.unit != unit);
        let at = at.min(self.events.len());
        self.events.splice(
            at..at,
            intents.iter().map(|intent| RegistrationEvent {
                unit: unit.to_string(),
                intent: intent.clone(),
            }),
        );
    }

    /// Drop every unit not in `existing`, with its events. Returns the
    /// removed unit paths.
    pub fn retain_units<'p>(&mut self, existing: impl IntoIterator<Item = &'p str>) -> Vec<String> {
        let keep: BTreeSet<&str> = existing.into_iter().collect();
        let removed: Vec<String> = self
            .units
            .keys()
            .filter(|path| !keep.contains(path.as_str()))
            .cloned()
            .collect();
        for path in &removed {
            self.units.remove(path);
            self.dirty.remove(path);
        }
        self.events.retain(|e| keep.contains(e.unit.as_str()));
        if !removed.is_empty() {
            debug!(count = removed.len(), "dropped vanished units");
        }
        removed
    }

    /// Build a resolution graph from everything in the log: all heritage
    /// first, then every registration event in order.
    #[tracing::instrument(level = "debug", skip_all, fields(units = self.units.len(), events = self.events.len()))]
    pub fn generate_graph(&self) -> ResolutionGraph {
        let mut graph = ResolutionGraph::new();
        for entry in self.units.values() {
            graph.add_classes(entry.facts.classes.iter().cloned());
            graph.add_interfaces(entry.facts.interfaces.iter().cloned());
        }
        for event in &self.events {
            graph.register(&event.intent);
        }
        graph
    }

    /// Every cached constructor signature.
    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorSignature> {
        self.units
            .values()
            .flat_map(|entry| entry.facts.constructors.iter())
    }

    pub fn unit(&self, path: &str) -> Option<&UnitEntry> {
        self.units.get(path)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Units collected as new or changed since the log was loaded.
    pub fn dirty_units(&self) -> impl Iterator<Item = &str> {
        self.dirty.iter().map(String::as_str)
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }

    pub fn fingerprint(&self) -> Option<u64> {
        self.fingerprint
    }

    pub fn set_fingerprint(&mut self, fingerprint: u64) {
        self.fingerprint = Some(fingerprint);
    }

    /// Read a log from `store`.
    ///
    /// `Ok(None)` when the store holds nothing yet.
    pub fn try_load(store: &impl BlobStore) -> Result<Option<Self>, CacheError> {
        match store.load()? {
            Some(bytes) => decode(&bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Read a log from `store`, falling back to an empty one.
    ///
    /// A cache that cannot be used is reported as a warning (W3001); it never
    /// fails the build.
    pub fn load(store: &impl BlobStore, queue: &mut DiagnosticQueue) -> Self {
        match Self::try_load(store) {
            Ok(Some(log)) => {
                debug!(units = log.len(), source = %store.describe(), "loaded incremental log");
                log
            }
            Ok(None) => Self::new(),
            Err(err) => {
                warn!(error = %err, "discarding incremental log");
                queue.add(
                    Diagnostic::warning(ErrorCode::W3001)
                        .with_message("incremental cache is unusable and was discarded")
                        .with_unit_label(store.describe(), err.to_string())
                        .with_note("every unit is treated as changed for this run"),
                );
                Self::new()
            }
        }
    }

    /// Write the log to `store`.
    pub fn save(&self, store: &mut impl BlobStore) -> Result<(), CacheError> {
        let bytes = encode(self)?;
        debug!(bytes = bytes.len(), target = %store.describe(), "saving incremental log");
        store.store(&bytes)
    }
}
