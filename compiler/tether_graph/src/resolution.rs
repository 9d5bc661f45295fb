//! Finalized resolution map.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::Hasher;

use rustc_hash::FxHasher;
use tether_ir::{Lifetime, Symbol, SymbolId};

/// The single concrete an abstract id resolves to.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Resolution {
    pub concrete: Symbol,
    pub lifetime: Lifetime,
}

impl Resolution {
    pub fn new(concrete: Symbol, lifetime: Lifetime) -> Self {
        Resolution { concrete, lifetime }
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.concrete.name()
    }

    #[inline]
    pub fn unit_path(&self) -> &str {
        self.concrete.unit_path()
    }
}

/// Abstract id → resolution, ordered by id.
///
/// Ordered storage keeps everything derived from the map (codegen, the
/// fingerprint, `tether graph` output) reproducible.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ResolutionMap {
    entries: BTreeMap<SymbolId, Resolution>,
}

impl ResolutionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, id: SymbolId, resolution: Resolution) {
        self.entries.insert(id, resolution);
    }

    #[inline]
    pub fn get(&self, id: &SymbolId) -> Option<&Resolution> {
        self.entries.get(id)
    }

    #[inline]
    pub fn contains(&self, id: &SymbolId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SymbolId, &Resolution)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct concrete symbols used as resolution targets, in id order.
    pub fn concretes(&self) -> Vec<&Symbol> {
        let mut seen = BTreeMap::new();
        for resolution in self.entries.values() {
            seen.entry(resolution.concrete.id())
                .or_insert(&resolution.concrete);
        }
        seen.into_values().collect()
    }

    /// Fingerprint of the map: a hash over `abstract=name-unit` lines.
    ///
    /// Lifetime changes alone do not alter it.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        for (id, resolution) in &self.entries {
            hasher.write(id.as_str().as_bytes());
            hasher.write_u8(b'=');
            hasher.write(resolution.name().as_bytes());
            hasher.write_u8(b'-');
            hasher.write(resolution.unit_path().as_bytes());
            hasher.write_u8(b'\n');
        }
        hasher.finish()
    }
}

impl fmt::Display for ResolutionMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, resolution) in &self.entries {
            let shown = id
                .decode()
                .map(|(path, name)| format!("{path}::{name}"))
                .unwrap_or_else(|| id.to_string());
            writeln!(
                f,
                "{shown} => {} ({})",
                resolution.concrete.qualified(),
                resolution.lifetime
            )?;
        }
        Ok(())
    }
}
