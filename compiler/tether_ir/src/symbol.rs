//! Declaration identity.
//!
//! A `Symbol` names one declaration: the source unit it lives in plus its
//! declared name. Its `SymbolId` is the encoded form used as a lookup key
//! everywhere downstream (graph edges, resolver dispatch, cache entries).
//!
//! # Encoding
//!
//! Ids use a reversible escape so that no two `(unit_path, name)` pairs can
//! share an id. A lossy encoding that folds separators and punctuation into
//! one joiner makes `test/foo.ts::Foo` and `test-foo.ts::Foo` collide; this
//! one keeps them apart:
//!
//! | input char          | output       |
//! |---------------------|--------------|
//! | `[A-Za-z0-9]`       | itself       |
//! | `_`                 | `__`         |
//! | `/`                 | `_d`         |
//! | `.`                 | `_o`         |
//! | `-`                 | `_h`         |
//! | anything else       | `_x<hex>_`   |
//!
//! The id is `escape(unit_path) + "_S" + escape(name)`. Every sequence that
//! starts with `_` is decided by the character after it, so the encoding is
//! prefix-free and [`SymbolId::decode`] inverts it exactly.

use std::fmt::{self, Write};

/// Separator between the escaped unit path and the escaped name.
const SEPARATOR: &str = "_S";

/// Encoded, project-unique identifier of a declaration.
///
/// Only contains `[A-Za-z0-9_]`, so it can be embedded as a string key or an
/// identifier fragment in generated code without further quoting.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cache", serde(transparent))]
pub struct SymbolId(String);

impl SymbolId {
    /// Encode a `(unit_path, name)` pair.
    pub fn encode(unit_path: &str, name: &str) -> Self {
        let mut out = String::with_capacity(unit_path.len() + name.len() + SEPARATOR.len());
        escape_into(&mut out, unit_path);
        out.push_str(SEPARATOR);
        escape_into(&mut out, name);
        SymbolId(out)
    }

    /// Wrap an already-encoded id, e.g. one received at dispatch time.
    ///
    /// No validation happens here: an id that does not decode simply never
    /// matches anything.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        SymbolId(encoded.into())
    }

    /// The encoded string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the `(unit_path, name)` pair this id was encoded from.
    ///
    /// Returns `None` for strings that are not valid encodings.
    pub fn decode(&self) -> Option<(String, String)> {
        let mut path = String::new();
        let mut name = String::new();
        let mut in_name = false;
        let mut chars = self.0.chars();

        while let Some(c) = chars.next() {
            let out = if in_name { &mut name } else { &mut path };
            if c != '_' {
                if !c.is_ascii_alphanumeric() {
                    return None;
                }
                out.push(c);
                continue;
            }
            match chars.next()? {
                '_' => out.push('_'),
                'd' => out.push('/'),
                'o' => out.push('.'),
                'h' => out.push('-'),
                'x' => {
                    let mut hex = String::new();
                    loop {
                        match chars.next()? {
                            '_' => break,
                            h if h.is_ascii_hexdigit() => hex.push(h),
                            _ => return None,
                        }
                    }
                    let code = u32::from_str_radix(&hex, 16).ok()?;
                    out.push(char::from_u32(code)?);
                }
                'S' if !in_name => in_name = true,
                _ => return None,
            }
        }

        in_name.then_some((path, name))
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SymbolId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn escape_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' => out.push(c),
            '_' => out.push_str("__"),
            '/' => out.push_str("_d"),
            '.' => out.push_str("_o"),
            '-' => out.push_str("_h"),
            other => {
                let _ = write!(out, "_x{:x}_", u32::from(other));
            }
        }
    }
}

/// A declaration: source unit path, declared name, and the derived id.
///
/// Created once per declaration the extractor encounters and never mutated.
/// The id is always `SymbolId::encode(unit_path, name)`; deserialization
/// recomputes it instead of trusting stored bytes.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "cache", serde(from = "SymbolParts", into = "SymbolParts"))]
pub struct Symbol {
    unit_path: String,
    name: String,
    id: SymbolId,
}

impl Symbol {
    /// Qualify `name` as declared in `unit_path`.
    pub fn new(unit_path: impl Into<String>, name: impl Into<String>) -> Self {
        let unit_path = unit_path.into();
        let name = name.into();
        let id = SymbolId::encode(&unit_path, &name);
        Symbol {
            unit_path,
            name,
            id,
        }
    }

    /// Path of the source unit (relative to the project root).
    #[inline]
    pub fn unit_path(&self) -> &str {
        &self.unit_path
    }

    /// Declared name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Encoded project-unique id.
    #[inline]
    pub fn id(&self) -> &SymbolId {
        &self.id
    }

    /// Human-readable `unit_path::name` form used in reports.
    pub fn qualified(&self) -> String {
        format!("{}::{}", self.unit_path, self.name)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({}::{})", self.unit_path, self.name)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.unit_path, self.name)
    }
}

/// Serialized shape of a `Symbol`: the id is derived, so it is not stored.
#[cfg(feature = "cache")]
#[derive(Clone, serde::Serialize, serde::Deserialize)]
struct SymbolParts {
    unit_path: String,
    name: String,
}

#[cfg(feature = "cache")]
impl From<SymbolParts> for Symbol {
    fn from(parts: SymbolParts) -> Self {
        Symbol::new(parts.unit_path, parts.name)
    }
}

#[cfg(feature = "cache")]
impl From<Symbol> for SymbolParts {
    fn from(symbol: Symbol) -> Self {
        SymbolParts {
            unit_path: symbol.unit_path,
            name: symbol.name,
        }
    }
}

#[cfg(test)]
mod tests;
