//! Interned filename tokens.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use intaglio::{Symbol, SymbolTable};
use parking_lot::Mutex;
use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

/// Unicode normalization form applied to names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    None,
    Nfc,
    Nfd,
}

impl Normalization {
    fn apply(self, raw: &str) -> String {
        match self {
            Normalization::None => raw.to_owned(),
            Normalization::Nfc => raw.nfc().collect(),
            Normalization::Nfd => raw.nfd().collect(),
        }
    }
}

/// A single path segment.
///
/// Carries the display form preserved for listing and a canonical symbol
/// interned by the owning [`NameRegistry`]. Equality and hashing use the
/// canonical symbol, so two names match whenever the configured
/// normalization and case policy say they do.
#[derive(Debug, Clone)]
pub struct Name {
    display: Arc<str>,
    key: Symbol,
}

impl Name {
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Name) -> bool {
        self.key == other.key
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Normalization-aware name interner, one per filesystem instance.
#[derive(Debug)]
pub struct NameRegistry {
    canonical: Normalization,
    display: Normalization,
    case_insensitive: bool,
    symbols: Mutex<SymbolTable>,
}

impl NameRegistry {
    pub fn new(canonical: Normalization, display: Normalization, case_insensitive: bool) -> Self {
        Self { canonical, display, case_insensitive, symbols: Mutex::new(SymbolTable::new()) }
    }

    /// Intern a raw segment under the configured policy.
    pub fn name(&self, raw: &str) -> Name {
        let display: Arc<str> = Arc::from(self.display.apply(raw));
        let mut canonical = self.canonical.apply(raw);
        if self.case_insensitive {
            canonical = canonical.to_lowercase();
        }
        let key = self.symbols.lock().intern(canonical).expect("name table overflow");
        Name { display, key }
    }
}
