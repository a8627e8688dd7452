//! String interner for identifiers and string constants.
//!
//! Lookups take a read lock and only first-time interning takes the write
//! lock, so lowering sessions on different threads can share one interner.

use super::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

#[derive(Default)]
struct InternTable {
    /// Map from string content to its index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name`.
    strings: Vec<&'static str>,
}

/// String interner shared by every session of a compilation.
///
/// The empty string is always `Name::EMPTY`, which the concatenation
/// rewrite relies on to recognise `?? ""` without a lookup.
pub struct StringInterner {
    table: RwLock<InternTable>,
}

impl StringInterner {
    pub fn new() -> Self {
        let mut table = InternTable::default();
        let empty: &'static str = "";
        table.map.insert(empty, 0);
        table.strings.push(empty);
        Self {
            table: RwLock::new(table),
        }
    }

    /// Intern a string, returning its Name.
    ///
    /// # Panics
    /// Panics if more than `u32::MAX` strings are interned.
    pub fn intern(&self, s: &str) -> Name {
        if let Some(&index) = self.table.read().map.get(s) {
            return Name::from_index(index);
        }

        let mut table = self.table.write();
        // Another thread may have interned `s` between the two locks.
        if let Some(&index) = table.map.get(s) {
            return Name::from_index(index);
        }

        let index = u32::try_from(table.strings.len())
            .unwrap_or_else(|_| panic!("interner exceeded u32::MAX strings"));
        // Interned strings live for the rest of the process.
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        table.strings.push(leaked);
        table.map.insert(leaked, index);
        Name::from_index(index)
    }

    /// Look up the string for a Name.
    pub fn lookup(&self, name: Name) -> &str {
        self.table.read().strings[name.index()]
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}
