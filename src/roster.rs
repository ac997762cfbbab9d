//! Roster entities and the in-memory entity store
//!
//! A `Person` carries the level, its full history, shared notes, per-admin
//! annotations, and the zero-crossing counter. The `RosterStore` holds the
//! roster in seed order; all mutation flows through the engine, which is the
//! only module with mutable access.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lowest valid level
pub const LEVEL_MIN: u8 = 0;
/// Highest valid level
pub const LEVEL_MAX: u8 = 10;

/// Clamp a requested level into `[LEVEL_MIN, LEVEL_MAX]`.
///
/// Out-of-range input is never an error anywhere in the crate.
pub fn clamp_level(requested: i32) -> u8 {
    requested.clamp(LEVEL_MIN as i32, LEVEL_MAX as i32) as u8
}

/// A tracked person
///
/// Invariants maintained by the engine and the decode boundary:
/// - `LEVEL_MIN <= level <= LEVEL_MAX`
/// - `history` is non-empty and `history.last() == Some(&level)`
/// - `zero_count` equals the number of post-creation transitions into 0
///   from a non-zero prior level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Stable positive id, assigned at seed time, immutable
    pub id: u32,
    /// Display name, non-empty, immutable (no rename path exists)
    pub name: String,
    /// Current level
    pub level: u8,
    /// Every level this person has held, oldest first
    pub history: Vec<u8>,
    /// Shared free-text notes, last-write-wins across admins
    #[serde(default)]
    pub notes: String,
    /// Per-admin annotations; each admin exclusively owns their key
    #[serde(default)]
    pub admin_notes: BTreeMap<String, String>,
    /// Count of transitions into level 0 from a non-zero level
    #[serde(default)]
    pub zero_count: u32,
}

impl Person {
    /// Create a freshly-seeded person at the given level
    pub fn seeded(id: u32, name: &str, level: u8) -> Self {
        Self {
            id,
            name: name.to_string(),
            level,
            history: vec![level],
            notes: String::new(),
            admin_notes: BTreeMap::new(),
            zero_count: 0,
        }
    }

    /// Apply a level change, maintaining history and the zero-entry counter.
    ///
    /// Returns `false` when the value equals the current level: repeated
    /// identical writes never duplicate history entries.
    pub(crate) fn apply_level(&mut self, new_level: u8) -> bool {
        if new_level == self.level {
            return false;
        }
        if new_level == 0 && self.level != 0 {
            self.zero_count += 1;
        }
        self.history.push(new_level);
        self.level = new_level;
        true
    }
}

/// The compiled-in default roster, used at first run and on reset
pub fn default_roster() -> Vec<Person> {
    vec![
        Person::seeded(1, "يوسف", 5),
        Person::seeded(2, "نور", 4),
        Person::seeded(3, "علي", 3),
        Person::seeded(4, "محمود", 2),
        Person::seeded(5, "كريم", 1),
    ]
}

/// In-memory canonical roster, seed order preserved
///
/// Persons are never added or removed outside `replace` (reset path); the
/// roster is small and bounded, so id lookup is a linear scan.
#[derive(Debug, Clone, Default)]
pub struct RosterStore {
    persons: Vec<Person>,
}

impl RosterStore {
    pub fn new(persons: Vec<Person>) -> Self {
        Self { persons }
    }

    /// Lookup by id
    pub fn get(&self, id: u32) -> Option<&Person> {
        self.persons.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut Person> {
        self.persons.iter_mut().find(|p| p.id == id)
    }

    /// Full roster in seed order
    pub fn list(&self) -> &[Person] {
        &self.persons
    }

    /// Owned copy of the current roster, for persistence snapshots
    pub fn snapshot(&self) -> Vec<Person> {
        self.persons.clone()
    }

    /// Replace the whole roster (reset path only)
    pub(crate) fn replace(&mut self, persons: Vec<Person>) {
        self.persons = persons;
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_level() {
        assert_eq!(clamp_level(-3), 0);
        assert_eq!(clamp_level(0), 0);
        assert_eq!(clamp_level(7), 7);
        assert_eq!(clamp_level(10), 10);
        assert_eq!(clamp_level(99), 10);
    }

    #[test]
    fn test_apply_level_appends_history() {
        let mut p = Person::seeded(1, "test", 5);
        assert!(p.apply_level(3));
        assert_eq!(p.level, 3);
        assert_eq!(p.history, vec![5, 3]);
    }

    #[test]
    fn test_apply_level_same_value_is_noop() {
        let mut p = Person::seeded(1, "test", 5);
        assert!(!p.apply_level(5));
        assert_eq!(p.history, vec![5]);
        assert_eq!(p.zero_count, 0);
    }

    #[test]
    fn test_zero_count_only_on_entry() {
        let mut p = Person::seeded(1, "test", 5);
        // 5→0 (count), 0→3, 3→0 (count), 0→0 noop, 0→7, 7→0 (count)
        for level in [0, 3, 0, 0, 7, 0] {
            p.apply_level(level);
        }
        assert_eq!(p.zero_count, 3);
        assert_eq!(p.history, vec![5, 0, 3, 0, 7, 0]);
        assert_eq!(*p.history.last().unwrap(), p.level);
    }

    #[test]
    fn test_seed_at_zero_does_not_count() {
        let p = Person::seeded(1, "test", 0);
        assert_eq!(p.zero_count, 0);
        assert_eq!(p.history, vec![0]);
    }

    #[test]
    fn test_default_roster_shape() {
        let roster = default_roster();
        assert_eq!(roster.len(), 5);
        let ids: Vec<u32> = roster.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        for p in &roster {
            assert_eq!(p.history, vec![p.level]);
            assert!(p.notes.is_empty());
            assert!(p.admin_notes.is_empty());
            assert_eq!(p.zero_count, 0);
        }
    }

    #[test]
    fn test_store_lookup_preserves_order() {
        let store = RosterStore::new(default_roster());
        assert_eq!(store.get(3).map(|p| p.level), Some(3));
        assert!(store.get(99).is_none());
        let names: Vec<&str> = store.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["يوسف", "نور", "علي", "محمود", "كريم"]);
    }
}
