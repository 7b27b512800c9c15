//! Aggro list — per-monster hate and damage bookkeeping.
//!
//! Maps attacker object ID to `{hate, damage}`. Backed by a concurrent map
//! plus a small insertion-order ledger, since map iteration order alone
//! cannot give a stable tie-break.

use std::sync::Mutex;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::object::ObjectId;

/// Hate and cumulative damage attributed to one attacker.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AggroEntry {
    pub hate: i32,
    pub damage: i64,
}

/// Concurrent per-actor hate table.
///
/// Created with the monster, cleared on death or return-home.
#[derive(Debug, Default)]
pub struct AggroList {
    entries: DashMap<ObjectId, AggroEntry>,
    /// Insertion order, for the most-hated tie-break. Guarded by its own
    /// lock since `DashMap` iteration order is not stable across inserts.
    order: Mutex<Vec<ObjectId>>,
}

impl AggroList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add hate against `attacker`. Creates the entry (with 0 damage) if
    /// absent, recording insertion order on first sight.
    pub fn add_hate(&self, attacker: ObjectId, amount: i32) {
        if amount == 0 {
            return;
        }
        self.touch_order(attacker);
        self.entries.entry(attacker).or_default().hate += amount;
    }

    /// Add damage dealt by `attacker`, without necessarily adding hate.
    pub fn add_damage(&self, attacker: ObjectId, amount: i64) {
        if amount == 0 {
            return;
        }
        self.touch_order(attacker);
        self.entries.entry(attacker).or_default().damage += amount;
    }

    fn touch_order(&self, attacker: ObjectId) {
        if !self.entries.contains_key(&attacker) {
            let mut order = self.order.lock().unwrap();
            if !order.contains(&attacker) {
                order.push(attacker);
            }
        }
    }

    /// Remove an attacker entirely (target resolved to dead/missing).
    pub fn remove(&self, attacker: ObjectId) {
        self.entries.remove(&attacker);
        self.order.lock().unwrap().retain(|id| *id != attacker);
    }

    /// Returns the attacker with the highest hate, ties broken by earliest
    /// insertion. Returns `ObjectId::NONE` if the list is empty.
    #[must_use]
    pub fn most_hated(&self) -> ObjectId {
        let order = self.order.lock().unwrap();
        let mut best: Option<(ObjectId, i32)> = None;
        for &id in order.iter() {
            if let Some(entry) = self.entries.get(&id) {
                match best {
                    Some((_, best_hate)) if entry.hate <= best_hate => {}
                    _ => best = Some((id, entry.hate)),
                }
            }
        }
        best.map(|(id, _)| id).unwrap_or(ObjectId::NONE)
    }

    /// Returns `true` if no attacker is currently tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of attackers currently tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current entry for an attacker, if any.
    #[must_use]
    pub fn get(&self, attacker: ObjectId) -> Option<AggroEntry> {
        self.entries.get(&attacker).map(|e| *e)
    }

    /// Clear all hate and damage. Called on death or return-home.
    pub fn clear(&self) {
        self.entries.clear();
        self.order.lock().unwrap().clear();
    }

    /// Returns a snapshot of all tracked attacker IDs, in insertion order.
    #[must_use]
    pub fn attacker_ids(&self) -> Vec<ObjectId> {
        self.order.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_has_no_most_hated() {
        let list = AggroList::new();
        assert!(list.is_empty());
        assert_eq!(list.most_hated(), ObjectId::NONE);
    }

    #[test]
    fn most_hated_is_argmax_of_hate() {
        let list = AggroList::new();
        list.add_hate(ObjectId(1), 50);
        list.add_hate(ObjectId(2), 200);
        assert_eq!(list.most_hated(), ObjectId(2));
    }

    #[test]
    fn ties_break_on_insertion_order() {
        let list = AggroList::new();
        list.add_hate(ObjectId(1), 10);
        list.add_hate(ObjectId(2), 10);
        // Both have equal hate; ObjectId(1) was inserted first.
        assert_eq!(list.most_hated(), ObjectId(1));
    }

    #[test]
    fn remove_drops_entry_and_order() {
        let list = AggroList::new();
        list.add_hate(ObjectId(1), 10);
        list.add_hate(ObjectId(2), 20);
        list.remove(ObjectId(2));
        assert_eq!(list.most_hated(), ObjectId(1));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn clear_empties_the_list() {
        let list = AggroList::new();
        list.add_hate(ObjectId(1), 10);
        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.most_hated(), ObjectId::NONE);
    }

    #[test]
    fn add_damage_does_not_require_hate() {
        let list = AggroList::new();
        list.add_damage(ObjectId(1), 500);
        assert_eq!(list.get(ObjectId(1)).unwrap().damage, 500);
        assert_eq!(list.get(ObjectId(1)).unwrap().hate, 0);
    }
}
