//! Atomic operation log.
//!
//! Records the effective update per slot since the array was last clean,
//! not an event stream: re-recording a slot overwrites or merges into it.
//! The backing store accepts one operator per array path, so incompatible
//! combinations collapse into a whole-array `Set`.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde_json::Value;

/// Identity of a log slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomicKey {
    Set,
    SetAt(usize),
    Push,
    AddToSet,
    PullAll,
    Pull,
    Pop,
}

/// End an atomic pop removes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopEnd {
    Back,
    Front,
}

impl PopEnd {
    /// Direction argument of `$pop`.
    pub fn direction(self) -> i8 {
        match self {
            PopEnd::Back => 1,
            PopEnd::Front => -1,
        }
    }
}

/// A recorded mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum AtomicOp {
    /// Replace the whole array. The payload is read from the current
    /// elements when the log is translated.
    Set,
    SetAt { index: usize, value: Value },
    Push(Vec<Value>),
    AddToSet(Vec<Value>),
    PullAll(Vec<Value>),
    /// Remove elements by `_id`.
    Pull { ids: Vec<Value> },
    Pop(PopEnd),
}

impl AtomicOp {
    pub fn key(&self) -> AtomicKey {
        match self {
            AtomicOp::Set => AtomicKey::Set,
            AtomicOp::SetAt { index, .. } => AtomicKey::SetAt(*index),
            AtomicOp::Push(_) => AtomicKey::Push,
            AtomicOp::AddToSet(_) => AtomicKey::AddToSet,
            AtomicOp::PullAll(_) => AtomicKey::PullAll,
            AtomicOp::Pull { .. } => AtomicKey::Pull,
            AtomicOp::Pop(_) => AtomicKey::Pop,
        }
    }

    /// Update operator this op translates to.
    pub fn operator(&self) -> &'static str {
        match self {
            AtomicOp::Set | AtomicOp::SetAt { .. } => "$set",
            AtomicOp::Push(_) => "$push",
            AtomicOp::AddToSet(_) => "$addToSet",
            AtomicOp::PullAll(_) => "$pullAll",
            AtomicOp::Pull { .. } => "$pull",
            AtomicOp::Pop(_) => "$pop",
        }
    }

    fn merge(&mut self, op: AtomicOp) {
        match (self, op) {
            (AtomicOp::Push(each), AtomicOp::Push(more))
            | (AtomicOp::PullAll(each), AtomicOp::PullAll(more))
            | (AtomicOp::Pull { ids: each }, AtomicOp::Pull { ids: more }) => each.extend(more),
            (AtomicOp::AddToSet(each), AtomicOp::AddToSet(more)) => {
                for value in more {
                    if !each.contains(&value) {
                        each.push(value);
                    }
                }
            }
            (slot, op) => *slot = op,
        }
    }
}

/// Log contents, keyed by slot, in recording order.
pub type Atomics = IndexMap<AtomicKey, AtomicOp>;

/// The atomics of one array plus the backup taken when a save begins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AtomicLog {
    atomics: Atomics,
    backup: Option<Atomics>,
}

impl AtomicLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log starting from a copy of `atomics`, with no backup.
    pub fn carried(atomics: &Atomics) -> Self {
        Self {
            atomics: atomics.clone(),
            backup: None,
        }
    }

    pub fn record(&mut self, op: AtomicOp) {
        let key = op.key();
        if key == AtomicKey::Set {
            self.atomics.clear();
            self.atomics.insert(key, op);
            return;
        }
        if self.atomics.contains_key(&AtomicKey::Set) {
            return;
        }
        let conflict = self.atomics.keys().any(|existing| match key {
            AtomicKey::SetAt(_) => !matches!(existing, AtomicKey::SetAt(_)),
            _ => *existing != key,
        });
        if conflict {
            log::debug!("{} conflicts with pending atomics; collapsing to $set", op.operator());
            self.atomics.clear();
            self.atomics.insert(AtomicKey::Set, AtomicOp::Set);
            return;
        }
        match self.atomics.entry(key) {
            Entry::Occupied(mut slot) => slot.get_mut().merge(op),
            Entry::Vacant(slot) => {
                slot.insert(op);
            }
        }
    }

    /// Save the current atomics for a later [`restore`](Self::restore).
    ///
    /// Keeps an existing backup untouched.
    pub fn snapshot(&mut self) {
        if self.backup.is_some() {
            log::debug!("atomics backup already present; keeping the earlier one");
            return;
        }
        self.backup = Some(self.atomics.clone());
    }

    pub fn restore(&mut self) {
        if let Some(backup) = self.backup.take() {
            log::debug!("restoring {} atomics from backup", backup.len());
            self.atomics = backup;
        }
    }

    pub fn clear(&mut self) {
        self.atomics.clear();
        self.backup = None;
    }

    pub fn atomics(&self) -> &Atomics {
        &self.atomics
    }

    pub fn backup(&self) -> Option<&Atomics> {
        self.backup.as_ref()
    }

    pub fn has_backup(&self) -> bool {
        self.backup.is_some()
    }

    pub fn get(&self, key: &AtomicKey) -> Option<&AtomicOp> {
        self.atomics.get(key)
    }

    pub fn contains(&self, key: &AtomicKey) -> bool {
        self.atomics.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.atomics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atomics.is_empty()
    }
}
