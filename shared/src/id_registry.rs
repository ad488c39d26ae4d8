use std::{collections::HashMap, hash::Hash};

use log::debug;

use crate::types::INVALID_ID;

/// An opaque per-object handle supplied by a host application
pub trait Handle: Eq + Hash + Clone {
    fn is_null(&self) -> bool;
}

/// Host object handle, typically a pointer or a host-side object key.
/// Zero is the null handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostHandle(pub u64);

impl Handle for HostHandle {
    fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl Handle for String {
    fn is_null(&self) -> bool {
        self.is_empty()
    }
}

struct IdRecord {
    id: i32,
    queried: bool,
}

/// Maps host handles to small, stable integer ids.
///
/// Ids start at 0 and are strictly increasing. A handle keeps its id until a
/// stale sweep runs in a cycle where the handle was not queried; after that it
/// is given a fresh id if it reappears.
pub struct IdRegistry<H: Handle> {
    records: HashMap<H, IdRecord>,
    seed: i32,
}

impl<H: Handle> IdRegistry<H> {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            seed: 0,
        }
    }

    /// Returns the id for `handle`, allocating one on first sight.
    /// A null handle yields [`INVALID_ID`].
    pub fn get_id(&mut self, handle: &H) -> i32 {
        if handle.is_null() {
            return INVALID_ID;
        }

        if let Some(record) = self.records.get_mut(handle) {
            record.queried = true;
            return record.id;
        }

        let id = self.seed;
        self.seed += 1;
        self.records.insert(handle.clone(), IdRecord { id, queried: true });
        id
    }

    /// Looks up an id without marking the handle as queried
    pub fn peek_id(&self, handle: &H) -> i32 {
        self.records
            .get(handle)
            .map(|record| record.id)
            .unwrap_or(INVALID_ID)
    }

    /// Forgets every handle not queried since the previous sweep, then resets
    /// the queried flags for the next cycle. Returns the number of handles removed.
    pub fn erase_stale_records(&mut self) -> usize {
        let before = self.records.len();
        self.records.retain(|_, record| record.queried);
        for record in self.records.values_mut() {
            record.queried = false;
        }
        let removed = before - self.records.len();
        if removed > 0 {
            debug!("IdRegistry: erased {} stale handles", removed);
        }
        removed
    }

    pub fn contains(&self, handle: &H) -> bool {
        self.records.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.seed = 0;
    }
}

impl<H: Handle> Default for IdRegistry<H> {
    fn default() -> Self {
        Self::new()
    }
}
