use std::{collections::HashMap, fmt::Debug, hash::Hash};

use log::debug;

use crate::Identifier;

/// Content fingerprint of a cached item. `transform` covers placement only,
/// `payload` covers everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint {
    pub transform: u64,
    pub payload: u64,
}

/// How much of an item must be resent. `Payload` implies `Transform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DirtyKind {
    Transform,
    Payload,
}

/// An item that can live in a [`ContentCache`]
pub trait Cached: Clone {
    type Key: Eq + Hash + Ord + Clone + Debug;

    fn key(&self) -> Self::Key;
    fn identifier(&self) -> Identifier;
    fn fingerprint(&self) -> Fingerprint;
}

struct Record<T> {
    item: T,
    fingerprint: Fingerprint,
    /// Fingerprint of the last successful export, None if never exported
    flushed: Option<Fingerprint>,
    forced: Option<DirtyKind>,
    touched: bool,
}

impl<T> Record<T> {
    fn dirty_kind(&self, always_mark_dirty: bool) -> Option<DirtyKind> {
        let by_content = match &self.flushed {
            None => Some(DirtyKind::Payload),
            Some(flushed) if flushed.payload != self.fingerprint.payload => Some(DirtyKind::Payload),
            Some(flushed) if flushed.transform != self.fingerprint.transform => {
                Some(DirtyKind::Transform)
            }
            Some(_) => None,
        };
        let forced = if always_mark_dirty {
            Some(DirtyKind::Payload)
        } else {
            self.forced
        };
        by_content.max(forced)
    }
}

/// What an export took from a cache. Handing it back to
/// [`ContentCache::commit`] after the export succeeded clears exactly what
/// was exported.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheTicket<K> {
    exported: Vec<(K, Fingerprint)>,
    deleted: Vec<K>,
}

impl<K> CacheTicket<K> {
    pub fn is_empty(&self) -> bool {
        self.exported.is_empty() && self.deleted.is_empty()
    }
}

impl<K> Default for CacheTicket<K> {
    fn default() -> Self {
        Self {
            exported: Vec::new(),
            deleted: Vec::new(),
        }
    }
}

/// Snapshot of a cache's pending changes
pub struct CacheExport<T: Cached> {
    pub dirty: Vec<(DirtyKind, T)>,
    pub deleted: Vec<Identifier>,
    pub ticket: CacheTicket<T::Key>,
}

/// Keyed record store that decides what changed since the last successful
/// export and what disappeared.
///
/// Each cycle the producer `add`s or `touch`es every item that still exists,
/// then calls `erase_stale` to move the rest into the deleted list. Dirty
/// state is only cleared by `commit` / `clear_dirty_flags`, which must be
/// called after the export succeeded.
pub struct ContentCache<T: Cached> {
    records: HashMap<T::Key, Record<T>>,
    deleted: Vec<(T::Key, Identifier)>,
    always_mark_dirty: bool,
}

impl<T: Cached> ContentCache<T> {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
            deleted: Vec::new(),
            always_mark_dirty: false,
        }
    }

    /// Inserts or replaces the live record for `item.key()` and marks it
    /// touched. Returns true if this call changed the stored content.
    pub fn add(&mut self, item: T) -> bool {
        let key = item.key();
        let fingerprint = item.fingerprint();
        self.deleted.retain(|(deleted_key, _)| *deleted_key != key);

        match self.records.get_mut(&key) {
            Some(record) => {
                let changed = record.fingerprint != fingerprint;
                record.item = item;
                record.fingerprint = fingerprint;
                record.touched = true;
                changed
            }
            None => {
                self.records.insert(
                    key,
                    Record {
                        item,
                        fingerprint,
                        flushed: None,
                        forced: None,
                        touched: true,
                    },
                );
                true
            }
        }
    }

    /// Marks a record as still present this cycle. Returns false for unknown keys.
    pub fn touch(&mut self, key: &T::Key) -> bool {
        match self.records.get_mut(key) {
            Some(record) => {
                record.touched = true;
                true
            }
            None => false,
        }
    }

    /// Moves a record to the deleted list right away
    pub fn erase(&mut self, key: &T::Key) -> bool {
        match self.records.remove(key) {
            Some(record) => {
                self.push_deleted(key.clone(), record.item.identifier());
                true
            }
            None => false,
        }
    }

    /// Moves every record not added or touched since the previous sweep to
    /// the deleted list, then resets the touched flags. Returns the number
    /// of records removed.
    pub fn erase_stale(&mut self) -> usize {
        let mut stale: Vec<T::Key> = self
            .records
            .iter()
            .filter(|(_, record)| !record.touched)
            .map(|(key, _)| key.clone())
            .collect();
        stale.sort();

        for key in &stale {
            if let Some(record) = self.records.remove(key) {
                self.push_deleted(key.clone(), record.item.identifier());
            }
        }
        for record in self.records.values_mut() {
            record.touched = false;
        }

        if !stale.is_empty() {
            debug!("ContentCache: erased {} stale records", stale.len());
        }
        stale.len()
    }

    fn push_deleted(&mut self, key: T::Key, identifier: Identifier) {
        self.deleted.retain(|(deleted_key, _)| *deleted_key != key);
        self.deleted.push((key, identifier));
    }

    pub fn get(&self, key: &T::Key) -> Option<&T> {
        self.records.get(key).map(|record| &record.item)
    }

    pub fn dirty_kind(&self, key: &T::Key) -> Option<DirtyKind> {
        self.records
            .get(key)
            .and_then(|record| record.dirty_kind(self.always_mark_dirty))
    }

    /// Dirty items ordered by key
    pub fn get_dirty(&self) -> Vec<(DirtyKind, T)> {
        let mut dirty: Vec<(&T::Key, DirtyKind, &T)> = self
            .records
            .iter()
            .filter_map(|(key, record)| {
                record
                    .dirty_kind(self.always_mark_dirty)
                    .map(|kind| (key, kind, &record.item))
            })
            .collect();
        dirty.sort_by(|a, b| a.0.cmp(b.0));
        dirty
            .into_iter()
            .map(|(_, kind, item)| (kind, item.clone()))
            .collect()
    }

    pub fn get_deleted(&self) -> Vec<Identifier> {
        self.deleted
            .iter()
            .map(|(_, identifier)| identifier.clone())
            .collect()
    }

    /// Snapshot of every pending change plus the ticket to commit it with
    pub fn export(&self) -> CacheExport<T> {
        let dirty = self.get_dirty();
        let exported = dirty
            .iter()
            .map(|(_, item)| (item.key(), item.fingerprint()))
            .collect();
        CacheExport {
            dirty,
            deleted: self.get_deleted(),
            ticket: CacheTicket {
                exported,
                deleted: self.deleted.iter().map(|(key, _)| key.clone()).collect(),
            },
        }
    }

    /// Clears dirty state for what the ticket exported. Records changed again
    /// since the snapshot stay dirty.
    pub fn commit(&mut self, ticket: &CacheTicket<T::Key>) {
        for (key, fingerprint) in &ticket.exported {
            if let Some(record) = self.records.get_mut(key) {
                if record.fingerprint == *fingerprint {
                    record.flushed = Some(*fingerprint);
                    record.forced = None;
                }
            }
        }
        self.deleted
            .retain(|(key, _)| !ticket.deleted.contains(key));
    }

    /// Treats every live record as exported and forgets every deletion
    pub fn clear_dirty_flags(&mut self) {
        for record in self.records.values_mut() {
            record.flushed = Some(record.fingerprint);
            record.forced = None;
        }
        self.deleted.clear();
    }

    pub fn mark_dirty(&mut self, key: &T::Key) -> bool {
        match self.records.get_mut(key) {
            Some(record) => {
                record.forced = Some(DirtyKind::Payload);
                true
            }
            None => false,
        }
    }

    pub fn make_dirty_all(&mut self) {
        for record in self.records.values_mut() {
            record.forced = Some(DirtyKind::Payload);
        }
    }

    /// While set, every live record reports as dirty. Used for full resends.
    pub fn set_always_mark_dirty(&mut self, value: bool) {
        self.always_mark_dirty = value;
    }

    pub fn always_mark_dirty(&self) -> bool {
        self.always_mark_dirty
    }

    pub fn all(&self) -> impl Iterator<Item = &T> {
        self.records.values().map(|record| &record.item)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.deleted.clear();
    }
}

impl<T: Cached> Default for ContentCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
