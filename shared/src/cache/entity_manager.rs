use crate::{scene_graph::entity::Entity, Identifier};

use super::content_cache::{CacheTicket, Cached, ContentCache, DirtyKind, Fingerprint};

impl Cached for Entity {
    type Key = String;

    fn key(&self) -> String {
        self.path().to_string()
    }

    fn identifier(&self) -> Identifier {
        Entity::identifier(self)
    }

    fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            transform: self.transform_hash(),
            payload: self.payload_hash(),
        }
    }
}

/// Pending entity changes split the way they are sent: transforms in bulk,
/// geometry one entity at a time
pub struct EntityExport {
    /// Non-geometry entities, plus transform-only copies of geometry
    /// entities that merely moved
    pub transforms: Vec<Entity>,
    pub geometries: Vec<Entity>,
    pub deleted: Vec<Identifier>,
    pub ticket: CacheTicket<String>,
}

impl EntityExport {
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty() && self.geometries.is_empty() && self.deleted.is_empty()
    }
}

/// Entities keyed by path
pub struct EntityManager {
    cache: ContentCache<Entity>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self {
            cache: ContentCache::new(),
        }
    }

    /// Returns true if the stored content changed
    pub fn add(&mut self, entity: Entity) -> bool {
        self.cache.add(entity)
    }

    pub fn touch(&mut self, path: &str) -> bool {
        self.cache.touch(&path.to_string())
    }

    pub fn erase(&mut self, path: &str) -> bool {
        self.cache.erase(&path.to_string())
    }

    pub fn erase_stale(&mut self) -> usize {
        self.cache.erase_stale()
    }

    pub fn get(&self, path: &str) -> Option<&Entity> {
        self.cache.get(&path.to_string())
    }

    pub fn dirty_kind(&self, path: &str) -> Option<DirtyKind> {
        self.cache.dirty_kind(&path.to_string())
    }

    pub fn export(&self) -> EntityExport {
        let export = self.cache.export();
        let mut transforms = Vec::new();
        let mut geometries = Vec::new();
        for (kind, entity) in export.dirty {
            if !entity.is_geometry() {
                transforms.push(entity);
            } else if kind == DirtyKind::Payload {
                geometries.push(entity);
            } else {
                transforms.push(entity.transform_only());
            }
        }
        EntityExport {
            transforms,
            geometries,
            deleted: export.deleted,
            ticket: export.ticket,
        }
    }

    pub fn get_dirty_transforms(&self) -> Vec<Entity> {
        self.export().transforms
    }

    pub fn get_dirty_geometries(&self) -> Vec<Entity> {
        self.export().geometries
    }

    pub fn get_deleted(&self) -> Vec<Identifier> {
        self.cache.get_deleted()
    }

    pub fn commit(&mut self, ticket: &CacheTicket<String>) {
        self.cache.commit(ticket);
    }

    pub fn clear_dirty_flags(&mut self) {
        self.cache.clear_dirty_flags();
    }

    pub fn mark_dirty(&mut self, path: &str) -> bool {
        self.cache.mark_dirty(&path.to_string())
    }

    pub fn make_dirty_all(&mut self) {
        self.cache.make_dirty_all();
    }

    pub fn set_always_mark_dirty(&mut self, value: bool) {
        self.cache.set_always_mark_dirty(value);
    }

    pub fn all(&self) -> impl Iterator<Item = &Entity> {
        self.cache.all()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for EntityManager {
    fn default() -> Self {
        Self::new()
    }
}
