use scenesync_serde::{HashWriter, Serde};

use crate::{scene_graph::material::Material, Identifier};

use super::content_cache::{CacheTicket, Cached, ContentCache, Fingerprint};

impl Cached for Material {
    type Key = i32;

    fn key(&self) -> i32 {
        self.id
    }

    fn identifier(&self) -> Identifier {
        Material::identifier(self)
    }

    fn fingerprint(&self) -> Fingerprint {
        let mut hasher = HashWriter::new();
        self.name.ser(&mut hasher);
        self.ser_payload(&mut hasher);
        Fingerprint {
            transform: 0,
            payload: hasher.finish(),
        }
    }
}

pub struct MaterialExport {
    pub dirty: Vec<Material>,
    pub deleted: Vec<Identifier>,
    pub ticket: CacheTicket<i32>,
}

/// Materials keyed by id
pub struct MaterialManager {
    cache: ContentCache<Material>,
}

impl MaterialManager {
    pub fn new() -> Self {
        Self {
            cache: ContentCache::new(),
        }
    }

    pub fn add(&mut self, material: Material) -> bool {
        self.cache.add(material)
    }

    pub fn touch(&mut self, id: i32) -> bool {
        self.cache.touch(&id)
    }

    pub fn erase(&mut self, id: i32) -> bool {
        self.cache.erase(&id)
    }

    pub fn erase_stale(&mut self) -> usize {
        self.cache.erase_stale()
    }

    pub fn get(&self, id: i32) -> Option<&Material> {
        self.cache.get(&id)
    }

    pub fn export(&self) -> MaterialExport {
        let export = self.cache.export();
        MaterialExport {
            dirty: export.dirty.into_iter().map(|(_, material)| material).collect(),
            deleted: export.deleted,
            ticket: export.ticket,
        }
    }

    pub fn get_deleted(&self) -> Vec<Identifier> {
        self.cache.get_deleted()
    }

    pub fn commit(&mut self, ticket: &CacheTicket<i32>) {
        self.cache.commit(ticket);
    }

    pub fn clear_dirty_flags(&mut self) {
        self.cache.clear_dirty_flags();
    }

    pub fn mark_dirty(&mut self, id: i32) -> bool {
        self.cache.mark_dirty(&id)
    }

    pub fn make_dirty_all(&mut self) {
        self.cache.make_dirty_all();
    }

    pub fn set_always_mark_dirty(&mut self, value: bool) {
        self.cache.set_always_mark_dirty(value);
    }

    pub fn all(&self) -> impl Iterator<Item = &Material> {
        self.cache.all()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}
