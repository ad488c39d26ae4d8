use std::{collections::HashMap, fs, path::Path, time::SystemTime};

use log::{debug, warn};

use scenesync_serde::HashWriter;

use crate::{
    id_registry::IdRegistry,
    scene_graph::texture::{Texture, TextureFormat, TextureType},
    types::INVALID_ID,
    Identifier,
};

use super::content_cache::{CacheTicket, Cached, ContentCache, Fingerprint};

impl Cached for Texture {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn identifier(&self) -> Identifier {
        Texture::identifier(self)
    }

    fn fingerprint(&self) -> Fingerprint {
        let mut hasher = HashWriter::new();
        self.ser_payload(&mut hasher);
        Fingerprint {
            transform: 0,
            payload: hasher.finish(),
        }
    }
}

pub struct TextureExport {
    pub dirty: Vec<Texture>,
    pub deleted: Vec<Identifier>,
    pub ticket: CacheTicket<String>,
}

/// Textures keyed by name. Ids come from a name registry so a texture
/// keeps its id across cycles.
pub struct TextureManager {
    cache: ContentCache<Texture>,
    ids: IdRegistry<String>,
    file_stamps: HashMap<String, (SystemTime, TextureType)>,
}

impl TextureManager {
    pub fn new() -> Self {
        Self {
            cache: ContentCache::new(),
            ids: IdRegistry::new(),
            file_stamps: HashMap::new(),
        }
    }

    /// Adds or replaces a texture by name, assigning its id
    pub fn add_texture(&mut self, mut texture: Texture) -> i32 {
        let id = self.ids.get_id(&texture.name);
        if id == INVALID_ID {
            return INVALID_ID;
        }
        texture.id = id;
        self.cache.add(texture);
        id
    }

    /// Adds decoded pixel data
    pub fn add_image(
        &mut self,
        name: &str,
        width: i32,
        height: i32,
        format: TextureFormat,
        data: Vec<u8>,
    ) -> i32 {
        self.add_texture(Texture {
            id: INVALID_ID,
            name: name.to_string(),
            texture_type: TextureType::Default,
            format,
            width,
            height,
            data,
        })
    }

    /// Adds an image file by path. The file is only re-read when its
    /// modification time changes. Returns INVALID_ID if it can't be read.
    pub fn add_file(&mut self, path: &Path, texture_type: TextureType) -> i32 {
        let name = path.to_string_lossy().into_owned();
        let modified = match fs::metadata(path).and_then(|metadata| metadata.modified()) {
            Ok(modified) => modified,
            Err(err) => {
                debug!("TextureManager: skipping {}: {}", name, err);
                return INVALID_ID;
            }
        };

        if self.file_stamps.get(&name) == Some(&(modified, texture_type)) && self.cache.touch(&name) {
            return self.ids.get_id(&name);
        }

        let data = match fs::read(path) {
            Ok(data) => data,
            Err(err) => {
                warn!("TextureManager: failed to read {}: {}", name, err);
                return INVALID_ID;
            }
        };

        self.file_stamps.insert(name.clone(), (modified, texture_type));
        self.add_texture(Texture {
            id: INVALID_ID,
            name,
            texture_type,
            format: TextureFormat::RawFile,
            width: 0,
            height: 0,
            data,
        })
    }

    pub fn touch(&mut self, name: &str) -> bool {
        let name = name.to_string();
        if self.cache.touch(&name) {
            self.ids.get_id(&name);
            true
        } else {
            false
        }
    }

    pub fn erase_stale(&mut self) -> usize {
        let removed = self.cache.erase_stale();
        self.ids.erase_stale_records();
        let cache = &self.cache;
        self.file_stamps.retain(|name, _| cache.get(name).is_some());
        removed
    }

    pub fn get(&self, name: &str) -> Option<&Texture> {
        self.cache.get(&name.to_string())
    }

    pub fn export(&self) -> TextureExport {
        let export = self.cache.export();
        TextureExport {
            dirty: export.dirty.into_iter().map(|(_, texture)| texture).collect(),
            deleted: export.deleted,
            ticket: export.ticket,
        }
    }

    pub fn commit(&mut self, ticket: &CacheTicket<String>) {
        self.cache.commit(ticket);
    }

    pub fn clear_dirty_flags(&mut self) {
        self.cache.clear_dirty_flags();
    }

    pub fn make_dirty_all(&mut self) {
        self.cache.make_dirty_all();
    }

    pub fn set_always_mark_dirty(&mut self, value: bool) {
        self.cache.set_always_mark_dirty(value);
    }

    pub fn all(&self) -> impl Iterator<Item = &Texture> {
        self.cache.all()
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

impl Default for TextureManager {
    fn default() -> Self {
        Self::new()
    }
}
