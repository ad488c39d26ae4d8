pub mod content_cache;
pub mod entity_manager;
pub mod material_manager;
pub mod texture_manager;
