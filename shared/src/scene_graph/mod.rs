use scenesync_serde::{HashWriter, Serde};

pub mod animation;
pub mod asset;
pub mod camera;
pub mod constraint;
pub mod entity;
pub mod error;
pub mod light;
pub mod material;
pub mod mesh;
pub mod points;
pub mod scene;
pub mod texture;

/// Hash of the bits `value` would put on the wire
pub fn content_hash<T: Serde>(value: &T) -> u64 {
    let mut hasher = HashWriter::new();
    value.ser(&mut hasher);
    hasher.finish()
}
