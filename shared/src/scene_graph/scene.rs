use std::collections::HashMap;

use log::warn;

use scenesync_serde::{BitReader, BitWrite, BitWriter, Serde, SerdeErr};

use super::{
    animation::AnimationClip,
    asset::Asset,
    constraint::Constraint,
    content_hash,
    entity::Entity,
    error::{CorruptReason, SceneError},
    material::Material,
    texture::Texture,
};

/// Axis convention of the sending host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Handedness {
    #[default]
    Left = 0,
    Right = 1,
    LeftZUp = 2,
    RightZUp = 3,
}

impl Serde for Handedness {
    fn ser(&self, writer: &mut dyn BitWrite) {
        (*self as u8).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(Handedness::Left),
            1 => Ok(Handedness::Right),
            2 => Ok(Handedness::LeftZUp),
            3 => Ok(Handedness::RightZUp),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "Handedness",
                tag: tag as u64,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneSettings {
    pub name: String,
    pub handedness: Handedness,
    pub scale_factor: f32,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            handedness: Handedness::Left,
            scale_factor: 1.0,
        }
    }
}

impl Serde for SceneSettings {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.name.ser(writer);
        self.handedness.ser(writer);
        self.scale_factor.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            name: String::de(reader)?,
            handedness: Handedness::de(reader)?,
            scale_factor: f32::de(reader)?,
        })
    }
}

/// One transmission unit: settings plus any mix of assets, entities and
/// constraints.
///
/// On the wire the payload is preceded by a validation hash: the wrapping sum
/// of the content hashes of every item. Summing makes the hash independent of
/// item order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub settings: SceneSettings,
    pub assets: Vec<Asset>,
    pub entities: Vec<Entity>,
    pub constraints: Vec<Constraint>,
}

impl Scene {
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty() && self.entities.is_empty() && self.constraints.is_empty()
    }

    pub fn hash(&self) -> u64 {
        let mut total = content_hash(&self.settings);
        for asset in &self.assets {
            total = total.wrapping_add(content_hash(asset));
        }
        for entity in &self.entities {
            total = total.wrapping_add(content_hash(entity));
        }
        for constraint in &self.constraints {
            total = total.wrapping_add(content_hash(constraint));
        }
        total
    }

    pub fn ser(&self, writer: &mut dyn BitWrite) {
        self.hash().ser(writer);
        self.settings.ser(writer);
        self.assets.ser(writer);
        self.entities.ser(writer);
        self.constraints.ser(writer);
    }

    /// Reads a scene and validates it against its leading hash
    pub fn de(reader: &mut BitReader) -> Result<Self, SceneError> {
        let expected = u64::de(reader)?;

        let scene = Self::de_payload(reader).map_err(|err| SceneError::CorruptScene {
            expected,
            reason: CorruptReason::Unreadable(err),
        })?;

        let actual = scene.hash();
        if actual != expected {
            return Err(SceneError::CorruptScene {
                expected,
                reason: CorruptReason::HashMismatch(actual),
            });
        }
        Ok(scene)
    }

    fn de_payload(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            settings: SceneSettings::de(reader)?,
            assets: Vec::de(reader)?,
            entities: Vec::de(reader)?,
            constraints: Vec::de(reader)?,
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = BitWriter::new();
        self.ser(&mut writer);
        writer.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SceneError> {
        let mut reader = BitReader::new(bytes);
        Self::de(&mut reader)
    }

    pub fn find_entity(&self, path: &str) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.path() == path)
    }

    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.assets.iter().filter_map(|asset| match asset {
            Asset::Material(material) => Some(material),
            _ => None,
        })
    }

    pub fn textures(&self) -> impl Iterator<Item = &Texture> {
        self.assets.iter().filter_map(|asset| match asset {
            Asset::Texture(texture) => Some(texture),
            _ => None,
        })
    }

    pub fn animation_clips(&self) -> impl Iterator<Item = &AnimationClip> {
        self.assets.iter().filter_map(|asset| match asset {
            Asset::Animation(clip) => Some(clip),
            _ => None,
        })
    }

    /// Interpolates entities matched by path. Entities missing from `b`, or
    /// whose topology differs, are taken from `a` unchanged.
    pub fn lerp(a: &Scene, b: &Scene, t: f32) -> Scene {
        let others: HashMap<&str, &Entity> = b
            .entities
            .iter()
            .map(|entity| (entity.path(), entity))
            .collect();

        let entities = a
            .entities
            .iter()
            .map(|entity| match others.get(entity.path()) {
                Some(other) => Entity::lerp(entity, other, t).unwrap_or_else(|err| {
                    warn!("Scene::lerp: {}", err);
                    entity.clone()
                }),
                None => entity.clone(),
            })
            .collect();

        Scene {
            settings: a.settings.clone(),
            assets: a.assets.clone(),
            entities,
            constraints: a.constraints.clone(),
        }
    }
}
