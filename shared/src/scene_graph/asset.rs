use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{types::INVALID_ID, Identifier};

use super::{animation::AnimationClip, material::Material, texture::Texture};

/// An arbitrary file passed through to the receiver untouched
#[derive(Debug, Clone, PartialEq)]
pub struct FileAsset {
    pub id: i32,
    pub name: String,
    pub data: Vec<u8>,
}

impl FileAsset {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: INVALID_ID,
            name: name.into(),
            data,
        }
    }

    pub fn identifier(&self) -> Identifier {
        Identifier::new(self.name.clone(), self.id)
    }
}

/// Wire discriminant of an [`Asset`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AssetType {
    File = 1,
    Animation = 2,
    Texture = 3,
    Material = 4,
}

/// A scene-scoped resource, not tied to a position in the hierarchy.
/// Serialized as type tag, then id and name, then the variant's fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Asset {
    File(FileAsset),
    Animation(AnimationClip),
    Texture(Texture),
    Material(Material),
}

impl Asset {
    pub fn asset_type(&self) -> AssetType {
        match self {
            Asset::File(_) => AssetType::File,
            Asset::Animation(_) => AssetType::Animation,
            Asset::Texture(_) => AssetType::Texture,
            Asset::Material(_) => AssetType::Material,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Asset::File(asset) => asset.id,
            Asset::Animation(asset) => asset.id,
            Asset::Texture(asset) => asset.id,
            Asset::Material(asset) => asset.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Asset::File(asset) => &asset.name,
            Asset::Animation(asset) => &asset.name,
            Asset::Texture(asset) => &asset.name,
            Asset::Material(asset) => &asset.name,
        }
    }

    pub fn identifier(&self) -> Identifier {
        Identifier::new(self.name(), self.id())
    }
}

impl Serde for Asset {
    fn ser(&self, writer: &mut dyn BitWrite) {
        (self.asset_type() as u8).ser(writer);
        self.id().ser(writer);
        self.name().to_string().ser(writer);
        match self {
            Asset::File(asset) => asset.data.ser(writer),
            Asset::Animation(asset) => asset.ser_payload(writer),
            Asset::Texture(asset) => asset.ser_payload(writer),
            Asset::Material(asset) => asset.ser_payload(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let tag = u8::de(reader)?;
        let id = i32::de(reader)?;
        let name = String::de(reader)?;
        match tag {
            1 => Ok(Asset::File(FileAsset {
                id,
                name,
                data: Vec::de(reader)?,
            })),
            2 => Ok(Asset::Animation(AnimationClip::de_payload(id, name, reader)?)),
            3 => Ok(Asset::Texture(Texture::de_payload(id, name, reader)?)),
            4 => Ok(Asset::Material(Material::de_payload(id, name, reader)?)),
            _ => Err(SerdeErr::InvalidTag {
                type_name: "AssetType",
                tag: tag as u64,
            }),
        }
    }
}

impl From<FileAsset> for Asset {
    fn from(asset: FileAsset) -> Self {
        Asset::File(asset)
    }
}

impl From<AnimationClip> for Asset {
    fn from(asset: AnimationClip) -> Self {
        Asset::Animation(asset)
    }
}

impl From<Texture> for Asset {
    fn from(asset: Texture) -> Self {
        Asset::Texture(asset)
    }
}

impl From<Material> for Asset {
    fn from(asset: Material) -> Self {
        Asset::Material(asset)
    }
}
