use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::Identifier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TextureType {
    #[default]
    Default = 0,
    NormalMap = 1,
}

impl Serde for TextureType {
    fn ser(&self, writer: &mut dyn BitWrite) {
        (*self as u8).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(TextureType::Default),
            1 => Ok(TextureType::NormalMap),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "TextureType",
                tag: tag as u64,
            }),
        }
    }
}

/// Pixel layout of `Texture::data`. `RawFile` means the bytes are an
/// encoded image file (png, exr, ...) the receiver must decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TextureFormat {
    #[default]
    Unknown = 0,
    Ru8 = 1,
    RGu8 = 2,
    RGBu8 = 3,
    RGBAu8 = 4,
    Rf32 = 5,
    RGf32 = 6,
    RGBf32 = 7,
    RGBAf32 = 8,
    RawFile = 16,
}

impl TextureFormat {
    /// Bytes per pixel, or None for `Unknown` and `RawFile`
    pub fn pixel_size(&self) -> Option<usize> {
        match self {
            TextureFormat::Unknown | TextureFormat::RawFile => None,
            TextureFormat::Ru8 => Some(1),
            TextureFormat::RGu8 => Some(2),
            TextureFormat::RGBu8 => Some(3),
            TextureFormat::RGBAu8 | TextureFormat::Rf32 => Some(4),
            TextureFormat::RGf32 => Some(8),
            TextureFormat::RGBf32 => Some(12),
            TextureFormat::RGBAf32 => Some(16),
        }
    }
}

impl Serde for TextureFormat {
    fn ser(&self, writer: &mut dyn BitWrite) {
        (*self as u8).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(TextureFormat::Unknown),
            1 => Ok(TextureFormat::Ru8),
            2 => Ok(TextureFormat::RGu8),
            3 => Ok(TextureFormat::RGBu8),
            4 => Ok(TextureFormat::RGBAu8),
            5 => Ok(TextureFormat::Rf32),
            6 => Ok(TextureFormat::RGf32),
            7 => Ok(TextureFormat::RGBf32),
            8 => Ok(TextureFormat::RGBAf32),
            16 => Ok(TextureFormat::RawFile),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "TextureFormat",
                tag: tag as u64,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Texture {
    pub id: i32,
    pub name: String,
    pub texture_type: TextureType,
    pub format: TextureFormat,
    pub width: i32,
    pub height: i32,
    pub data: Vec<u8>,
}

impl Texture {
    pub fn identifier(&self) -> Identifier {
        Identifier::new(self.name.clone(), self.id)
    }

    pub(crate) fn ser_payload(&self, writer: &mut dyn BitWrite) {
        self.texture_type.ser(writer);
        self.format.ser(writer);
        self.width.ser(writer);
        self.height.ser(writer);
        self.data.ser(writer);
    }

    pub(crate) fn de_payload(id: i32, name: String, reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            id,
            name,
            texture_type: TextureType::de(reader)?,
            format: TextureFormat::de(reader)?,
            width: i32::de(reader)?,
            height: i32::de(reader)?,
            data: Vec::de(reader)?,
        })
    }
}
