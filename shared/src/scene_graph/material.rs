use glam::{Mat4, Vec2, Vec4};

use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::{types::INVALID_ID, Identifier};

/// A texture slot of a material
#[derive(Debug, Clone, PartialEq)]
pub struct TextureRef {
    /// Texture asset id, or INVALID_ID for an empty slot
    pub id: i32,
    pub scale: Vec2,
    pub offset: Vec2,
}

impl TextureRef {
    pub fn new(id: i32) -> Self {
        Self {
            id,
            scale: Vec2::ONE,
            offset: Vec2::ZERO,
        }
    }
}

impl Serde for TextureRef {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.id.ser(writer);
        self.scale.ser(writer);
        self.offset.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            id: i32::de(reader)?,
            scale: Vec2::de(reader)?,
            offset: Vec2::de(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MaterialValue {
    Int(i32),
    Float(f32),
    Vector(Vec4),
    Matrix(Mat4),
    Texture(TextureRef),
}

impl Serde for MaterialValue {
    fn ser(&self, writer: &mut dyn BitWrite) {
        match self {
            MaterialValue::Int(value) => {
                0_u8.ser(writer);
                value.ser(writer);
            }
            MaterialValue::Float(value) => {
                1_u8.ser(writer);
                value.ser(writer);
            }
            MaterialValue::Vector(value) => {
                2_u8.ser(writer);
                value.ser(writer);
            }
            MaterialValue::Matrix(value) => {
                3_u8.ser(writer);
                value.ser(writer);
            }
            MaterialValue::Texture(value) => {
                4_u8.ser(writer);
                value.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(MaterialValue::Int(i32::de(reader)?)),
            1 => Ok(MaterialValue::Float(f32::de(reader)?)),
            2 => Ok(MaterialValue::Vector(Vec4::de(reader)?)),
            3 => Ok(MaterialValue::Matrix(Mat4::de(reader)?)),
            4 => Ok(MaterialValue::Texture(TextureRef::de(reader)?)),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "MaterialValue",
                tag: tag as u64,
            }),
        }
    }
}

/// A named shader parameter
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialProperty {
    pub name: String,
    pub value: MaterialValue,
}

impl Serde for MaterialProperty {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.name.ser(writer);
        self.value.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            name: String::de(reader)?,
            value: MaterialValue::de(reader)?,
        })
    }
}

/// A shader keyword toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialKeyword {
    pub name: String,
    pub value: bool,
}

impl Serde for MaterialKeyword {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.name.ser(writer);
        self.value.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            name: String::de(reader)?,
            value: bool::de(reader)?,
        })
    }
}

pub const COLOR_PROPERTY: &str = "_Color";
pub const COLOR_MAP_PROPERTY: &str = "_MainTex";
pub const NORMAL_MAP_PROPERTY: &str = "_BumpMap";

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: i32,
    pub name: String,
    /// Slot index within the owning mesh's material list
    pub index: i32,
    pub shader: String,
    pub properties: Vec<MaterialProperty>,
    pub keywords: Vec<MaterialKeyword>,
}

impl Material {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            index: 0,
            shader: String::new(),
            properties: Vec::new(),
            keywords: Vec::new(),
        }
    }

    pub fn identifier(&self) -> Identifier {
        Identifier::new(self.name.clone(), self.id)
    }

    pub fn property(&self, name: &str) -> Option<&MaterialValue> {
        self.properties
            .iter()
            .find(|property| property.name == name)
            .map(|property| &property.value)
    }

    /// Inserts or replaces a property
    pub fn set_property(&mut self, name: &str, value: MaterialValue) {
        match self.properties.iter_mut().find(|property| property.name == name) {
            Some(property) => property.value = value,
            None => self.properties.push(MaterialProperty {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn set_keyword(&mut self, name: &str, value: bool) {
        match self.keywords.iter_mut().find(|keyword| keyword.name == name) {
            Some(keyword) => keyword.value = value,
            None => self.keywords.push(MaterialKeyword {
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn set_color(&mut self, color: Vec4) {
        self.set_property(COLOR_PROPERTY, MaterialValue::Vector(color));
    }

    pub fn color(&self) -> Option<Vec4> {
        match self.property(COLOR_PROPERTY) {
            Some(MaterialValue::Vector(color)) => Some(*color),
            _ => None,
        }
    }

    /// Texture slots pointing at INVALID_ID are skipped
    pub fn set_color_map(&mut self, texture: TextureRef) {
        if texture.id != INVALID_ID {
            self.set_property(COLOR_MAP_PROPERTY, MaterialValue::Texture(texture));
        }
    }

    pub fn set_normal_map(&mut self, texture: TextureRef) {
        if texture.id != INVALID_ID {
            self.set_property(NORMAL_MAP_PROPERTY, MaterialValue::Texture(texture));
        }
    }

    pub(crate) fn ser_payload(&self, writer: &mut dyn BitWrite) {
        self.index.ser(writer);
        self.shader.ser(writer);
        self.properties.ser(writer);
        self.keywords.ser(writer);
    }

    pub(crate) fn de_payload(id: i32, name: String, reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            id,
            name,
            index: i32::de(reader)?,
            shader: String::de(reader)?,
            properties: Vec::de(reader)?,
            keywords: Vec::de(reader)?,
        })
    }
}
