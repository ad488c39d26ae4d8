use glam::Vec4;

use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::entity::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LightType {
    Spot = 0,
    Directional = 1,
    Point = 2,
    Area = 3,
}

impl Serde for LightType {
    fn ser(&self, writer: &mut dyn BitWrite) {
        (*self as u8).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match u8::de(reader)? {
            0 => Ok(LightType::Spot),
            1 => Ok(LightType::Directional),
            2 => Ok(LightType::Point),
            3 => Ok(LightType::Area),
            tag => Err(SerdeErr::InvalidTag {
                type_name: "LightType",
                tag: tag as u64,
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub transform: Transform,
    pub light_type: LightType,
    pub color: Vec4,
    pub intensity: f32,
    pub range: f32,
    /// Cone angle in degrees, spot lights only
    pub spot_angle: f32,
}

impl Light {
    pub fn new(path: impl Into<String>, light_type: LightType) -> Self {
        Self {
            transform: Transform::new(path),
            light_type,
            ..Default::default()
        }
    }

    pub(crate) fn ser_payload(&self, writer: &mut dyn BitWrite) {
        self.light_type.ser(writer);
        self.color.ser(writer);
        self.intensity.ser(writer);
        self.range.ser(writer);
        self.spot_angle.ser(writer);
    }

    pub(crate) fn de_payload(transform: Transform, reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            transform,
            light_type: LightType::de(reader)?,
            color: Vec4::de(reader)?,
            intensity: f32::de(reader)?,
            range: f32::de(reader)?,
            spot_angle: f32::de(reader)?,
        })
    }

    pub fn lerp(a: &Light, b: &Light, t: f32) -> Light {
        let mix = |x: f32, y: f32| x + (y - x) * t;
        Light {
            transform: Transform::lerp(&a.transform, &b.transform, t),
            light_type: a.light_type,
            color: a.color.lerp(b.color, t),
            intensity: mix(a.intensity, b.intensity),
            range: mix(a.range, b.range),
            spot_angle: mix(a.spot_angle, b.spot_angle),
        }
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            light_type: LightType::Directional,
            color: Vec4::ONE,
            intensity: 1.0,
            range: 0.0,
            spot_angle: 30.0,
        }
    }
}
