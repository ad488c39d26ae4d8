use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::entity::Transform;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub transform: Transform,
    pub is_ortho: bool,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    /// Physical camera parameters, in millimeters. Zero when unused.
    pub vertical_aperture: f32,
    pub horizontal_aperture: f32,
    pub focal_length: f32,
    pub focus_distance: f32,
}

impl Camera {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            transform: Transform::new(path),
            ..Default::default()
        }
    }

    pub(crate) fn ser_payload(&self, writer: &mut dyn BitWrite) {
        self.is_ortho.ser(writer);
        self.fov.ser(writer);
        self.near_plane.ser(writer);
        self.far_plane.ser(writer);
        self.vertical_aperture.ser(writer);
        self.horizontal_aperture.ser(writer);
        self.focal_length.ser(writer);
        self.focus_distance.ser(writer);
    }

    pub(crate) fn de_payload(transform: Transform, reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            transform,
            is_ortho: bool::de(reader)?,
            fov: f32::de(reader)?,
            near_plane: f32::de(reader)?,
            far_plane: f32::de(reader)?,
            vertical_aperture: f32::de(reader)?,
            horizontal_aperture: f32::de(reader)?,
            focal_length: f32::de(reader)?,
            focus_distance: f32::de(reader)?,
        })
    }

    pub fn lerp(a: &Camera, b: &Camera, t: f32) -> Camera {
        let mix = |x: f32, y: f32| x + (y - x) * t;
        Camera {
            transform: Transform::lerp(&a.transform, &b.transform, t),
            is_ortho: a.is_ortho,
            fov: mix(a.fov, b.fov),
            near_plane: mix(a.near_plane, b.near_plane),
            far_plane: mix(a.far_plane, b.far_plane),
            vertical_aperture: mix(a.vertical_aperture, b.vertical_aperture),
            horizontal_aperture: mix(a.horizontal_aperture, b.horizontal_aperture),
            focal_length: mix(a.focal_length, b.focal_length),
            focus_distance: mix(a.focus_distance, b.focus_distance),
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            is_ortho: false,
            fov: 30.0,
            near_plane: 0.3,
            far_plane: 1000.0,
            vertical_aperture: 0.0,
            horizontal_aperture: 0.0,
            focal_length: 0.0,
            focus_distance: 0.0,
        }
    }
}
