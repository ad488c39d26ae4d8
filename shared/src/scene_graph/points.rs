use glam::{Quat, Vec3, Vec4};

use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::{entity::Transform, error::TopologyMismatch, mesh::lerp_buffer};

/// One time sample of a point cloud
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointsData {
    pub time: f32,
    pub points: Vec<Vec3>,
    pub rotations: Vec<Quat>,
    pub scales: Vec<Vec3>,
    pub colors: Vec<Vec4>,
    pub velocities: Vec<Vec3>,
    pub ids: Vec<i32>,
}

impl Serde for PointsData {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.time.ser(writer);
        self.points.ser(writer);
        self.rotations.ser(writer);
        self.scales.ser(writer);
        self.colors.ser(writer);
        self.velocities.ser(writer);
        self.ids.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            time: f32::de(reader)?,
            points: Vec::de(reader)?,
            rotations: Vec::de(reader)?,
            scales: Vec::de(reader)?,
            colors: Vec::de(reader)?,
            velocities: Vec::de(reader)?,
            ids: Vec::de(reader)?,
        })
    }
}

/// Point cloud / particle entity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Points {
    pub transform: Transform,
    pub data: Vec<PointsData>,
}

impl Points {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            transform: Transform::new(path),
            data: Vec::new(),
        }
    }

    pub fn point_count(&self) -> usize {
        self.data.iter().map(|data| data.points.len()).sum()
    }

    pub(crate) fn ser_payload(&self, writer: &mut dyn BitWrite) {
        self.data.ser(writer);
    }

    pub(crate) fn de_payload(transform: Transform, reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            transform,
            data: Vec::de(reader)?,
        })
    }

    pub fn lerp(a: &Points, b: &Points, t: f32) -> Result<Points, TopologyMismatch> {
        let same_layout = a.data.len() == b.data.len()
            && a.data
                .iter()
                .zip(&b.data)
                .all(|(x, y)| x.points.len() == y.points.len());
        if !same_layout {
            return Err(TopologyMismatch::VertexCountChanged {
                path: a.transform.path.clone(),
                before: a.point_count(),
                after: b.point_count(),
            });
        }

        let data = a
            .data
            .iter()
            .zip(&b.data)
            .map(|(x, y)| PointsData {
                time: x.time + (y.time - x.time) * t,
                points: lerp_buffer(&x.points, &y.points, |p, q| p.lerp(q, t)),
                rotations: lerp_buffer(&x.rotations, &y.rotations, |p, q| p.slerp(q, t)),
                scales: lerp_buffer(&x.scales, &y.scales, |p, q| p.lerp(q, t)),
                colors: lerp_buffer(&x.colors, &y.colors, |p, q| p.lerp(q, t)),
                velocities: lerp_buffer(&x.velocities, &y.velocities, |p, q| p.lerp(q, t)),
                ids: x.ids.clone(),
            })
            .collect();

        Ok(Points {
            transform: Transform::lerp(&a.transform, &b.transform, t),
            data,
        })
    }
}
