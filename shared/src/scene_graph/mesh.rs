use bitflags::bitflags;
use glam::{Mat4, Vec2, Vec3, Vec4};

use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use super::{entity::Transform, error::TopologyMismatch};

bitflags! {
    /// Post-processing the receiver should apply to an incoming mesh
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MeshRefineFlags: u32 {
        const NO_REINDEXING = 1 << 0;
        const SPLIT = 1 << 1;
        const TRIANGULATE = 1 << 2;
        const OPTIMIZE_TOPOLOGY = 1 << 3;
        const FLIP_X = 1 << 4;
        const FLIP_YZ = 1 << 5;
        const FLIP_FACES = 1 << 6;
        const GEN_NORMALS = 1 << 7;
        const GEN_NORMALS_WITH_SMOOTH_ANGLE = 1 << 8;
        const FLIP_NORMALS = 1 << 9;
        const GEN_TANGENTS = 1 << 10;
        const APPLY_LOCAL2WORLD = 1 << 11;
        const APPLY_WORLD2LOCAL = 1 << 12;
        const BAKE_SKIN = 1 << 13;
        const BAKE_CLOTH = 1 << 14;
        const FLIP_U = 1 << 15;
        const FLIP_V = 1 << 16;
        const MIRROR_X = 1 << 17;
        const MIRROR_Y = 1 << 18;
        const MIRROR_Z = 1 << 19;
        const MAKE_DOUBLE_SIDED = 1 << 24;
        const QUADIFY = 1 << 25;
    }
}

impl Serde for MeshRefineFlags {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.bits().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(MeshRefineFlags::from_bits_retain(u32::de(reader)?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshRefineSettings {
    pub flags: MeshRefineFlags,
    pub scale_factor: f32,
    /// Degrees
    pub smooth_angle: f32,
}

impl Default for MeshRefineSettings {
    fn default() -> Self {
        Self {
            flags: MeshRefineFlags::empty(),
            scale_factor: 1.0,
            smooth_angle: 0.0,
        }
    }
}

impl Serde for MeshRefineSettings {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.flags.ser(writer);
        self.scale_factor.ser(writer);
        self.smooth_angle.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            flags: MeshRefineFlags::de(reader)?,
            scale_factor: f32::de(reader)?,
            smooth_angle: f32::de(reader)?,
        })
    }
}

/// A skinning bone, referenced by the path of its Transform entity
#[derive(Debug, Clone, PartialEq)]
pub struct BoneData {
    pub path: String,
    pub bindpose: Mat4,
    /// One weight per mesh vertex
    pub weights: Vec<f32>,
}

impl Serde for BoneData {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.path.ser(writer);
        self.bindpose.ser(writer);
        self.weights.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            path: String::de(reader)?,
            bindpose: Mat4::de(reader)?,
            weights: Vec::<f32>::de(reader)?,
        })
    }
}

/// One target shape of a blendshape, as deltas from the base mesh
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlendShapeFrameData {
    pub weight: f32,
    pub points: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec3>,
}

impl Serde for BlendShapeFrameData {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.weight.ser(writer);
        self.points.ser(writer);
        self.normals.ser(writer);
        self.tangents.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            weight: f32::de(reader)?,
            points: Vec::<Vec3>::de(reader)?,
            normals: Vec::<Vec3>::de(reader)?,
            tangents: Vec::<Vec3>::de(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BlendShapeData {
    pub name: String,
    pub weight: f32,
    pub frames: Vec<BlendShapeFrameData>,
}

impl Serde for BlendShapeData {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.name.ser(writer);
        self.weight.ser(writer);
        self.frames.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            name: String::de(reader)?,
            weight: f32::de(reader)?,
            frames: Vec::<BlendShapeFrameData>::de(reader)?,
        })
    }
}

/// Polygon mesh. Faces are described by `counts` (corners per face) and
/// `indices` (one vertex index per corner). Per-vertex attributes may also
/// be given per corner.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub transform: Transform,
    pub refine_settings: MeshRefineSettings,

    pub points: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tangents: Vec<Vec4>,
    pub uv0: Vec<Vec2>,
    pub uv1: Vec<Vec2>,
    pub colors: Vec<Vec4>,
    pub velocities: Vec<Vec3>,
    pub counts: Vec<i32>,
    pub indices: Vec<i32>,
    /// One material id per face
    pub material_ids: Vec<i32>,

    pub root_bone: Option<String>,
    pub bones: Vec<BoneData>,
    pub blendshapes: Vec<BlendShapeData>,
}

impl Mesh {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            transform: Transform::new(path),
            ..Default::default()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn face_count(&self) -> usize {
        self.counts.len()
    }

    pub fn has_geometry(&self) -> bool {
        !self.points.is_empty()
            || !self.indices.is_empty()
            || !self.bones.is_empty()
            || !self.blendshapes.is_empty()
    }

    /// Drops every geometry buffer, keeping the transform and refine settings
    pub fn strip_geometry(&mut self) {
        self.points.clear();
        self.normals.clear();
        self.tangents.clear();
        self.uv0.clear();
        self.uv1.clear();
        self.colors.clear();
        self.velocities.clear();
        self.counts.clear();
        self.indices.clear();
        self.material_ids.clear();
        self.root_bone = None;
        self.bones.clear();
        self.blendshapes.clear();
    }

    /// Checks the topology invariants the receiver relies on
    pub fn validate(&self) -> Result<(), TopologyMismatch> {
        let path = || self.transform.path.clone();
        let vertex_count = self.points.len();
        let index_count = self.indices.len();

        let counts_total: usize = self.counts.iter().map(|count| (*count).max(0) as usize).sum();
        if counts_total != index_count {
            return Err(TopologyMismatch::IndexCountMismatch {
                path: path(),
                counts_total,
                indices: index_count,
            });
        }

        if let Some(index) = self
            .indices
            .iter()
            .find(|index| **index < 0 || **index as usize >= vertex_count)
        {
            return Err(TopologyMismatch::IndexOutOfRange {
                path: path(),
                index: *index,
                vertex_count,
            });
        }

        // per-vertex or per-corner
        let attribute_lengths = [
            ("normals", self.normals.len()),
            ("tangents", self.tangents.len()),
            ("uv0", self.uv0.len()),
            ("uv1", self.uv1.len()),
            ("colors", self.colors.len()),
            ("velocities", self.velocities.len()),
        ];
        for (attribute, actual) in attribute_lengths {
            if actual != 0 && actual != vertex_count && actual != index_count {
                return Err(TopologyMismatch::AttributeLengthMismatch {
                    path: path(),
                    attribute,
                    expected: vertex_count,
                    actual,
                });
            }
        }

        if !self.material_ids.is_empty() && self.material_ids.len() != self.counts.len() {
            return Err(TopologyMismatch::AttributeLengthMismatch {
                path: path(),
                attribute: "material_ids",
                expected: self.counts.len(),
                actual: self.material_ids.len(),
            });
        }

        for bone in &self.bones {
            if bone.weights.len() != vertex_count {
                return Err(TopologyMismatch::AttributeLengthMismatch {
                    path: path(),
                    attribute: "bone weights",
                    expected: vertex_count,
                    actual: bone.weights.len(),
                });
            }
        }

        for frame in self.blendshapes.iter().flat_map(|shape| &shape.frames) {
            if !frame.points.is_empty() && frame.points.len() != vertex_count {
                return Err(TopologyMismatch::AttributeLengthMismatch {
                    path: path(),
                    attribute: "blendshape points",
                    expected: vertex_count,
                    actual: frame.points.len(),
                });
            }
        }

        Ok(())
    }

    pub(crate) fn ser_payload(&self, writer: &mut dyn BitWrite) {
        self.refine_settings.ser(writer);
        self.points.ser(writer);
        self.normals.ser(writer);
        self.tangents.ser(writer);
        self.uv0.ser(writer);
        self.uv1.ser(writer);
        self.colors.ser(writer);
        self.velocities.ser(writer);
        self.counts.ser(writer);
        self.indices.ser(writer);
        self.material_ids.ser(writer);
        self.root_bone.ser(writer);
        self.bones.ser(writer);
        self.blendshapes.ser(writer);
    }

    pub(crate) fn de_payload(transform: Transform, reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            transform,
            refine_settings: MeshRefineSettings::de(reader)?,
            points: Vec::de(reader)?,
            normals: Vec::de(reader)?,
            tangents: Vec::de(reader)?,
            uv0: Vec::de(reader)?,
            uv1: Vec::de(reader)?,
            colors: Vec::de(reader)?,
            velocities: Vec::de(reader)?,
            counts: Vec::de(reader)?,
            indices: Vec::de(reader)?,
            material_ids: Vec::de(reader)?,
            root_bone: Option::de(reader)?,
            bones: Vec::de(reader)?,
            blendshapes: Vec::de(reader)?,
        })
    }

    /// Interpolates vertex data between two samples with identical topology
    pub fn lerp(a: &Mesh, b: &Mesh, t: f32) -> Result<Mesh, TopologyMismatch> {
        if a.points.len() != b.points.len() {
            return Err(TopologyMismatch::VertexCountChanged {
                path: a.transform.path.clone(),
                before: a.points.len(),
                after: b.points.len(),
            });
        }

        let mut output = a.clone();
        output.transform = Transform::lerp(&a.transform, &b.transform, t);
        output.points = lerp_buffer(&a.points, &b.points, |x, y| x.lerp(y, t));
        output.normals = lerp_buffer(&a.normals, &b.normals, |x, y| x.lerp(y, t).normalize_or_zero());
        output.uv0 = lerp_buffer(&a.uv0, &b.uv0, |x, y| x.lerp(y, t));
        output.uv1 = lerp_buffer(&a.uv1, &b.uv1, |x, y| x.lerp(y, t));
        output.colors = lerp_buffer(&a.colors, &b.colors, |x, y| x.lerp(y, t));
        output.velocities = lerp_buffer(&a.velocities, &b.velocities, |x, y| x.lerp(y, t));
        Ok(output)
    }
}

/// Element-wise interpolation. Buffers of differing length keep the first.
pub(crate) fn lerp_buffer<T: Copy>(a: &[T], b: &[T], mix: impl Fn(T, T) -> T) -> Vec<T> {
    if a.len() != b.len() {
        return a.to_vec();
    }
    a.iter().zip(b).map(|(x, y)| mix(*x, *y)).collect()
}
