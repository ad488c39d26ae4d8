use glam::{Quat, Vec3};

use scenesync_serde::{BitReader, BitWrite, HashWriter, Serde, SerdeErr};

use crate::{types::INVALID_ID, Identifier};

use super::{
    camera::Camera, error::TopologyMismatch, light::Light, mesh::Mesh, points::Points,
};

/// Base node of the scene graph. Every entity variant starts with one.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub id: i32,
    /// `/`-delimited hierarchical path, unique within one scene snapshot
    pub path: String,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub index: i32,
    pub visible: bool,
    pub visible_hierarchy: bool,
    /// Path of the entity whose geometry this one instances. A reference
    /// entity never carries geometry of its own.
    pub reference: Option<String>,
    /// Export ordering hint, not sent over the wire
    pub order: i32,
}

impl Transform {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Leaf name of the path
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    pub fn parent_path(&self) -> &str {
        match self.path.rfind('/') {
            Some(index) => &self.path[..index],
            None => "",
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_path().is_empty()
    }

    pub fn identifier(&self) -> Identifier {
        Identifier::new(self.path.clone(), self.id)
    }

    pub fn lerp(a: &Transform, b: &Transform, t: f32) -> Transform {
        Transform {
            position: a.position.lerp(b.position, t),
            rotation: a.rotation.slerp(b.rotation, t),
            scale: a.scale.lerp(b.scale, t),
            ..a.clone()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            id: INVALID_ID,
            path: String::new(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            index: 0,
            visible: true,
            visible_hierarchy: true,
            reference: None,
            order: 0,
        }
    }
}

impl Serde for Transform {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.id.ser(writer);
        self.path.ser(writer);
        self.position.ser(writer);
        self.rotation.ser(writer);
        self.scale.ser(writer);
        self.index.ser(writer);
        self.visible.ser(writer);
        self.visible_hierarchy.ser(writer);
        self.reference.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            id: i32::de(reader)?,
            path: String::de(reader)?,
            position: Vec3::de(reader)?,
            rotation: Quat::de(reader)?,
            scale: Vec3::de(reader)?,
            index: i32::de(reader)?,
            visible: bool::de(reader)?,
            visible_hierarchy: bool::de(reader)?,
            reference: Option::<String>::de(reader)?,
            order: 0,
        })
    }
}

/// Wire discriminant of an [`Entity`], written before any entity field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityKind {
    Transform = 1,
    Camera = 2,
    Light = 3,
    Mesh = 4,
    Points = 5,
}

impl EntityKind {
    fn from_tag(tag: u8) -> Result<Self, SerdeErr> {
        match tag {
            1 => Ok(EntityKind::Transform),
            2 => Ok(EntityKind::Camera),
            3 => Ok(EntityKind::Light),
            4 => Ok(EntityKind::Mesh),
            5 => Ok(EntityKind::Points),
            _ => Err(SerdeErr::InvalidTag {
                type_name: "EntityKind",
                tag: tag as u64,
            }),
        }
    }
}

/// A scene-graph node. Variants share a [`Transform`] base which is always
/// serialized before the variant's own fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Transform(Transform),
    Camera(Camera),
    Light(Light),
    Mesh(Mesh),
    Points(Points),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Transform(_) => EntityKind::Transform,
            Entity::Camera(_) => EntityKind::Camera,
            Entity::Light(_) => EntityKind::Light,
            Entity::Mesh(_) => EntityKind::Mesh,
            Entity::Points(_) => EntityKind::Points,
        }
    }

    pub fn transform(&self) -> &Transform {
        match self {
            Entity::Transform(transform) => transform,
            Entity::Camera(camera) => &camera.transform,
            Entity::Light(light) => &light.transform,
            Entity::Mesh(mesh) => &mesh.transform,
            Entity::Points(points) => &points.transform,
        }
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        match self {
            Entity::Transform(transform) => transform,
            Entity::Camera(camera) => &mut camera.transform,
            Entity::Light(light) => &mut light.transform,
            Entity::Mesh(mesh) => &mut mesh.transform,
            Entity::Points(points) => &mut points.transform,
        }
    }

    pub fn id(&self) -> i32 {
        self.transform().id
    }

    pub fn path(&self) -> &str {
        &self.transform().path
    }

    pub fn identifier(&self) -> Identifier {
        self.transform().identifier()
    }

    /// Mesh and Points carry per-frame geometry and are exported one per message
    pub fn is_geometry(&self) -> bool {
        matches!(self, Entity::Mesh(_) | Entity::Points(_))
    }

    /// A plain Transform copy, used when only the transform of a geometry
    /// entity changed
    pub fn transform_only(&self) -> Entity {
        Entity::Transform(self.transform().clone())
    }

    /// Fingerprint of the Transform base
    pub fn transform_hash(&self) -> u64 {
        let mut hasher = HashWriter::new();
        self.transform().ser(&mut hasher);
        hasher.finish()
    }

    /// Fingerprint of everything but the Transform base
    pub fn payload_hash(&self) -> u64 {
        let mut hasher = HashWriter::new();
        (self.kind() as u8).ser(&mut hasher);
        self.ser_payload(&mut hasher);
        hasher.finish()
    }

    fn ser_payload(&self, writer: &mut dyn BitWrite) {
        match self {
            Entity::Transform(_) => {}
            Entity::Camera(camera) => camera.ser_payload(writer),
            Entity::Light(light) => light.ser_payload(writer),
            Entity::Mesh(mesh) => mesh.ser_payload(writer),
            Entity::Points(points) => points.ser_payload(writer),
        }
    }

    /// Interpolates two samples of the same entity. Fails when the samples
    /// differ in kind or in vertex layout.
    pub fn lerp(a: &Entity, b: &Entity, t: f32) -> Result<Entity, TopologyMismatch> {
        match (a, b) {
            (Entity::Transform(a), Entity::Transform(b)) => {
                Ok(Entity::Transform(Transform::lerp(a, b, t)))
            }
            (Entity::Camera(a), Entity::Camera(b)) => Ok(Entity::Camera(Camera::lerp(a, b, t))),
            (Entity::Light(a), Entity::Light(b)) => Ok(Entity::Light(Light::lerp(a, b, t))),
            (Entity::Mesh(a), Entity::Mesh(b)) => Ok(Entity::Mesh(Mesh::lerp(a, b, t)?)),
            (Entity::Points(a), Entity::Points(b)) => Ok(Entity::Points(Points::lerp(a, b, t)?)),
            _ => Err(TopologyMismatch::KindChanged {
                path: a.path().to_string(),
            }),
        }
    }
}

impl Serde for Entity {
    fn ser(&self, writer: &mut dyn BitWrite) {
        (self.kind() as u8).ser(writer);
        self.transform().ser(writer);
        self.ser_payload(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let kind = EntityKind::from_tag(u8::de(reader)?)?;
        let transform = Transform::de(reader)?;
        Ok(match kind {
            EntityKind::Transform => Entity::Transform(transform),
            EntityKind::Camera => Entity::Camera(Camera::de_payload(transform, reader)?),
            EntityKind::Light => Entity::Light(Light::de_payload(transform, reader)?),
            EntityKind::Mesh => Entity::Mesh(Mesh::de_payload(transform, reader)?),
            EntityKind::Points => Entity::Points(Points::de_payload(transform, reader)?),
        })
    }
}

impl From<Transform> for Entity {
    fn from(transform: Transform) -> Self {
        Entity::Transform(transform)
    }
}

impl From<Camera> for Entity {
    fn from(camera: Camera) -> Self {
        Entity::Camera(camera)
    }
}

impl From<Light> for Entity {
    fn from(light: Light) -> Self {
        Entity::Light(light)
    }
}

impl From<Mesh> for Entity {
    fn from(mesh: Mesh) -> Self {
        Entity::Mesh(mesh)
    }
}

impl From<Points> for Entity {
    fn from(points: Points) -> Self {
        Entity::Points(points)
    }
}
