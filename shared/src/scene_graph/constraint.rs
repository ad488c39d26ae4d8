use glam::{Quat, Vec3};

use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

/// Offsets of one source of a parent constraint
#[derive(Debug, Clone, PartialEq)]
pub struct ParentSource {
    pub position_offset: Vec3,
    pub rotation_offset: Quat,
}

impl Serde for ParentSource {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.position_offset.ser(writer);
        self.rotation_offset.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            position_offset: Vec3::de(reader)?,
            rotation_offset: Quat::de(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    Aim,
    Parent { source_data: Vec<ParentSource> },
    Position,
    Rotation,
    Scale,
}

impl ConstraintKind {
    fn tag(&self) -> u8 {
        match self {
            ConstraintKind::Aim => 1,
            ConstraintKind::Parent { .. } => 2,
            ConstraintKind::Position => 3,
            ConstraintKind::Rotation => 4,
            ConstraintKind::Scale => 5,
        }
    }
}

/// Descriptive constraint metadata. Not evaluated on either side of the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Path of the constrained entity
    pub path: String,
    pub source_paths: Vec<String>,
    pub kind: ConstraintKind,
}

impl Constraint {
    pub fn new(path: impl Into<String>, kind: ConstraintKind) -> Self {
        Self {
            path: path.into(),
            source_paths: Vec::new(),
            kind,
        }
    }
}

impl Serde for Constraint {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.kind.tag().ser(writer);
        self.path.ser(writer);
        self.source_paths.ser(writer);
        if let ConstraintKind::Parent { source_data } = &self.kind {
            source_data.ser(writer);
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let tag = u8::de(reader)?;
        let path = String::de(reader)?;
        let source_paths = Vec::de(reader)?;
        let kind = match tag {
            1 => ConstraintKind::Aim,
            2 => ConstraintKind::Parent {
                source_data: Vec::de(reader)?,
            },
            3 => ConstraintKind::Position,
            4 => ConstraintKind::Rotation,
            5 => ConstraintKind::Scale,
            _ => {
                return Err(SerdeErr::InvalidTag {
                    type_name: "ConstraintKind",
                    tag: tag as u64,
                })
            }
        };
        Ok(Self {
            path,
            source_paths,
            kind,
        })
    }
}
