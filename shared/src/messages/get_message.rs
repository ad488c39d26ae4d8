use bitflags::bitflags;

use scenesync_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::scene_graph::{mesh::MeshRefineSettings, scene::SceneSettings};

bitflags! {
    /// Fields a receiver asks the host to send back
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct GetFlags: u32 {
        const TRANSFORM = 1 << 0;
        const POINTS = 1 << 1;
        const NORMALS = 1 << 2;
        const TANGENTS = 1 << 3;
        const UV0 = 1 << 4;
        const UV1 = 1 << 5;
        const COLORS = 1 << 6;
        const INDICES = 1 << 7;
        const MATERIAL_IDS = 1 << 8;
        const BONES = 1 << 9;
        const BLENDSHAPES = 1 << 10;
        const APPLY_CULLING = 1 << 11;
    }
}

impl Serde for GetFlags {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.bits().ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(GetFlags::from_bits_retain(u32::de(reader)?))
    }
}

/// Pull request from a receiver. Only encoded and decoded here; answering
/// it is up to the host adapter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GetMessage {
    pub flags: GetFlags,
    pub scene_settings: SceneSettings,
    pub refine_settings: MeshRefineSettings,
}

impl Serde for GetMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.flags.ser(writer);
        self.scene_settings.ser(writer);
        self.refine_settings.ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            flags: GetFlags::de(reader)?,
            scene_settings: SceneSettings::de(reader)?,
            refine_settings: MeshRefineSettings::de(reader)?,
        })
    }
}
