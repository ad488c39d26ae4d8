use scenesync_shared::SceneSettings;

/// Which objects a sync cycle walks
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncScope {
    /// Everything. Objects not walked are deleted on the receiver.
    All,
    /// Only objects the host reported as changed
    Updated,
    /// Only the host's current selection
    Selected,
}

impl SyncScope {
    /// Only a full walk proves that an unseen object is gone
    pub fn sweeps_stale(&self) -> bool {
        matches!(self, SyncScope::All)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnimationSettings {
    /// Seconds between sampled keyframes
    pub sample_interval: f32,
    /// Multiplier applied to every keyframe time before export
    pub time_scale: f32,
    /// Drop trailing redundant keyframes from every curve
    pub keyframe_reduction: bool,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            sample_interval: 1.0 / 30.0,
            time_scale: 1.0,
            keyframe_reduction: true,
        }
    }
}

/// Per-category toggles, applied when objects are added
#[derive(Clone, Debug, PartialEq)]
pub struct SyncSettings {
    pub scene: SceneSettings,
    pub sync_meshes: bool,
    pub sync_normals: bool,
    pub sync_uvs: bool,
    pub sync_colors: bool,
    pub sync_bones: bool,
    pub sync_blendshapes: bool,
    pub sync_cameras: bool,
    pub sync_lights: bool,
    pub sync_textures: bool,
    pub animation: AnimationSettings,
    /// Extract meshes on the rayon pool
    pub multithreaded: bool,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            scene: SceneSettings::default(),
            sync_meshes: true,
            sync_normals: true,
            sync_uvs: true,
            sync_colors: true,
            sync_bones: true,
            sync_blendshapes: true,
            sync_cameras: true,
            sync_lights: true,
            sync_textures: true,
            animation: AnimationSettings::default(),
            multithreaded: true,
        }
    }
}
