use scenesync_shared::{
    AnimationClip, Asset, Constraint, DeleteMessage, Entity, FileAsset, Identifier, Material,
    Scene, SceneSettings, Texture,
};

/// Everything one export sends, owned by the export worker once kicked.
/// Nothing in here aliases producer state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneSnapshot {
    pub settings: SceneSettings,
    /// Entities sent together in the bulk Set message
    pub transforms: Vec<Entity>,
    /// Meshes and points, each sent in its own Set message
    pub geometries: Vec<Entity>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub files: Vec<FileAsset>,
    pub animation_clips: Vec<AnimationClip>,
    pub constraints: Vec<Constraint>,
    pub deleted_entities: Vec<Identifier>,
    pub deleted_materials: Vec<Identifier>,
    /// Sample time, used by scene cache files
    pub time: f32,
}

impl SceneSnapshot {
    pub fn new(settings: SceneSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.geometries.is_empty()
            && self.materials.is_empty()
            && self.textures.is_empty()
            && self.files.is_empty()
            && self.animation_clips.is_empty()
            && self.constraints.is_empty()
            && self.deleted_entities.is_empty()
            && self.deleted_materials.is_empty()
    }

    /// Orders entities by their export order, then by path so parents come
    /// before children
    pub fn sort_entities(&mut self) {
        let by_order = |a: &Entity, b: &Entity| {
            a.transform()
                .order
                .cmp(&b.transform().order)
                .then_with(|| a.path().cmp(b.path()))
        };
        self.transforms.sort_by(by_order);
        self.geometries.sort_by(by_order);
    }

    pub fn delete_message(&self) -> Option<DeleteMessage> {
        let message = DeleteMessage {
            entities: self.deleted_entities.clone(),
            materials: self.deleted_materials.clone(),
        };
        if message.is_empty() {
            None
        } else {
            Some(message)
        }
    }

    fn assets(&self) -> Vec<Asset> {
        let mut assets = Vec::with_capacity(
            self.files.len() + self.textures.len() + self.materials.len() + self.animation_clips.len(),
        );
        assets.extend(self.files.iter().cloned().map(Asset::from));
        assets.extend(self.textures.iter().cloned().map(Asset::from));
        assets.extend(self.materials.iter().cloned().map(Asset::from));
        assets.extend(self.animation_clips.iter().cloned().map(Asset::from));
        assets
    }

    /// Settings, assets, non-geometry entities and constraints
    pub fn bulk_scene(&self) -> Scene {
        let mut scene = Scene::new(self.settings.clone());
        scene.assets = self.assets();
        scene.entities = self.transforms.clone();
        scene.constraints = self.constraints.clone();
        scene
    }

    /// One scene per geometry entity, in send order
    pub fn geometry_scenes(&self) -> impl Iterator<Item = Scene> + '_ {
        self.geometries.iter().map(|geometry| {
            let mut scene = Scene::new(self.settings.clone());
            scene.entities.push(geometry.clone());
            scene
        })
    }

    /// The whole snapshot as a single scene
    pub fn to_scene(&self) -> Scene {
        let mut scene = self.bulk_scene();
        scene.entities.extend(self.geometries.iter().cloned());
        scene
    }
}
